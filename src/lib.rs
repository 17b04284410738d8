//! Unsupervised multi-word extraction over an untokenized corpus.
//!
//! Mines a corpus via a three-pass parallel counting pipeline (unigram ->
//! bigram candidate set -> n-gram forward/backward counts) and scores
//! candidates by branching entropy and cohesion, emitting the highest-scoring,
//! non-dominated word forms. See `SPEC_FULL.md` for the full design.

pub mod compact_key;
pub mod config;
pub mod counter;
pub mod dictionary;
pub mod error;
pub mod harness;
pub mod pipeline;
pub mod scoring;

pub use compact_key::CompactKey;
pub use config::Config;
pub use dictionary::TokenDictionary;
pub use error::WordDetectorError;
pub use pipeline::WordDetector;
pub use scoring::WordInfo;
