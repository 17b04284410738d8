use clap::{Parser, Subcommand};
use std::path::PathBuf;

use word_detector::error::WordDetectorError;

mod dict_dump;
mod extract;
mod split;
mod util;

#[derive(Parser)]
#[command(name = "word-detector", about = "Unsupervised multi-word extraction over an untokenized corpus")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split a cirrussearch JSON GZ file into pieces for parallel extraction.
    Split {
        /// Path to cirrussearch JSON GZ file.
        #[arg(long, short = 'p')]
        input_path: PathBuf,

        /// Output directory for split files. Deleted first if it exists.
        #[arg(long, short = 'o')]
        output_dir: PathBuf,

        /// How many pieces to split the input file into.
        #[arg(long, short = 's', default_value_t = 12)]
        pieces: u32,
    },

    /// Run the extraction pipeline over a directory of line-delimited corpus files.
    Extract {
        /// Directory full of line-delimited (optionally gzip'd) corpus files.
        #[arg(long, short = 'd')]
        input_dir: PathBuf,

        /// Output file for the ranked word list. Will be gzip compressed.
        #[arg(long, short = 'o')]
        output_file: PathBuf,

        /// Minimum occurrence count for a token or bigram to survive pruning.
        #[arg(long, default_value_t = 10)]
        min_cnt: u32,

        /// Maximum candidate word length, in tokens.
        #[arg(long, default_value_t = 10)]
        max_word_len: usize,

        /// Minimum composite score for a candidate to be emitted.
        #[arg(long, default_value_t = 0.1)]
        min_score: f32,

        /// Number of worker threads. 0 selects the number of logical cores.
        #[arg(long, default_value_t = 0)]
        num_threads: usize,
    },

    /// Dump a persisted token dictionary as tab-separated id/word lines.
    DictDump {
        /// Dictionary file as produced by the 'extract' sub-command.
        #[arg(long, short = 'f')]
        input_file: PathBuf,

        /// Output file for the id/word listing.
        #[arg(long, short = 'o')]
        output_file: PathBuf,
    },
}

fn main() -> Result<(), WordDetectorError> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Split { input_path, output_dir, pieces } => {
            split::handle_split(&input_path, &output_dir, pieces)
        }
        Command::Extract { input_dir, output_file, min_cnt, max_word_len, min_score, num_threads } => {
            extract::handle_extract(&input_dir, &output_file, min_cnt, max_word_len, min_score, num_threads)
        }
        Command::DictDump { input_file, output_file } => {
            dict_dump::handle_dict_dump(&input_file, &output_file)
        }
    }
}
