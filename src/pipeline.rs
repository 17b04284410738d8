use std::collections::HashSet;

use log::debug;

use crate::compact_key::CompactKey;
use crate::config::Config;
use crate::counter::{self, NgramPartial, PartialUnigram};
use crate::dictionary::TokenDictionary;
use crate::error::WordDetectorError;
use crate::harness;
use crate::scoring::{self, WordInfo};

/// Orchestrates the three-pass counting pipeline (unigram -> bigram candidate
/// set -> n-gram forward/backward counts) and the final scoring/extraction
/// pass. Holds only configuration; a fresh [`TokenDictionary`] and [`Counter`](crate::counter::Counter)
/// are built per call to `extract_words`, matching the source's `KWordDetector`
/// being a stateless, reusable configuration object.
pub struct WordDetector {
    config: Config,
}

impl WordDetector {
    pub fn new(config: Config) -> Self {
        WordDetector { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs all three passes against `reader` and returns the ranked, filtered
    /// word list. `reader(index)` returning an empty string terminates the
    /// current pass (§6); it is invoked once per pass and must be restartable
    /// by index. `tokenize` is the external character-tokenizer collaborator:
    /// it turns one document into the sequence of code-unit tokens the pipeline
    /// counts over.
    /// Returns the surviving token dictionary alongside the word list so
    /// callers can persist it (§6) or resolve a form back to ids for further
    /// introspection (component B's `sizeOf`/`stringOf`).
    pub fn extract_words<R, T>(
        &self,
        reader: R,
        tokenize: T,
    ) -> Result<(TokenDictionary, Vec<WordInfo>), WordDetectorError>
    where
        R: Fn(usize) -> String,
        T: Fn(&str) -> Vec<String> + Sync,
    {
        self.config.validate()?;

        let dict = TokenDictionary::new();
        let threads = self.config.resolved_num_threads();
        let min_cnt = self.config.min_cnt;
        let max_len = self.config.max_word_len;

        let to_option = |s: String| if s.is_empty() { None } else { Some(s) };

        debug!("pass 1: unigram counting ({} threads)", threads);
        let unigram_partials: Vec<PartialUnigram> = harness::scan(
            threads,
            |i| to_option(reader(i)),
            |doc, _idx| {
                let tokens = tokenize(doc);
                let refs: Vec<&str> = tokens.iter().map(|s| s.as_str()).collect();
                let ids = dict.get_or_add_many(refs);
                let mut partial = PartialUnigram::new();
                for id in ids {
                    *partial.entry(id).or_insert(0) += 1;
                }
                partial
            },
        );
        let vocab_size = dict.len();
        let unigram = counter::merge_unigrams(vocab_size, unigram_partials);
        debug!("vocabulary size after pass 1: {}", vocab_size);

        debug!("pass 2: bigram candidate set");
        let bigram_partials: Vec<HashSet<(u16, u16)>> = harness::scan(
            threads,
            |i| to_option(reader(i)),
            |doc, _idx| {
                let tokens = tokenize(doc);
                let refs: Vec<&str> = tokens.iter().map(|s| s.as_str()).collect();
                let ids = dict.get_or_add_many(refs);
                let mut partial = HashSet::new();
                for pair in ids.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    if unigram_at(&unigram, a) >= min_cnt && unigram_at(&unigram, b) >= min_cnt {
                        partial.insert((a as u16, b as u16));
                    }
                }
                partial
            },
        );
        let cand_bigram = counter::merge_cand_bigrams(bigram_partials);
        debug!("candidate bigram set size: {}", cand_bigram.len());

        debug!("pass 3: n-gram forward/backward counting");
        let ngram_partials: Vec<NgramPartial> = harness::scan(
            threads,
            |i| to_option(reader(i)),
            |doc, _idx| {
                let tokens = tokenize(doc);
                let refs: Vec<&str> = tokens.iter().map(|s| s.as_str()).collect();
                let ids = dict.get_or_add_many(refs);
                let units: Vec<u16> = ids.iter().map(|&id| id as u16).collect();
                build_ngram_partial(&units, &cand_bigram, max_len)
            },
        );
        let (forward, backward) = counter::merge_ngram_partials(ngram_partials);

        let min_score = self.config.min_score;
        let words = scoring::extract(&dict, &forward, &backward, min_cnt, max_len, min_score);
        Ok((dict, words))
    }
}

fn unigram_at(unigram: &[u32], id: u32) -> u32 {
    unigram.get(id as usize).copied().unwrap_or(0)
}

/// Builds one document's contribution to `forwardCnt`/`backwardCnt`: a
/// length-1 anchor per token plus every window of length 2..=`max_len` gated
/// by the candidate bigram set on its first (forward) or last (backward) two
/// tokens.
fn build_ngram_partial(
    units: &[u16],
    cand_bigram: &HashSet<(u16, u16)>,
    max_len: usize,
) -> NgramPartial {
    let mut partial = NgramPartial::default();
    for &unit in units {
        let anchor = CompactKey::from_slice(&[unit]);
        *partial.forward.entry(anchor.clone()).or_insert(0) += 1;
        *partial.backward.entry(anchor).or_insert(0) += 1;
    }

    let upper = max_len.min(units.len());
    for len in 2..=upper {
        for start in 0..=(units.len() - len) {
            let window = &units[start..start + len];
            if cand_bigram.contains(&(window[0], window[1])) {
                *partial
                    .forward
                    .entry(CompactKey::from_slice(window))
                    .or_insert(0) += 1;
            }
            if cand_bigram.contains(&(window[len - 2], window[len - 1])) {
                let reversed: Vec<u16> = window.iter().rev().copied().collect();
                *partial
                    .backward
                    .entry(CompactKey::from_slice(&reversed))
                    .or_insert(0) += 1;
            }
        }
    }
    partial
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_tokenize(doc: &str) -> Vec<String> {
        doc.chars().map(|c| c.to_string()).collect()
    }

    fn fixed_reader(docs: Vec<&'static str>) -> impl Fn(usize) -> String {
        move |i| docs.get(i).map(|s| s.to_string()).unwrap_or_default()
    }

    #[test]
    fn s2_empty_reader_yields_empty_word_list() {
        let detector = WordDetector::new(Config::new(2, 3, 0.0, 1));
        let (_dict, result) = detector
            .extract_words(fixed_reader(vec![]), char_tokenize)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn s3_max_word_len_below_two_is_rejected_as_invalid_config() {
        let detector = WordDetector::new(Config::new(2, 1, 0.0, 1));
        let err = detector
            .extract_words(fixed_reader(vec!["ababab"]), char_tokenize)
            .unwrap_err();
        assert!(matches!(err, WordDetectorError::InvalidConfig(_)));
    }

    #[test]
    fn s1_single_document_three_repetitions() {
        let detector = WordDetector::new(Config::new(2, 3, 0.0, 1));
        let (_dict, result) = detector
            .extract_words(fixed_reader(vec!["ababab"]), char_tokenize)
            .unwrap();
        assert!(result.iter().any(|w| w.form == vec!["a", "b"] && w.freq == 3));
    }

    #[test]
    fn s4_rare_bigrams_are_pruned() {
        // every adjacent pair is distinct and occurs once; min_cnt=2 prunes all of them.
        let detector = WordDetector::new(Config::new(2, 3, 0.0, 1));
        let (_dict, result) = detector
            .extract_words(fixed_reader(vec!["abcdef"]), char_tokenize)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn s6_deterministic_across_thread_counts() {
        let docs = vec!["ababab", "bababa", "ababab", "abcabc"];
        let mut results_by_threads = Vec::new();
        for threads in [1, 8] {
            let detector = WordDetector::new(Config::new(2, 3, 0.0, threads));
            let (_dict, mut result) = detector
                .extract_words(fixed_reader(docs.clone()), char_tokenize)
                .unwrap();
            result.sort_by(|a, b| a.form.cmp(&b.form));
            results_by_threads.push(result);
        }
        let forms_a: Vec<_> = results_by_threads[0].iter().map(|w| w.form.clone()).collect();
        let forms_b: Vec<_> = results_by_threads[1].iter().map(|w| w.form.clone()).collect();
        assert_eq!(forms_a, forms_b);
        for (a, b) in results_by_threads[0].iter().zip(results_by_threads[1].iter()) {
            assert!((a.score - b.score).abs() < 1e-5);
            assert_eq!(a.freq, b.freq);
        }
    }

    #[test]
    fn threshold_and_length_gates_hold_on_real_output() {
        let detector = WordDetector::new(Config::new(2, 3, 0.0, 2));
        let (_dict, result) = detector
            .extract_words(fixed_reader(vec!["ababab", "ababab"]), char_tokenize)
            .unwrap();
        for w in &result {
            assert!(w.freq >= 2);
            assert!(w.form.len() >= 2 && w.form.len() <= 3);
            assert!(w.score >= 0.0);
        }
    }
}
