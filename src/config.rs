use crate::error::WordDetectorError;

/// Tuning knobs for [`WordDetector`](crate::WordDetector). Defaults mirror the
/// source implementation's constructor defaults.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Minimum occurrence count for a unigram, bigram, or emitted n-gram to be considered.
    pub min_cnt: u32,
    /// Maximum n-gram length, in tokens, considered during extraction.
    pub max_word_len: usize,
    /// Minimum composite score for a candidate to be emitted.
    pub min_score: f32,
    /// Worker thread count. 0 means hardware parallelism.
    pub num_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_cnt: 10,
            max_word_len: 10,
            min_score: 0.1,
            num_threads: 0,
        }
    }
}

impl Config {
    pub fn new(min_cnt: u32, max_word_len: usize, min_score: f32, num_threads: usize) -> Self {
        Config {
            min_cnt,
            max_word_len,
            min_score,
            num_threads,
        }
    }

    /// Fails fast on configurations that can never produce a useful result.
    pub fn validate(&self) -> Result<(), WordDetectorError> {
        if self.max_word_len < 2 {
            return Err(WordDetectorError::InvalidConfig(format!(
                "max_word_len must be >= 2, got {}",
                self.max_word_len
            )));
        }
        Ok(())
    }

    /// Resolves `num_threads == 0` to the machine's hardware parallelism.
    pub fn resolved_num_threads(&self) -> usize {
        if self.num_threads == 0 {
            num_cpus::get().max(1)
        } else {
            self.num_threads
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn max_word_len_below_two_is_invalid() {
        let cfg = Config::new(10, 1, 0.1, 0);
        assert!(matches!(
            cfg.validate(),
            Err(WordDetectorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_threads_resolves_to_hardware_parallelism() {
        let cfg = Config::new(10, 10, 0.1, 0);
        assert!(cfg.resolved_num_threads() >= 1);
    }
}
