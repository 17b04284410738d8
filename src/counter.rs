use std::collections::{BTreeMap, HashSet};

use crate::compact_key::CompactKey;

/// Accumulated state after all three passes: unigram counts indexed by token
/// id, the candidate bigram set, and the forward/backward n-gram count maps.
/// Built incrementally by [`crate::pipeline`], read-only during scoring.
#[derive(Default)]
pub struct Counter {
    pub unigram: Vec<u32>,
    pub cand_bigram: HashSet<(u16, u16)>,
    pub forward_cnt: BTreeMap<CompactKey, u32>,
    pub backward_cnt: BTreeMap<CompactKey, u32>,
}

impl Counter {
    pub fn unigram_of(&self, id: u32) -> u32 {
        self.unigram.get(id as usize).copied().unwrap_or(0)
    }
}

/// Per-worker partial unigram counts, keyed by token id rather than a fixed-size
/// vector since the final vocabulary size isn't known until all workers finish.
pub type PartialUnigram = std::collections::HashMap<u32, u32>;

/// Element-wise sum of worker-local unigram maps into a dense `Vec<u32>` sized
/// to the final vocabulary. This is the merge step spec 4.E calls out after pass 1.
pub fn merge_unigrams(vocab_size: usize, partials: Vec<PartialUnigram>) -> Vec<u32> {
    let mut merged = vec![0u32; vocab_size];
    for partial in partials {
        for (id, count) in partial {
            merged[id as usize] += count;
        }
    }
    merged
}

/// Set union of worker-local candidate bigram sets.
pub fn merge_cand_bigrams(partials: Vec<HashSet<(u16, u16)>>) -> HashSet<(u16, u16)> {
    let mut merged = HashSet::new();
    for partial in partials {
        merged.extend(partial);
    }
    merged
}

/// Per-worker partial forward/backward n-gram counts.
#[derive(Default)]
pub struct NgramPartial {
    pub forward: BTreeMap<CompactKey, u32>,
    pub backward: BTreeMap<CompactKey, u32>,
}

/// Sums worker-local n-gram count maps by key. Commutative and associative
/// regardless of merge order or corpus partition (testable property #3).
pub fn merge_ngram_partials(
    partials: Vec<NgramPartial>,
) -> (BTreeMap<CompactKey, u32>, BTreeMap<CompactKey, u32>) {
    let mut forward = BTreeMap::new();
    let mut backward = BTreeMap::new();
    for partial in partials {
        for (key, count) in partial.forward {
            *forward.entry(key).or_insert(0) += count;
        }
        for (key, count) in partial.backward {
            *backward.entry(key).or_insert(0) += count;
        }
    }
    (forward, backward)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_unigrams_sums_across_partitions() {
        let mut p1 = PartialUnigram::new();
        p1.insert(0, 3);
        p1.insert(1, 1);
        let mut p2 = PartialUnigram::new();
        p2.insert(0, 2);
        p2.insert(2, 5);

        let merged = merge_unigrams(3, vec![p1, p2]);
        assert_eq!(merged, vec![5, 1, 5]);
    }

    #[test]
    fn merge_is_commutative_across_shard_order() {
        let mut p1 = PartialUnigram::new();
        p1.insert(0, 3);
        let mut p2 = PartialUnigram::new();
        p2.insert(0, 4);

        let forward = merge_unigrams(1, vec![p1.clone(), p2.clone()]);
        let backward = merge_unigrams(1, vec![p2, p1]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn merge_cand_bigrams_is_a_union() {
        let mut s1 = HashSet::new();
        s1.insert((0u16, 1u16));
        let mut s2 = HashSet::new();
        s2.insert((1u16, 2u16));
        s2.insert((0u16, 1u16));

        let merged = merge_cand_bigrams(vec![s1, s2]);
        assert_eq!(merged.len(), 2);
        assert!(merged.contains(&(0, 1)));
        assert!(merged.contains(&(1, 2)));
    }

    #[test]
    fn merge_ngram_partials_sums_counts_by_key() {
        let mut p1 = NgramPartial::default();
        p1.forward.insert(CompactKey::from_slice(&[1, 2]), 2);
        let mut p2 = NgramPartial::default();
        p2.forward.insert(CompactKey::from_slice(&[1, 2]), 3);
        p2.forward.insert(CompactKey::from_slice(&[1, 3]), 1);

        let (forward, _backward) = merge_ngram_partials(vec![p1, p2]);
        assert_eq!(forward.get(&CompactKey::from_slice(&[1, 2])), Some(&5));
        assert_eq!(forward.get(&CompactKey::from_slice(&[1, 3])), Some(&1));
    }
}
