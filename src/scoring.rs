use std::collections::BTreeMap;

use crate::compact_key::CompactKey;
use crate::dictionary::TokenDictionary;

/// One extracted candidate word with its frequency and four sub-scores.
#[derive(Debug, Clone, PartialEq)]
pub struct WordInfo {
    pub form: Vec<String>,
    pub score: f32,
    pub l_branch: f32,
    pub r_branch: f32,
    pub l_cohesion: f32,
    pub r_cohesion: f32,
    pub freq: u32,
}

/// Shannon entropy of the successor-code-unit distribution at `prefix`, read
/// from the contiguous lexicographic range of `cnt` sharing that prefix.
/// Zero when `prefix` has no one-unit-longer successors.
pub fn branching_entropy(cnt: &BTreeMap<CompactKey, u32>, prefix: &CompactKey) -> f32 {
    let target_len = prefix.len() + 1;
    let mut counts = Vec::new();
    let mut total: u64 = 0;
    for (key, count) in cnt.range(prefix.clone()..) {
        if !key.starts_with(prefix) {
            break;
        }
        if key.len() == target_len {
            counts.push(*count as u64);
            total += *count as u64;
        }
    }
    if total == 0 {
        return 0.0;
    }
    let total_f = total as f64;
    let entropy: f64 = counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total_f;
            -p * p.ln()
        })
        .sum();
    entropy as f32
}

/// Geometric-mean conditional-continuation-probability estimate: the
/// `len(full)`-th root of `count(full) / count([anchor_unit])`.
fn geometric_cohesion(cnt: &BTreeMap<CompactKey, u32>, full: &CompactKey, anchor_unit: u16) -> f32 {
    let len = full.len();
    if len < 2 {
        return 0.0;
    }
    let anchor_key = CompactKey::from_slice(&[anchor_unit]);
    let anchor_count = cnt.get(&anchor_key).copied().unwrap_or(0) as f64;
    let full_count = cnt.get(full).copied().unwrap_or(0) as f64;
    if anchor_count <= 0.0 || full_count <= 0.0 {
        return 0.0;
    }
    (full_count / anchor_count).powf(1.0 / len as f64) as f32
}

fn forward_cohesion(forward: &BTreeMap<CompactKey, u32>, w: &CompactKey) -> f32 {
    match w.front() {
        Some(first) => geometric_cohesion(forward, w, first),
        None => 0.0,
    }
}

fn backward_cohesion(backward: &BTreeMap<CompactKey, u32>, w: &CompactKey) -> f32 {
    let rev = w.reversed();
    match rev.front() {
        Some(last) => geometric_cohesion(backward, &rev, last),
        None => 0.0,
    }
}

/// Product-of-cohesions scaled by `ln(1+H)` branching terms: zero if either
/// side is a dead end (no branching at all), a diminishing-returns bonus for
/// entropy beyond that. See SPEC_FULL.md 4.F for the rationale.
fn composite_score(r_cohesion: f32, l_cohesion: f32, r_branch: f32, l_branch: f32) -> f32 {
    r_cohesion * l_cohesion * (1.0 + r_branch).ln() * (1.0 + l_branch).ln()
}

struct CandidateStats {
    score: f32,
    l_branch: f32,
    r_branch: f32,
    l_cohesion: f32,
    r_cohesion: f32,
}

fn compute_stats(
    forward: &BTreeMap<CompactKey, u32>,
    backward: &BTreeMap<CompactKey, u32>,
    key: &CompactKey,
) -> CandidateStats {
    let r_branch = branching_entropy(forward, key);
    let rev = key.reversed();
    let l_branch = branching_entropy(backward, &rev);
    let r_cohesion = forward_cohesion(forward, key);
    let l_cohesion = backward_cohesion(backward, key);
    let score = composite_score(r_cohesion, l_cohesion, r_branch, l_branch);
    CandidateStats {
        score,
        l_branch,
        r_branch,
        l_cohesion,
        r_cohesion,
    }
}

struct StackEntry {
    key: CompactKey,
    freq: u32,
    stats: CandidateStats,
    dominated: bool,
}

fn form_of(dict: &TokenDictionary, key: &CompactKey) -> Vec<String> {
    key.iter().map(|&unit| dict.str_of(unit as u32)).collect()
}

/// Walks `forward_cnt` in lexicographic order, scoring every candidate whose
/// frequency and length pass the gates, suppressing dominated prefixes along
/// the way with a single-pass stack (see DESIGN.md for why this is equivalent
/// to the spec's "keep highest-scoring length per anchor chain" description),
/// and dropping anything under `min_score`.
pub fn extract(
    dict: &TokenDictionary,
    forward: &BTreeMap<CompactKey, u32>,
    backward: &BTreeMap<CompactKey, u32>,
    min_cnt: u32,
    max_word_len: usize,
    min_score: f32,
) -> Vec<WordInfo> {
    let mut stack: Vec<StackEntry> = Vec::new();
    let mut survivors: Vec<WordInfo> = Vec::new();

    let finalize = |entry: StackEntry, survivors: &mut Vec<WordInfo>| {
        if entry.dominated || entry.stats.score < min_score {
            return;
        }
        survivors.push(WordInfo {
            form: form_of(dict, &entry.key),
            score: entry.stats.score,
            l_branch: entry.stats.l_branch,
            r_branch: entry.stats.r_branch,
            l_cohesion: entry.stats.l_cohesion,
            r_cohesion: entry.stats.r_cohesion,
            freq: entry.freq,
        });
    };

    for (key, &count) in forward.iter() {
        let len = key.len();
        if len < 2 || len > max_word_len || count < min_cnt {
            continue;
        }
        let stats = compute_stats(forward, backward, key);

        while let Some(top) = stack.last() {
            if key.starts_with(&top.key) {
                break;
            }
            let finished = stack.pop().unwrap();
            finalize(finished, &mut survivors);
        }

        for ancestor in stack.iter_mut() {
            if stats.score > ancestor.stats.score {
                ancestor.dominated = true;
            }
        }

        stack.push(StackEntry {
            key: key.clone(),
            freq: count,
            stats,
            dominated: false,
        });
    }

    while let Some(finished) = stack.pop() {
        finalize(finished, &mut survivors);
    }

    survivors
}
