//! Similarity scoring for applicant names
//!
//! Two metrics are computed on normalized names and the strongest wins:
//! character bigram Dice (typos, spelling variants) and token Jaccard
//! (missing or extra middle names). Both are repeated with the token order
//! reversed to catch "First Last" vs "Last First".

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::normalization::{normalize, reverse_tokens};
use crate::config::DedupConfig;

/// Default score at or above which two names are treated as the same person
pub const DEFAULT_THRESHOLD: f64 = 0.70;

/// Component scores behind a similarity decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityBreakdown {
    /// Bigram Dice on the names as given
    pub dice: f64,
    /// Token Jaccard on the names as given
    pub jaccard: f64,
    /// Best bigram Dice with one side's tokens reversed
    pub reversed_dice: f64,
    /// Token Jaccard with one side's tokens reversed
    pub reversed_jaccard: f64,
    /// Overall similarity (0.0 to 1.0), the maximum of the above
    pub score: f64,
    /// Human-readable explanation of the score
    pub reason: String,
}

/// Bigram multiset of one token ordering
#[derive(Debug, Clone)]
struct BigramProfile {
    counts: HashMap<String, usize>,
    total: usize,
}

impl BigramProfile {
    fn new(normalized: &str) -> Self {
        let chars: Vec<char> = normalized.chars().collect();
        let mut counts: HashMap<String, usize> = HashMap::new();

        if chars.len() < 2 {
            // A name shorter than a bigram is its own single element
            counts.insert(normalized.to_string(), 1);
        } else {
            for pair in chars.windows(2) {
                *counts.entry(pair.iter().collect()).or_insert(0) += 1;
            }
        }

        let total = counts.values().sum();
        Self { counts, total }
    }
}

/// A name prepared once for repeated comparison
#[derive(Debug, Clone)]
pub(crate) struct PreparedName {
    normalized: String,
    tokens: HashSet<String>,
    forward: BigramProfile,
    reversed: BigramProfile,
}

impl PreparedName {
    pub(crate) fn new(raw: &str) -> Self {
        let normalized = normalize(raw);
        let tokens = normalized.split_whitespace().map(str::to_string).collect();
        let forward = BigramProfile::new(&normalized);
        let reversed = BigramProfile::new(&reverse_tokens(&normalized));

        Self {
            normalized,
            tokens,
            forward,
            reversed,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Combined score against another prepared name.
    pub(crate) fn score(&self, other: &PreparedName, reverse: bool) -> f64 {
        let s = self.components(other, reverse);
        max_of(&s)
    }

    /// `[dice, jaccard, reversed_dice, reversed_jaccard]`
    fn components(&self, other: &PreparedName, reverse: bool) -> [f64; 4] {
        // Two blank names carry no evidence of being the same person
        if self.is_empty() || other.is_empty() {
            return [0.0; 4];
        }

        let dice = dice_coefficient(&self.forward, &other.forward);
        let jaccard = jaccard_similarity(&self.tokens, &other.tokens);

        if !reverse {
            return [dice, jaccard, 0.0, 0.0];
        }

        // Reverse each side in turn so the result does not depend on argument order
        let reversed_dice = dice_coefficient(&self.forward, &other.reversed)
            .max(dice_coefficient(&self.reversed, &other.forward));
        // Token sets ignore order
        let reversed_jaccard = jaccard;

        [dice, jaccard, reversed_dice, reversed_jaccard]
    }
}

/// Similarity between two raw names using the default configuration
pub fn similarity(a: &str, b: &str) -> f64 {
    PreparedName::new(a).score(&PreparedName::new(b), true)
}

/// Similarity between two raw names with every component score exposed
pub fn similarity_breakdown(a: &str, b: &str, config: &DedupConfig) -> SimilarityBreakdown {
    let pa = PreparedName::new(a);
    let pb = PreparedName::new(b);
    let [dice, jaccard, reversed_dice, reversed_jaccard] =
        pa.components(&pb, config.reverse_tokens);
    let score = max_of(&[dice, jaccard, reversed_dice, reversed_jaccard]);

    let reason = if pa.is_empty() || pb.is_empty() {
        "Empty name".to_string()
    } else {
        let mut parts = vec![
            format!("Dice {:.0}%", dice * 100.0),
            format!("Jaccard {:.0}%", jaccard * 100.0),
        ];
        if config.reverse_tokens && reversed_dice > dice {
            parts.push(format!("Reversed order {:.0}%", reversed_dice * 100.0));
        }
        parts.join("; ")
    };

    SimilarityBreakdown {
        dice,
        jaccard,
        reversed_dice,
        reversed_jaccard,
        score,
        reason,
    }
}

/// Check whether two names score at or above `threshold`
pub fn names_match(a: &str, b: &str, threshold: f64) -> bool {
    similarity(a, b) >= threshold
}

/// Sørensen–Dice coefficient over bigram multisets
fn dice_coefficient(a: &BigramProfile, b: &BigramProfile) -> f64 {
    let total = a.total + b.total;
    if total == 0 {
        return 0.0;
    }

    let shared: usize = a
        .counts
        .iter()
        .filter_map(|(bigram, &count_a)| b.counts.get(bigram).map(|&count_b| count_a.min(count_b)))
        .sum();

    (2 * shared) as f64 / total as f64
}

/// Jaccard similarity over token sets
fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();

    if union == 0 {
        return 0.0;
    }

    intersection as f64 / union as f64
}

fn max_of(scores: &[f64]) -> f64 {
    scores.iter().copied().fold(0.0, f64::max)
}
