//! Topic-Canon Mapper: associate baseline topics with candidate canon items.
//!
//! The matcher is a keyword heuristic standing in for embedding-based
//! retrieval: case-insensitive containment between topic name and item
//! title (whole phrase, or any sufficiently long shared token), or
//! whitespace-token Jaccard similarity above 0.5. Candidates keep
//! filtered-canon order and are capped at five per topic; ties carry no
//! meaning. Pure, synchronous, no I/O.

use std::collections::{HashMap, HashSet};

use keeper_core::defaults;
use keeper_core::{BaselineTopic, CanonItem, TopicMatcher};

/// Tokens shorter than this are ignored for token-containment matching,
/// keeping stopwords like "of" or "the" from linking everything.
const MIN_TOKEN_LEN: usize = 4;

/// Token-level Jaccard similarity: word-set intersection over union.
///
/// Returns 0.0 when both strings are empty of tokens.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();

    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = words_a.intersection(&words_b).count();
    intersection as f64 / union as f64
}

/// True when any long-enough token of one string appears inside the other.
///
/// Catches pairs like "SIFT Features" / "SIFT-based methods" where neither
/// whole phrase contains the other and hyphenation defeats word-set overlap.
fn has_token_containment(a: &str, b: &str) -> bool {
    let token_hits = |needle_src: &str, haystack: &str| {
        needle_src
            .split_whitespace()
            .filter(|t| t.len() >= MIN_TOKEN_LEN)
            .any(|t| haystack.contains(t))
    };
    token_hits(a, b) || token_hits(b, a)
}

/// Keyword/Jaccard implementation of [`TopicMatcher`].
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    /// Maximum candidates returned per topic.
    pub max_candidates: usize,
    /// Jaccard similarity above this counts as a match.
    pub jaccard_threshold: f64,
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self {
            max_candidates: defaults::MAX_CANDIDATES_PER_TOPIC,
            jaccard_threshold: defaults::JACCARD_THRESHOLD,
        }
    }
}

impl TopicMatcher for KeywordMatcher {
    fn candidates(&self, topic: &BaselineTopic, canon: &[CanonItem]) -> Vec<CanonItem> {
        let topic_lower = topic.name.to_lowercase();

        canon
            .iter()
            .filter(|item| {
                let item_lower = item.title.to_lowercase();
                item_lower.contains(&topic_lower)
                    || topic_lower.contains(&item_lower)
                    || has_token_containment(&topic_lower, &item_lower)
                    || jaccard_similarity(&topic_lower, &item_lower) > self.jaccard_threshold
            })
            .take(self.max_candidates)
            .cloned()
            .collect()
    }
}

/// Map each baseline topic to candidate canon items for a target year.
///
/// Canon items with `year > target_year` are never considered. Empty inputs
/// yield an empty mapping.
pub fn map_baseline_to_canon(
    baseline: &[BaselineTopic],
    canon: &[CanonItem],
    target_year: i32,
) -> HashMap<String, Vec<CanonItem>> {
    map_with_matcher(&KeywordMatcher::default(), baseline, canon, target_year)
}

/// As [`map_baseline_to_canon`], with a caller-supplied matcher.
pub fn map_with_matcher(
    matcher: &dyn TopicMatcher,
    baseline: &[BaselineTopic],
    canon: &[CanonItem],
    target_year: i32,
) -> HashMap<String, Vec<CanonItem>> {
    let relevant_canon: Vec<CanonItem> = canon
        .iter()
        .filter(|item| item.year <= target_year)
        .cloned()
        .collect();

    baseline
        .iter()
        .map(|topic| (topic.id.clone(), matcher.candidates(topic, &relevant_canon)))
        .collect()
}
