//! In-memory corpus for offline runs and tests.

use async_trait::async_trait;

use keeper_core::{CanonItem, CorpusSearch, Result};

/// Keyword search over a fixed item list.
///
/// Matching is case-insensitive containment of any query token in the item
/// title or summary; the year cutoff applies as in the real client.
#[derive(Debug, Clone, Default)]
pub struct FixtureCorpus {
    items: Vec<CanonItem>,
}

impl FixtureCorpus {
    pub fn new(items: Vec<CanonItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl CorpusSearch for FixtureCorpus {
    async fn search(&self, topic: &str, year_cutoff: i32) -> Result<Vec<CanonItem>> {
        let query = topic.to_lowercase();
        let tokens: Vec<&str> = query.split_whitespace().collect();

        Ok(self
            .items
            .iter()
            .filter(|item| item.year <= year_cutoff)
            .filter(|item| {
                let haystack =
                    format!("{} {}", item.title.to_lowercase(), item.summary.to_lowercase());
                tokens.iter().any(|t| haystack.contains(t))
            })
            .cloned()
            .collect())
    }
}
