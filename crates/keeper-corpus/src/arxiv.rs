//! Thin arXiv metadata client.
//!
//! Wraps a JSON metadata endpoint with the two decorations the pipeline
//! needs: a naive TTL cache and a fixed inter-request delay. Results are
//! normalized into [`CanonItem`] and filtered to the caller's year cutoff.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use keeper_core::defaults;
use keeper_core::{CanonItem, CanonKind, CorpusSearch, Error, Result};

/// Configuration for [`ArxivClient`].
#[derive(Debug, Clone)]
pub struct ArxivConfig {
    /// Base URL of the metadata endpoint.
    pub base_url: String,
    /// Maximum papers fetched per query.
    pub max_results: usize,
    /// Minimum spacing between outgoing requests.
    pub request_delay: Duration,
    /// How long cached query results stay valid.
    pub cache_ttl: Duration,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::CORPUS_URL.to_string(),
            max_results: defaults::CORPUS_MAX_RESULTS,
            request_delay: Duration::from_millis(defaults::CORPUS_REQUEST_DELAY_MS),
            cache_ttl: Duration::from_secs(defaults::CORPUS_CACHE_TTL_SECS),
        }
    }
}

impl ArxivConfig {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// Honors `KEEPER_CORPUS_URL` and `KEEPER_CORPUS_MAX_RESULTS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("KEEPER_CORPUS_URL") {
            config.base_url = url;
        }
        if let Ok(max) = std::env::var("KEEPER_CORPUS_MAX_RESULTS") {
            if let Ok(max) = max.parse() {
                config.max_results = max;
            }
        }
        config
    }
}

struct CacheEntry {
    items: Vec<CanonItem>,
    stored_at: Instant,
}

/// One paper record as the metadata endpoint returns it.
///
/// Field names vary across scraper generations; aliases cover the shapes
/// seen in practice.
#[derive(Debug, Deserialize)]
struct RawPaper {
    title: String,
    #[serde(default, alias = "summary")]
    r#abstract: String,
    #[serde(default, alias = "arxiv_link")]
    url: Option<String>,
    #[serde(default, alias = "arxivId")]
    arxiv_id: Option<String>,
    #[serde(default, alias = "submittedDate", alias = "publishedDate")]
    published_date: Option<String>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// HTTP client over an arXiv metadata endpoint.
pub struct ArxivClient {
    client: Client,
    config: ArxivConfig,
    cache: Mutex<HashMap<String, CacheEntry>>,
    last_request: Mutex<Option<Instant>>,
}

impl ArxivClient {
    pub fn new(config: ArxivConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            config,
            cache: Mutex::new(HashMap::new()),
            last_request: Mutex::new(None),
        }
    }

    pub fn from_env() -> Self {
        Self::new(ArxivConfig::from_env())
    }

    /// Drop all cached query results.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(at) = *last {
            let elapsed = at.elapsed();
            if elapsed < self.config.request_delay {
                tokio::time::sleep(self.config.request_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn cached(&self, key: &str) -> Option<Vec<CanonItem>> {
        let mut cache = self.cache.lock().await;
        match cache.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= self.config.cache_ttl => {
                Some(entry.items.clone())
            }
            Some(_) => {
                cache.remove(key);
                None
            }
            None => None,
        }
    }

    async fn store(&self, key: String, items: Vec<CanonItem>) {
        let mut cache = self.cache.lock().await;
        // Crude size cap; eviction order does not matter here.
        if cache.len() >= 1000 {
            if let Some(evict) = cache.keys().next().cloned() {
                cache.remove(&evict);
            }
        }
        cache.insert(
            key,
            CacheEntry {
                items,
                stored_at: Instant::now(),
            },
        );
    }

    async fn fetch(&self, query: &str) -> Result<Vec<RawPaper>> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let max_results = self.config.max_results.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("query", query), ("max_results", max_results.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Request(format!(
                "Corpus endpoint returned {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

/// Best-effort publication year: explicit field, then date string, then the
/// current year.
fn resolve_year(paper: &RawPaper) -> i32 {
    if let Some(year) = paper.year {
        return year;
    }
    if let Some(date) = paper.published_date.as_deref() {
        if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return parsed.year();
        }
        if let Some(year) = date.get(..4).and_then(|y| y.parse().ok()) {
            return year;
        }
        warn!(date, "Unparseable publication date");
    }
    Utc::now().year()
}

fn normalize(paper: RawPaper) -> CanonItem {
    let year = resolve_year(&paper);
    let url = paper.url.unwrap_or_else(|| {
        let id = paper.arxiv_id.as_deref().unwrap_or("");
        format!("https://arxiv.org/abs/{}", id.trim_start_matches("arXiv:"))
    });
    CanonItem {
        title: paper.title,
        url,
        venue: "arXiv".to_string(),
        year,
        kind: CanonKind::Paper,
        summary: paper.r#abstract,
        confidence: paper.confidence,
    }
}

#[async_trait]
impl CorpusSearch for ArxivClient {
    #[instrument(skip(self), fields(subsystem = "corpus", component = "arxiv", op = "search", query = topic, year_cutoff = year_cutoff))]
    async fn search(&self, topic: &str, year_cutoff: i32) -> Result<Vec<CanonItem>> {
        let cache_key = format!("search:{}:{}", topic, year_cutoff);
        if let Some(items) = self.cached(&cache_key).await {
            debug!(result_count = items.len(), cache_hit = true, "Corpus search served from cache");
            return Ok(items);
        }

        self.rate_limit().await;
        let papers = self.fetch(topic).await?;

        let items: Vec<CanonItem> = papers
            .into_iter()
            .map(normalize)
            .filter(|item| item.year <= year_cutoff)
            .take(self.config.max_results)
            .collect();

        info!(result_count = items.len(), "Corpus search complete");
        self.store(cache_key, items.clone()).await;
        Ok(items)
    }
}
