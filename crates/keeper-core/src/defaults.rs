//! Default configuration values shared across the pipeline.
//!
//! Environment variables override these at construction time
//! (see `OllamaBackend::from_env` and `ArxivClient::from_env`).

/// Default Ollama endpoint.
pub const OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default generation model.
pub const GEN_MODEL: &str = "qwen3:8b";

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Maximum canon candidates returned per baseline topic by the mapper.
pub const MAX_CANDIDATES_PER_TOPIC: usize = 5;

/// Token-Jaccard similarity threshold for a mapper match.
pub const JACCARD_THRESHOLD: f64 = 0.5;

/// A change or claim with fewer citations than this is low-evidence.
pub const LOW_EVIDENCE_THRESHOLD: usize = 2;

/// Strings longer than this must carry a citation marker or a
/// "(Low evidence)" suffix to pass validation.
pub const UNCITED_CLAIM_MIN_LEN: usize = 50;

/// Default corpus metadata endpoint.
pub const CORPUS_URL: &str = "http://export.arxiv.org";

/// TTL for corpus search cache entries (seconds).
pub const CORPUS_CACHE_TTL_SECS: u64 = 3600;

/// Fixed delay between corpus requests (milliseconds).
pub const CORPUS_REQUEST_DELAY_MS: u64 = 1000;

/// Default maximum results per corpus search.
pub const CORPUS_MAX_RESULTS: usize = 25;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_cap_matches_contract() {
        assert_eq!(MAX_CANDIDATES_PER_TOPIC, 5);
    }

    #[test]
    fn test_jaccard_threshold_is_exclusive_half() {
        assert_eq!(JACCARD_THRESHOLD, 0.5);
    }

    #[test]
    fn test_low_evidence_threshold() {
        assert_eq!(LOW_EVIDENCE_THRESHOLD, 2);
    }
}
