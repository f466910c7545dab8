//! Collaborator traits for the pipeline's external seams.
//!
//! The pipeline consumes exactly two external capabilities: schema-constrained
//! text generation and reference-corpus lookup. Both live behind narrow
//! traits so tests can inject deterministic implementations and the heuristic
//! pieces (topic matching, evidence lookup) can be swapped without touching
//! the pipeline stages.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::models::{BaselineTopic, CanonItem, DiffChange, Evidence};

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate JSON constrained to the given schema.
    ///
    /// The returned value is parsed but not re-validated; callers
    /// deserialize it into their expected shape and treat any mismatch as a
    /// generation failure.
    async fn generate_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &JsonValue,
    ) -> Result<JsonValue>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Selects candidate canon items for one baseline topic.
///
/// The default implementation is a keyword/Jaccard heuristic; an
/// embedding-based matcher is a drop-in replacement for this trait.
pub trait TopicMatcher: Send + Sync {
    /// Return candidate canon items for `topic`, best-effort ordered,
    /// from an already year-filtered canon slice.
    fn candidates(&self, topic: &BaselineTopic, canon: &[CanonItem]) -> Vec<CanonItem>;
}

/// Supplies citation evidence for a classified change.
///
/// A deployment backs this with corpus search; the offline default is a
/// fixed per-kind fixture table.
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    async fn evidence_for(&self, change: &DiffChange) -> Result<Vec<Evidence>>;
}

/// Reference corpus lookup.
#[async_trait]
pub trait CorpusSearch: Send + Sync {
    /// Search the corpus for items relevant to `topic`, restricted to
    /// publications up to and including `year_cutoff`.
    async fn search(&self, topic: &str, year_cutoff: i32) -> Result<Vec<CanonItem>>;
}
