//! Structured logging field name constants for the CourseKeeper pipeline.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "diff", "notes", "inference", "corpus"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "classifier", "writer", "ollama", "arxiv"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "classify_changes", "generate_patch_notes", "search"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Subject title the pipeline run concerns.
pub const SUBJECT: &str = "subject";

/// Baseline year of the run.
pub const BASELINE_YEAR: &str = "baseline_year";

/// Target year of the run.
pub const TARGET_YEAR: &str = "target_year";

/// Corpus search query text.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of baseline topics in a mapper/classifier input.
pub const TOPIC_COUNT: &str = "topic_count";

/// Number of canon items considered.
pub const CANON_COUNT: &str = "canon_count";

/// Number of classified changes produced or consumed.
pub const CHANGE_COUNT: &str = "change_count";

/// Number of citation issues found by the validator.
pub const ISSUE_COUNT: &str = "issue_count";

/// Number of results returned by a corpus search.
pub const RESULT_COUNT: &str = "result_count";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

/// Provenance of a generative result ("generated" or "fallback").
pub const SOURCE: &str = "source";

/// Retry attempt number for a generative call.
pub const ATTEMPT: &str = "attempt";

// ─── Corpus fields ─────────────────────────────────────────────────────────

/// Whether a corpus search was served from cache.
pub const CACHE_HIT: &str = "cache_hit";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";
