//! # keeper-diff
//!
//! Topic-canon mapping and change classification for the CourseKeeper
//! pipeline.
//!
//! This crate provides:
//! - The keyword/Jaccard topic matcher and `map_baseline_to_canon`
//! - The change classifier (`DiffAnalysisEngine`) with its deterministic
//!   fallback change table
//! - Importance ranking and per-kind change statistics
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use keeper_diff::{rank_changes_by_importance, DiffAnalysisEngine};
//! use keeper_inference::OllamaBackend;
//!
//! let engine = DiffAnalysisEngine::new(Arc::new(OllamaBackend::from_env()));
//! let classified = engine.classify_changes(&baseline, &canon, 2014, 2010).await;
//! let ranked = rank_changes_by_importance(classified.value);
//! ```

pub mod classifier;
pub mod fallback;
pub mod mapper;
pub mod ranking;

// Re-export core types
pub use keeper_core::*;

pub use classifier::DiffAnalysisEngine;
pub use fallback::fallback_changes;
pub use mapper::{jaccard_similarity, map_baseline_to_canon, map_with_matcher, KeywordMatcher};
pub use ranking::{importance_weight, rank_changes_by_importance, ChangeStats};
