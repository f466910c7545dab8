//! # keeper-notes
//!
//! Patch-notes composition and citation validation for the CourseKeeper
//! pipeline.
//!
//! This crate provides:
//! - Evidence attachment (`FixtureEvidence`, `CorpusEvidence`)
//! - The Patch Notes Composer (`PatchNotesWriter`) with its fully formed
//!   fallback document
//! - The pure Citation Validator (`validate_citations`)
//! - The `keeper-demo` binary running the whole pipeline over fixture data
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use keeper_notes::{validate_citations, PatchNotesWriter};
//! use keeper_inference::OllamaBackend;
//!
//! let writer = PatchNotesWriter::new(Arc::new(OllamaBackend::from_env()));
//! let notes = writer.generate_patch_notes(&changes, 2014, 2010, "Computer Vision").await;
//! let report = validate_citations(&notes.value);
//! ```

pub mod evidence;
pub mod fallback;
pub mod validator;
pub mod writer;

// Re-export core types
pub use keeper_core::*;

pub use evidence::{CorpusEvidence, FixtureEvidence};
pub use fallback::fallback_patch_notes;
pub use validator::{validate_citations, CitationReport};
pub use writer::PatchNotesWriter;
