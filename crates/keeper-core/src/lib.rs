//! # keeper-core
//!
//! Core types, traits, and abstractions for the CourseKeeper patch-notes
//! pipeline.
//!
//! This crate provides the value objects flowing through the pipeline
//! (baseline topics, canon items, classified changes, rendered patch notes),
//! the error type shared by every crate, and the collaborator traits that
//! make the generation and corpus layers pluggable.

pub mod cancel;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
