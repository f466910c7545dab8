//! # keeper-corpus
//!
//! Reference corpus lookup for the CourseKeeper pipeline.
//!
//! This crate provides:
//! - [`ArxivClient`], a thin HTTP client over an arXiv metadata endpoint
//!   with a TTL cache and fixed inter-request delay
//! - [`FixtureCorpus`], an in-memory implementation for offline runs and
//!   tests
//!
//! Both implement [`keeper_core::CorpusSearch`]. The client deliberately
//! stays a decorated HTTP fetch; relevance ranking and ingestion live
//! elsewhere.

pub mod arxiv;
pub mod fixture;

// Re-export core types
pub use keeper_core::*;

pub use arxiv::{ArxivClient, ArxivConfig};
pub use fixture::FixtureCorpus;
