//! # keeper-inference
//!
//! LLM generation backend abstraction for the CourseKeeper pipeline.
//!
//! This crate provides:
//! - The Ollama implementation of [`keeper_core::GenerationBackend`],
//!   including JSON-schema-constrained structured output
//! - A bounded-retry policy for generative call sites
//! - A deterministic mock backend for tests (feature `mock`)
//!
//! # Feature Flags
//!
//! - `mock`: Enable the mock backend (downstream crates use it in
//!   dev-dependencies)
//!
//! # Example
//!
//! ```rust,no_run
//! use keeper_core::GenerationBackend;
//! use keeper_inference::OllamaBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OllamaBackend::from_env();
//!     let text = backend.generate("Summarize SIFT in one line").await.unwrap();
//!     println!("{text}");
//! }
//! ```

pub mod ollama;
pub mod retry;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use keeper_core::*;

pub use ollama::OllamaBackend;
pub use retry::GenRetryPolicy;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerationBackend;
