//! Mock generation backend for deterministic testing.
//!
//! Failures are scripted, not probabilistic: pipeline fallback behavior is a
//! contract, so the tests that exercise it must be reproducible.
//!
//! ## Usage
//!
//! ```rust
//! use keeper_core::GenerationBackend;
//! use keeper_inference::mock::MockGenerationBackend;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let backend = MockGenerationBackend::new().with_fixed_response("Test response");
//! let text = backend.generate("anything").await.unwrap();
//! assert_eq!(text, "Test response");
//! # }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use keeper_core::{Error, GenerationBackend, Result};

/// Mock generation backend for testing.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone, Default)]
struct MockConfig {
    fixed_responses: HashMap<String, String>,
    default_response: String,
    structured_response: Option<JsonValue>,
    always_fail: bool,
}

/// One logged backend invocation, for assertions.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub system: String,
    pub prompt: String,
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig {
                default_response: "Mock response".to_string(),
                ..MockConfig::default()
            }),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a backend whose every call fails with an inference error.
    pub fn failing() -> Self {
        Self::new().with_always_fail()
    }

    /// Set a fixed response for plain generation requests.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Add a response mapping for a specific prompt.
    pub fn with_response_mapping(
        mut self,
        prompt: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .fixed_responses
            .insert(prompt.into(), output.into());
        self
    }

    /// Set the value returned by structured generation calls.
    pub fn with_structured_response(mut self, value: JsonValue) -> Self {
        Arc::make_mut(&mut self.config).structured_response = Some(value);
        self
    }

    /// Make every call fail deterministically.
    pub fn with_always_fail(mut self) -> Self {
        Arc::make_mut(&mut self.config).always_fail = true;
        self
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of structured generation calls made.
    pub fn structured_call_count(&self) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == "generate_structured")
            .count()
    }

    fn log_call(&self, operation: &str, system: &str, prompt: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            system: system.to_string(),
            prompt: prompt.to_string(),
        });
    }

    fn fail_if_scripted(&self) -> Result<()> {
        if self.config.always_fail {
            Err(Error::Inference("simulated backend failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.log_call("generate", system, prompt);
        self.fail_if_scripted()?;

        if let Some(response) = self.config.fixed_responses.get(prompt) {
            return Ok(response.clone());
        }
        Ok(self.config.default_response.clone())
    }

    async fn generate_structured(
        &self,
        system: &str,
        prompt: &str,
        _schema: &JsonValue,
    ) -> Result<JsonValue> {
        self.log_call("generate_structured", system, prompt);
        self.fail_if_scripted()?;

        self.config.structured_response.clone().ok_or_else(|| {
            Error::Serialization("mock backend has no structured response scripted".to_string())
        })
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fixed_response() {
        let backend = MockGenerationBackend::new().with_fixed_response("Custom response");
        assert_eq!(backend.generate("prompt").await.unwrap(), "Custom response");
    }

    #[tokio::test]
    async fn test_response_mapping() {
        let backend = MockGenerationBackend::new()
            .with_response_mapping("hello", "world")
            .with_response_mapping("foo", "bar");

        assert_eq!(backend.generate("hello").await.unwrap(), "world");
        assert_eq!(backend.generate("foo").await.unwrap(), "bar");
        assert_eq!(backend.generate("other").await.unwrap(), "Mock response");
    }

    #[tokio::test]
    async fn test_structured_response() {
        let value = json!({"changes": []});
        let backend = MockGenerationBackend::new().with_structured_response(value.clone());
        let out = backend
            .generate_structured("sys", "prompt", &json!({"type": "object"}))
            .await
            .unwrap();
        assert_eq!(out, value);
    }

    #[tokio::test]
    async fn test_structured_without_script_errors() {
        let backend = MockGenerationBackend::new();
        let result = backend
            .generate_structured("", "p", &json!({"type": "object"}))
            .await;
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[tokio::test]
    async fn test_always_fail() {
        let backend = MockGenerationBackend::failing();
        assert!(backend.generate("p").await.is_err());
        assert!(backend
            .generate_structured("", "p", &json!({}))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_call_logging() {
        let backend = MockGenerationBackend::new().with_structured_response(json!({}));

        backend.generate("one").await.unwrap();
        backend.generate_with_system("sys", "two").await.unwrap();
        backend.generate_structured("sys", "three", &json!({})).await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].system, "sys");
        assert_eq!(backend.structured_call_count(), 1);
    }
}
