//! Change classification between a baseline curriculum and the current canon.
//!
//! `DiffAnalysisEngine` maps baseline topics to candidate canon items, asks
//! the generation backend for a schema-constrained classification, and falls
//! back to the canned change table when generation fails. The plain entry
//! point never errors; the cancellable variant surfaces only cancellation.

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::{info, instrument, warn};

use keeper_core::{
    BaselineTopic, CanonItem, CancelToken, DiffChange, Error, GenerationBackend, Result, Sourced,
    TopicMatcher,
};
use keeper_inference::GenRetryPolicy;

use crate::fallback::fallback_changes;
use crate::mapper::{map_with_matcher, KeywordMatcher};

const CLASSIFY_SYSTEM_PROMPT: &str =
    "You are an expert at analyzing knowledge evolution in academic fields.";

/// Envelope shape the classification schema constrains the model to.
#[derive(Debug, Deserialize)]
struct ClassificationEnvelope {
    changes: Vec<DiffChange>,
}

/// Classifies field evolution between two years.
pub struct DiffAnalysisEngine {
    backend: Arc<dyn GenerationBackend>,
    matcher: Box<dyn TopicMatcher>,
    retry: GenRetryPolicy,
}

impl DiffAnalysisEngine {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            matcher: Box::new(KeywordMatcher::default()),
            retry: GenRetryPolicy::default(),
        }
    }

    /// Replace the default keyword matcher.
    pub fn with_matcher(mut self, matcher: Box<dyn TopicMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Retry failed generation calls before falling back.
    pub fn with_retry_policy(mut self, retry: GenRetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Classify changes from `baseline_year` to `year`.
    ///
    /// Generation failures are absorbed: the result is tagged
    /// [`Sourced::generated`] on success and [`Sourced::fallback`] with the
    /// canned change table otherwise. Returned changes carry no evidence;
    /// enrichment attaches it downstream.
    #[instrument(skip_all, fields(subsystem = "diff", component = "classifier", op = "classify_changes", topic_count = baseline.len(), canon_count = canon.len(), baseline_year = baseline_year, target_year = year))]
    pub async fn classify_changes(
        &self,
        baseline: &[BaselineTopic],
        canon: &[CanonItem],
        year: i32,
        baseline_year: i32,
    ) -> Sourced<Vec<DiffChange>> {
        let start = Instant::now();
        match self.classify_inner(baseline, canon, year, baseline_year).await {
            Ok(changes) => {
                info!(
                    change_count = changes.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Classified changes"
                );
                Sourced::generated(changes)
            }
            Err(e) => {
                warn!(error = %e, "Classification failed, using fallback changes");
                Sourced::fallback(fallback_changes())
            }
        }
    }

    /// As [`classify_changes`](Self::classify_changes), racing against a
    /// cancellation token.
    ///
    /// Cancellation yields `Err(Error::Cancelled)` with no fallback; any
    /// other outcome matches the plain variant.
    pub async fn classify_changes_with_cancel(
        &self,
        baseline: &[BaselineTopic],
        canon: &[CanonItem],
        year: i32,
        baseline_year: i32,
        mut token: CancelToken,
    ) -> Result<Sourced<Vec<DiffChange>>> {
        // Biased, cancellation first: a token cancelled before or during the
        // call must win over an instantly-ready classification future.
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(Error::Cancelled),
            result = self.classify_changes(baseline, canon, year, baseline_year) => Ok(result),
        }
    }

    async fn classify_inner(
        &self,
        baseline: &[BaselineTopic],
        canon: &[CanonItem],
        year: i32,
        baseline_year: i32,
    ) -> Result<Vec<DiffChange>> {
        let prompt = self.build_prompt(baseline, canon, year, baseline_year)?;
        let schema = classification_schema();

        let raw = self
            .retry
            .run(|| {
                self.backend
                    .generate_structured(CLASSIFY_SYSTEM_PROMPT, &prompt, &schema)
            })
            .await?;

        let envelope: ClassificationEnvelope = serde_json::from_value(raw).map_err(|e| {
            Error::Serialization(format!("Non-conforming classification output: {}", e))
        })?;

        Ok(envelope.changes.into_iter().map(sanitize_change).collect())
    }

    fn build_prompt(
        &self,
        baseline: &[BaselineTopic],
        canon: &[CanonItem],
        year: i32,
        baseline_year: i32,
    ) -> Result<String> {
        let relevant_canon: Vec<&CanonItem> =
            canon.iter().filter(|c| c.year <= year).collect();

        let mappings = map_with_matcher(self.matcher.as_ref(), baseline, canon, year);
        // Sorted entry list keeps the prompt deterministic across runs.
        let mut mapping_entries: Vec<(&String, &Vec<CanonItem>)> = mappings.iter().collect();
        mapping_entries.sort_by_key(|(id, _)| id.as_str());

        Ok(format!(
            "You are analyzing knowledge evolution in a field from {baseline_year} to {year}.\n\
             \n\
             Baseline topics (what was taught in {baseline_year}):\n\
             {baseline_json}\n\
             \n\
             Current canon items (what exists in {year}):\n\
             {canon_json}\n\
             \n\
             Topic mappings:\n\
             {mappings_json}\n\
             \n\
             Classify changes into these categories:\n\
             - ADD: Completely new concepts/tools not in baseline\n\
             - RENAME: Same concept, different name/terminology\n\
             - DEPRECATE: Baseline topic no longer relevant/used\n\
             - CORRECT: Baseline had misconception, now corrected\n\
             - EMERGE: Experimental/cutting-edge (lower confidence)",
            baseline_json = serde_json::to_string_pretty(baseline)?,
            canon_json = serde_json::to_string_pretty(&relevant_canon)?,
            mappings_json = serde_json::to_string_pretty(&mapping_entries)?,
        ))
    }
}

/// Strip model-supplied evidence and clamp confidence into range.
///
/// Evidence attachment belongs to enrichment; anything the model invents
/// here is discarded.
fn sanitize_change(mut change: DiffChange) -> DiffChange {
    change.evidence.clear();
    change.low_evidence = false;
    change.confidence = change.confidence.clamp(0.0, 1.0);
    change
}

fn classification_schema() -> JsonValue {
    json!({
        "type": "object",
        "properties": {
            "changes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "changeType": {
                            "type": "string",
                            "enum": ["ADD", "RENAME", "DEPRECATE", "CORRECT", "EMERGE"]
                        },
                        "fromTitle": { "type": "string" },
                        "toTitle": { "type": "string" },
                        "rationale": { "type": "string" },
                        "confidence": { "type": "number", "minimum": 0, "maximum": 1 }
                    },
                    "required": ["changeType", "rationale", "confidence"]
                }
            }
        },
        "required": ["changes"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use keeper_core::{cancel_pair, ChangeKind, Provenance, TopicKind};
    use keeper_inference::MockGenerationBackend;

    fn demo_baseline() -> Vec<BaselineTopic> {
        vec![BaselineTopic {
            id: "1".to_string(),
            name: "SIFT Features".to_string(),
            kind: TopicKind::Method,
            section: Some("Feature Detection".to_string()),
            summary: None,
        }]
    }

    fn demo_canon() -> Vec<CanonItem> {
        vec![CanonItem {
            title: "Convolutional Neural Networks (AlexNet)".to_string(),
            url: "https://papers.nips.cc/paper/2012".to_string(),
            venue: "NIPS".to_string(),
            year: 2012,
            kind: keeper_core::CanonKind::Paper,
            summary: "Deep CNNs achieve breakthrough on ImageNet".to_string(),
            confidence: None,
        }]
    }

    fn mock_with_changes(changes: JsonValue) -> Arc<MockGenerationBackend> {
        Arc::new(
            MockGenerationBackend::new().with_structured_response(json!({ "changes": changes })),
        )
    }

    #[tokio::test]
    async fn test_successful_classification_is_generated() {
        let backend = mock_with_changes(json!([{
            "changeType": "ADD",
            "toTitle": "Convolutional Neural Networks",
            "rationale": "CNNs displaced hand-crafted features",
            "confidence": 0.9
        }]));
        let engine = DiffAnalysisEngine::new(backend);

        let result = engine
            .classify_changes(&demo_baseline(), &demo_canon(), 2014, 2010)
            .await;
        assert_eq!(result.source, Provenance::Generated);
        assert_eq!(result.value.len(), 1);
        assert_eq!(result.value[0].kind, ChangeKind::Add);
        assert_eq!(
            result.value[0].to_title.as_deref(),
            Some("Convolutional Neural Networks")
        );
    }

    #[tokio::test]
    async fn test_model_evidence_is_discarded_and_confidence_clamped() {
        let backend = mock_with_changes(json!([{
            "changeType": "EMERGE",
            "toTitle": "Vision-Language Models",
            "rationale": "Multimodal models are emerging",
            "confidence": 1.7,
            "evidence": [{
                "title": "made up",
                "url": "https://example.org",
                "venue": "nowhere",
                "year": 2021
            }],
            "lowEvidence": true
        }]));
        let engine = DiffAnalysisEngine::new(backend);

        let result = engine
            .classify_changes(&demo_baseline(), &demo_canon(), 2014, 2010)
            .await;
        assert_eq!(result.value[0].confidence, 1.0);
        assert!(result.value[0].evidence.is_empty());
        assert!(!result.value[0].low_evidence);
    }

    #[tokio::test]
    async fn test_backend_failure_yields_fallback() {
        let engine = DiffAnalysisEngine::new(Arc::new(MockGenerationBackend::failing()));

        let result = engine
            .classify_changes(&demo_baseline(), &demo_canon(), 2014, 2010)
            .await;
        assert!(result.is_fallback());
        assert_eq!(result.value, fallback_changes());
    }

    #[tokio::test]
    async fn test_malformed_envelope_yields_fallback() {
        let backend = Arc::new(
            MockGenerationBackend::new().with_structured_response(json!({ "wrong": [] })),
        );
        let engine = DiffAnalysisEngine::new(backend);

        let result = engine
            .classify_changes(&demo_baseline(), &demo_canon(), 2014, 2010)
            .await;
        assert!(result.is_fallback());
    }

    #[tokio::test]
    async fn test_retry_exhaustion_still_falls_back() {
        let backend = Arc::new(MockGenerationBackend::failing());
        let engine = DiffAnalysisEngine::new(backend.clone())
            .with_retry_policy(GenRetryPolicy {
                max_retries: 2,
                initial_backoff: std::time::Duration::from_millis(1),
            });

        let result = engine
            .classify_changes(&demo_baseline(), &demo_canon(), 2014, 2010)
            .await;
        assert!(result.is_fallback());
        assert_eq!(backend.structured_call_count(), 3);
    }

    #[tokio::test]
    async fn test_cancel_before_start_returns_cancelled() {
        let engine = DiffAnalysisEngine::new(Arc::new(MockGenerationBackend::failing()));
        let (handle, token) = cancel_pair();
        handle.cancel();

        let result = engine
            .classify_changes_with_cancel(&demo_baseline(), &demo_canon(), 2014, 2010, token)
            .await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn test_precancelled_token_never_loses_to_ready_backend() {
        // The mock resolves immediately, so an unbiased race would let the
        // classification future win some of the time.
        let backend = mock_with_changes(json!([{
            "changeType": "ADD",
            "toTitle": "Convolutional Neural Networks",
            "rationale": "CNNs displaced hand-crafted features",
            "confidence": 0.9
        }]));
        let engine = DiffAnalysisEngine::new(backend);

        for iteration in 0..100 {
            let (handle, token) = cancel_pair();
            handle.cancel();
            let result = engine
                .classify_changes_with_cancel(&demo_baseline(), &demo_canon(), 2014, 2010, token)
                .await;
            assert!(
                matches!(result, Err(Error::Cancelled)),
                "iteration {iteration}: cancelled token did not cancel"
            );
        }
    }

    #[tokio::test]
    async fn test_uncancelled_token_passes_through() {
        let backend = mock_with_changes(json!([{
            "changeType": "RENAME",
            "fromTitle": "Deep Belief Networks",
            "toTitle": "Deep Neural Networks",
            "rationale": "Terminology standardized",
            "confidence": 0.85
        }]));
        let engine = DiffAnalysisEngine::new(backend);
        let (_handle, token) = cancel_pair();

        let result = engine
            .classify_changes_with_cancel(&demo_baseline(), &demo_canon(), 2014, 2010, token)
            .await
            .unwrap();
        assert_eq!(result.source, Provenance::Generated);
        assert_eq!(result.value[0].kind, ChangeKind::Rename);
    }
}
