//! Patch Notes Composer.
//!
//! Turns a classified change set into the structured patch-notes document:
//! attach evidence, prompt the backend under a strict JSON schema, and fall
//! back to the canned document when generation fails. The plain entry point
//! never errors; the cancellable variant surfaces only cancellation.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value as JsonValue};
use tracing::{info, instrument, warn};

use keeper_core::{
    CancelToken, DiffChange, Error, EvidenceSource, GenerationBackend, PatchNotes, Result, Sourced,
};
use keeper_inference::GenRetryPolicy;

use crate::evidence::{attach_evidence, FixtureEvidence};
use crate::fallback::fallback_patch_notes;

/// Composes patch notes from classified changes.
pub struct PatchNotesWriter {
    backend: Arc<dyn GenerationBackend>,
    evidence: Box<dyn EvidenceSource>,
    retry: GenRetryPolicy,
}

impl PatchNotesWriter {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            evidence: Box::new(FixtureEvidence),
            retry: GenRetryPolicy::default(),
        }
    }

    /// Replace the default fixture evidence source.
    pub fn with_evidence_source(mut self, evidence: Box<dyn EvidenceSource>) -> Self {
        self.evidence = evidence;
        self
    }

    /// Retry failed generation calls before falling back.
    pub fn with_retry_policy(mut self, retry: GenRetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Generate patch notes for `subject_title` readers frozen at
    /// `baseline_year`.
    ///
    /// Evidence is attached and `low_evidence` recomputed before the prompt
    /// is built. Generation failures are absorbed: the result is tagged
    /// [`Sourced::generated`] on success and [`Sourced::fallback`] with the
    /// canned document otherwise.
    #[instrument(skip_all, fields(subsystem = "notes", component = "writer", op = "generate_patch_notes", subject = subject_title, change_count = changes.len(), baseline_year = baseline_year, target_year = year))]
    pub async fn generate_patch_notes(
        &self,
        changes: &[DiffChange],
        year: i32,
        baseline_year: i32,
        subject_title: &str,
    ) -> Sourced<PatchNotes> {
        let start = Instant::now();
        match self
            .generate_inner(changes, year, baseline_year, subject_title)
            .await
        {
            Ok(notes) => {
                info!(
                    tldr_count = notes.tldr.len(),
                    step_count = notes.delta_path.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Generated patch notes"
                );
                Sourced::generated(notes)
            }
            Err(e) => {
                warn!(error = %e, "Patch notes generation failed, using fallback document");
                Sourced::fallback(fallback_patch_notes(year, baseline_year))
            }
        }
    }

    /// As [`generate_patch_notes`](Self::generate_patch_notes), racing
    /// against a cancellation token.
    ///
    /// Cancellation yields `Err(Error::Cancelled)` with no fallback.
    pub async fn generate_patch_notes_with_cancel(
        &self,
        changes: &[DiffChange],
        year: i32,
        baseline_year: i32,
        subject_title: &str,
        mut token: CancelToken,
    ) -> Result<Sourced<PatchNotes>> {
        // Biased, cancellation first: a token cancelled before or during the
        // call must win over an instantly-ready generation future.
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(Error::Cancelled),
            result = self.generate_patch_notes(changes, year, baseline_year, subject_title) => Ok(result),
        }
    }

    async fn generate_inner(
        &self,
        changes: &[DiffChange],
        year: i32,
        baseline_year: i32,
        subject_title: &str,
    ) -> Result<PatchNotes> {
        let enriched = attach_evidence(self.evidence.as_ref(), changes).await;

        let system = format!(
            "You are writing educational \"patch notes\" that explain how {subject_title} has evolved.\n\
             CRITICAL RULES:\n\
             1. Every factual claim MUST include [citation_key]\n\
             2. If fewer than 2 citations exist, add \"(Low evidence)\"\n\
             3. Be concise but comprehensive\n\
             4. Write for someone with {baseline_year} knowledge"
        );
        let prompt = build_prompt(&enriched, year, baseline_year, subject_title);
        let schema = patch_notes_schema();

        let raw = self
            .retry
            .run(|| self.backend.generate_structured(&system, &prompt, &schema))
            .await?;

        serde_json::from_value(raw).map_err(|e| {
            Error::Serialization(format!("Non-conforming patch notes output: {}", e))
        })
    }
}

fn build_prompt(
    changes: &[DiffChange],
    year: i32,
    baseline_year: i32,
    subject_title: &str,
) -> String {
    let mut summary = String::new();
    for c in changes {
        let _ = write!(
            summary,
            "\n- [{}] {} -> {}\n  Rationale: {}\n  Evidence: {} sources{}",
            c.kind,
            c.from_title.as_deref().unwrap_or("N/A"),
            c.to_title.as_deref().unwrap_or("N/A"),
            c.rationale,
            c.evidence.len(),
            if c.low_evidence { "\n  LOW EVIDENCE" } else { "" },
        );
    }

    format!(
        "Generate {year} patch notes for someone who learned {subject_title} in {baseline_year}.\n\
         \n\
         Key Changes Detected:\n\
         {summary}\n\
         \n\
         Create comprehensive patch notes that:\n\
         1. Summarize the most important changes in TL;DR\n\
         2. Organize changes into thematic sections\n\
         3. Include a practical learning path (4-8 hours total)\n\
         4. Cite every claim with [source_key]\n\
         5. Mark claims with < 2 citations as \"(Low evidence)\""
    )
}

fn patch_notes_schema() -> JsonValue {
    let string_array = |description: &str| {
        json!({
            "type": "array",
            "items": { "type": "string" },
            "description": description
        })
    };

    json!({
        "type": "object",
        "properties": {
            "tldr": string_array("3-5 bullet points summarizing the most important changes"),
            "sections": {
                "type": "object",
                "properties": {
                    "major": string_array("Major paradigm shifts with [citations]"),
                    "tools": string_array("New tools and frameworks with [citations]"),
                    "resources": string_array("New learning resources with [citations]"),
                    "corrections": string_array("Corrections to outdated knowledge with [citations]"),
                    "emerging": string_array("Emerging trends (may have lower evidence) with [citations]")
                },
                "required": ["major", "tools", "resources", "corrections", "emerging"]
            },
            "deltaPath": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "hours": { "type": "number" },
                        "link": { "type": "string" },
                        "type": {
                            "type": "string",
                            "enum": ["paper", "video", "doc", "course"]
                        }
                    },
                    "required": ["title", "hours", "link", "type"]
                },
                "description": "4-8 hour learning path to catch up"
            },
            "bibliography": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "key": { "type": "string" },
                        "title": { "type": "string" },
                        "url": { "type": "string" },
                        "venue": { "type": "string" },
                        "year": { "type": "number" }
                    },
                    "required": ["key", "title", "url", "venue", "year"]
                }
            }
        },
        "required": ["tldr", "sections", "deltaPath", "bibliography"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use keeper_core::{cancel_pair, ChangeKind, Provenance};
    use keeper_inference::MockGenerationBackend;

    fn demo_changes() -> Vec<DiffChange> {
        vec![
            DiffChange {
                kind: ChangeKind::Add,
                from_title: None,
                to_title: Some("Convolutional Neural Networks".to_string()),
                rationale: "CNNs became the dominant approach after AlexNet 2012".to_string(),
                confidence: 0.95,
                evidence: Vec::new(),
                low_evidence: false,
            },
            DiffChange {
                kind: ChangeKind::Deprecate,
                from_title: Some("SIFT Features".to_string()),
                to_title: None,
                rationale: "Hand-crafted features largely replaced by learned CNN features"
                    .to_string(),
                confidence: 0.85,
                evidence: Vec::new(),
                low_evidence: false,
            },
        ]
    }

    fn minimal_notes_json() -> JsonValue {
        json!({
            "tldr": ["CNNs took over [alexnet_2012]"],
            "sections": {
                "major": ["Deep learning displaced classical pipelines [alexnet_2012]"],
                "tools": [],
                "resources": [],
                "corrections": [],
                "emerging": []
            },
            "deltaPath": [
                { "title": "AlexNet paper", "hours": 1.5, "link": "https://papers.nips.cc/2012", "type": "paper" }
            ],
            "bibliography": [
                { "key": "alexnet_2012", "title": "ImageNet Classification with Deep CNNs", "url": "https://papers.nips.cc/2012", "venue": "NIPS", "year": 2012 }
            ]
        })
    }

    #[tokio::test]
    async fn test_successful_generation_is_generated() {
        let backend = Arc::new(
            MockGenerationBackend::new().with_structured_response(minimal_notes_json()),
        );
        let writer = PatchNotesWriter::new(backend);

        let result = writer
            .generate_patch_notes(&demo_changes(), 2014, 2010, "Computer Vision")
            .await;
        assert_eq!(result.source, Provenance::Generated);
        assert_eq!(result.value.tldr, vec!["CNNs took over [alexnet_2012]"]);
        assert_eq!(result.value.delta_path[0].hours, 1.5);
    }

    #[tokio::test]
    async fn test_backend_failure_yields_fallback_document() {
        let writer = PatchNotesWriter::new(Arc::new(MockGenerationBackend::failing()));

        let result = writer
            .generate_patch_notes(&demo_changes(), 2014, 2010, "Computer Vision")
            .await;
        assert!(result.is_fallback());
        assert_eq!(result.value, fallback_patch_notes(2014, 2010));
        assert!(result.value.tldr[0].contains("between 2010 and 2014"));
    }

    #[tokio::test]
    async fn test_malformed_output_yields_fallback() {
        let backend = Arc::new(
            MockGenerationBackend::new().with_structured_response(json!({ "tldr": "not an array" })),
        );
        let writer = PatchNotesWriter::new(backend);

        let result = writer
            .generate_patch_notes(&demo_changes(), 2014, 2010, "Computer Vision")
            .await;
        assert!(result.is_fallback());
    }

    #[tokio::test]
    async fn test_prompt_carries_enriched_evidence_counts() {
        let backend = Arc::new(
            MockGenerationBackend::new().with_structured_response(minimal_notes_json()),
        );
        let writer = PatchNotesWriter::new(backend.clone());

        writer
            .generate_patch_notes(&demo_changes(), 2014, 2010, "Computer Vision")
            .await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        let prompt = &calls[0].prompt;
        // ADD gets two fixture sources; DEPRECATE gets one and is low evidence.
        assert!(prompt.contains("Evidence: 2 sources"));
        assert!(prompt.contains("Evidence: 1 sources"));
        assert!(prompt.contains("LOW EVIDENCE"));
        assert!(prompt.contains("learned Computer Vision in 2010"));
    }

    #[tokio::test]
    async fn test_cancel_before_start_returns_cancelled() {
        let writer = PatchNotesWriter::new(Arc::new(MockGenerationBackend::failing()));
        let (handle, token) = cancel_pair();
        handle.cancel();

        let result = writer
            .generate_patch_notes_with_cancel(&demo_changes(), 2014, 2010, "Computer Vision", token)
            .await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn test_precancelled_token_never_loses_to_ready_backend() {
        // The mock resolves immediately, so an unbiased race would let the
        // generation future win some of the time.
        let backend = Arc::new(
            MockGenerationBackend::new().with_structured_response(minimal_notes_json()),
        );
        let writer = PatchNotesWriter::new(backend);

        for iteration in 0..100 {
            let (handle, token) = cancel_pair();
            handle.cancel();
            let result = writer
                .generate_patch_notes_with_cancel(
                    &demo_changes(),
                    2014,
                    2010,
                    "Computer Vision",
                    token,
                )
                .await;
            assert!(
                matches!(result, Err(Error::Cancelled)),
                "iteration {iteration}: cancelled token did not cancel"
            );
        }
    }

    #[tokio::test]
    async fn test_uncancelled_token_passes_through() {
        let backend = Arc::new(
            MockGenerationBackend::new().with_structured_response(minimal_notes_json()),
        );
        let writer = PatchNotesWriter::new(backend);
        let (_handle, token) = cancel_pair();

        let result = writer
            .generate_patch_notes_with_cancel(&demo_changes(), 2014, 2010, "Computer Vision", token)
            .await
            .unwrap();
        assert_eq!(result.source, Provenance::Generated);
    }
}
