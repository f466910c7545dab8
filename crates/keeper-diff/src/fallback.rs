//! Deterministic fallback change table.
//!
//! When the generation backend is unreachable or returns non-conforming
//! output, the classifier substitutes this fixed set of five changes (one
//! per change kind) so downstream stages and demos keep working offline.

use keeper_core::{ChangeKind, DiffChange};

/// The canned classification used when generation fails.
///
/// One change per [`ChangeKind`], framed around the computer-vision
/// 2010-to-2014 demo subject. Evidence is left empty; enrichment attaches
/// it later like any generated change.
pub fn fallback_changes() -> Vec<DiffChange> {
    vec![
        DiffChange {
            kind: ChangeKind::Add,
            from_title: None,
            to_title: Some("Transformer Architecture".to_string()),
            rationale: "Transformers revolutionized NLP and computer vision after 2017, \
                        completely absent from 2010 curriculum"
                .to_string(),
            confidence: 0.95,
            evidence: Vec::new(),
            low_evidence: false,
        },
        DiffChange {
            kind: ChangeKind::Deprecate,
            from_title: Some("SIFT Features".to_string()),
            to_title: None,
            rationale: "While historically important, SIFT has been largely replaced by \
                        learned features from CNNs"
                .to_string(),
            confidence: 0.8,
            evidence: Vec::new(),
            low_evidence: false,
        },
        DiffChange {
            kind: ChangeKind::Rename,
            from_title: Some("Deep Belief Networks".to_string()),
            to_title: Some("Deep Neural Networks".to_string()),
            rationale: "The terminology shifted as the field standardized around \
                        feedforward and convolutional architectures"
                .to_string(),
            confidence: 0.85,
            evidence: Vec::new(),
            low_evidence: false,
        },
        DiffChange {
            kind: ChangeKind::Correct,
            from_title: Some("Feature Engineering is Essential".to_string()),
            to_title: Some("End-to-End Learning".to_string()),
            rationale: "The 2010 emphasis on hand-crafted features was replaced by \
                        end-to-end learning paradigm"
                .to_string(),
            confidence: 0.9,
            evidence: Vec::new(),
            low_evidence: false,
        },
        DiffChange {
            kind: ChangeKind::Emerge,
            from_title: None,
            to_title: Some("Vision-Language Models (CLIP)".to_string()),
            rationale: "Multimodal models combining vision and language are emerging as \
                        a new paradigm"
                .to_string(),
            confidence: 0.7,
            evidence: Vec::new(),
            low_evidence: false,
        },
    ]
}
