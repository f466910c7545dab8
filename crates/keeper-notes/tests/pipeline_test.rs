//! End-to-end pipeline tests: mapper -> classifier -> composer -> validator,
//! over the Computer Vision fixture subject with a mock backend.

use std::sync::Arc;

use serde_json::json;

use keeper_core::{
    BaselineTopic, CanonItem, CanonKind, ChangeKind, Provenance, TopicKind,
};
use keeper_diff::{map_baseline_to_canon, rank_changes_by_importance, DiffAnalysisEngine};
use keeper_inference::MockGenerationBackend;
use keeper_notes::{validate_citations, fallback_patch_notes, PatchNotesWriter};

fn baseline() -> Vec<BaselineTopic> {
    vec![
        BaselineTopic {
            id: "1".to_string(),
            name: "SIFT Features".to_string(),
            kind: TopicKind::Method,
            section: Some("Feature Detection".to_string()),
            summary: Some("Scale-Invariant Feature Transform".to_string()),
        },
        BaselineTopic {
            id: "2".to_string(),
            name: "Deep Belief Networks".to_string(),
            kind: TopicKind::Method,
            section: Some("Machine Learning".to_string()),
            summary: None,
        },
    ]
}

fn canon() -> Vec<CanonItem> {
    vec![
        CanonItem {
            title: "Convolutional Neural Networks (AlexNet)".to_string(),
            url: "https://papers.nips.cc/paper/2012".to_string(),
            venue: "NIPS".to_string(),
            year: 2012,
            kind: CanonKind::Paper,
            summary: "Deep CNNs achieve breakthrough on ImageNet".to_string(),
            confidence: None,
        },
        CanonItem {
            title: "Deep Neural Networks".to_string(),
            url: "https://www.deeplearningbook.org/".to_string(),
            venue: "MIT Press".to_string(),
            year: 2014,
            kind: CanonKind::Concept,
            summary: "Feedforward and convolutional architectures".to_string(),
            confidence: None,
        },
        CanonItem {
            title: "Learning Transferable Visual Models".to_string(),
            url: "https://openai.com/research/clip".to_string(),
            venue: "OpenAI".to_string(),
            year: 2021,
            kind: CanonKind::Paper,
            summary: "Multimodal pretraining".to_string(),
            confidence: None,
        },
    ]
}

#[tokio::test]
async fn offline_pipeline_produces_valid_fallback_document() {
    let backend = Arc::new(MockGenerationBackend::failing());

    let engine = DiffAnalysisEngine::new(backend.clone());
    let classified = engine.classify_changes(&baseline(), &canon(), 2014, 2010).await;
    assert_eq!(classified.source, Provenance::Fallback);
    assert_eq!(classified.value.len(), 5);

    let ranked = rank_changes_by_importance(classified.value);
    assert_eq!(ranked[0].kind, ChangeKind::Add);

    let writer = PatchNotesWriter::new(backend);
    let notes = writer
        .generate_patch_notes(&ranked, 2014, 2010, "Computer Vision")
        .await;
    assert_eq!(notes.source, Provenance::Fallback);
    assert_eq!(notes.value, fallback_patch_notes(2014, 2010));

    // The canned document cites keys outside its own bibliography, so the
    // validator must flag it rather than pass it through.
    let report = validate_citations(&notes.value);
    assert!(!report.valid);
    assert!(report
        .issues
        .iter()
        .any(|i| i.contains("[krizhevsky_2012] not found")));
}

#[tokio::test]
async fn generated_pipeline_round_trips_and_validates_clean() {
    let backend = Arc::new(
        MockGenerationBackend::new()
            .with_structured_response(json!({
                "changes": [
                    {
                        "changeType": "RENAME",
                        "fromTitle": "Deep Belief Networks",
                        "toTitle": "Deep Neural Networks",
                        "rationale": "Terminology standardized",
                        "confidence": 0.85
                    }
                ],
                "tldr": ["Deep learning took over [alexnet_2012]"],
                "sections": {
                    "major": ["CNNs displaced classical pipelines [alexnet_2012]"],
                    "tools": [],
                    "resources": [],
                    "corrections": [],
                    "emerging": ["Early multimodal results (Low evidence)"]
                },
                "deltaPath": [
                    { "title": "AlexNet paper", "hours": 1.0, "link": "https://papers.nips.cc/paper/2012", "type": "paper" },
                    { "title": "CS231n intro", "hours": 3.0, "link": "http://cs231n.stanford.edu", "type": "course" }
                ],
                "bibliography": [
                    { "key": "alexnet_2012", "title": "ImageNet Classification with Deep CNNs", "url": "https://papers.nips.cc/paper/2012", "venue": "NIPS", "year": 2012 }
                ]
            })),
    );

    let engine = DiffAnalysisEngine::new(backend.clone());
    let classified = engine.classify_changes(&baseline(), &canon(), 2014, 2010).await;
    assert_eq!(classified.source, Provenance::Generated);
    assert_eq!(classified.value[0].kind, ChangeKind::Rename);

    let writer = PatchNotesWriter::new(backend);
    let notes = writer
        .generate_patch_notes(&classified.value, 2014, 2010, "Computer Vision")
        .await;
    assert_eq!(notes.source, Provenance::Generated);
    assert_eq!(notes.value.total_hours(), 4.0);

    let report = validate_citations(&notes.value);
    assert!(report.valid, "{:?}", report.issues);
}

#[test]
fn mapper_excludes_future_canon_from_candidates() {
    let mapping = map_baseline_to_canon(&baseline(), &canon(), 2014);
    for candidates in mapping.values() {
        assert!(candidates.iter().all(|c| c.year <= 2014));
    }
    // The 2021 CLIP paper never appears anywhere.
    assert!(mapping
        .values()
        .flatten()
        .all(|c| c.title != "Learning Transferable Visual Models"));
}

#[tokio::test]
async fn classifier_prompt_includes_mappings_and_years() {
    let backend = Arc::new(
        MockGenerationBackend::new().with_structured_response(json!({ "changes": [] })),
    );
    let engine = DiffAnalysisEngine::new(backend.clone());
    engine.classify_changes(&baseline(), &canon(), 2014, 2010).await;

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    let prompt = &calls[0].prompt;
    assert!(prompt.contains("from 2010 to 2014"));
    assert!(prompt.contains("SIFT Features"));
    assert!(prompt.contains("Topic mappings:"));
    assert!(
        !prompt.contains("Learning Transferable Visual Models"),
        "future canon must not leak into the prompt"
    );
}
