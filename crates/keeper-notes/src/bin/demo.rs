//! keeper-demo - run the full pipeline over the Computer Vision fixture data
//!
//! Maps the 2010 baseline onto the 2014 canon, classifies changes, composes
//! patch notes, and validates citations. Works offline: with no model
//! reachable, the classifier and composer degrade to their fallback output
//! and the demo still prints a complete document.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keeper_core::{BaselineTopic, CanonItem, CanonKind, TopicKind};
use keeper_corpus::ArxivClient;
use keeper_diff::{map_baseline_to_canon, rank_changes_by_importance, ChangeStats, DiffAnalysisEngine};
use keeper_inference::OllamaBackend;
use keeper_notes::{validate_citations, CorpusEvidence, PatchNotesWriter};

const BASELINE_YEAR: i32 = 2010;
const TARGET_YEAR: i32 = 2014;
const SUBJECT: &str = "Computer Vision";

fn fixture_baseline() -> Vec<BaselineTopic> {
    let rows: [(&str, &str, TopicKind, &str, &str); 4] = [
        (
            "1",
            "SIFT Features",
            TopicKind::Method,
            "Feature Detection",
            "Scale-Invariant Feature Transform for object recognition",
        ),
        (
            "2",
            "Bag of Visual Words",
            TopicKind::Method,
            "Image Classification",
            "Histogram-based image representation",
        ),
        (
            "3",
            "Epipolar Geometry",
            TopicKind::Concept,
            "Multiple View Geometry",
            "Geometric constraints between stereo images",
        ),
        (
            "4",
            "Deep Belief Networks",
            TopicKind::Method,
            "Machine Learning",
            "Unsupervised learning with stacked RBMs",
        ),
    ];
    rows.into_iter()
        .map(|(id, name, kind, section, summary)| BaselineTopic {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            section: Some(section.to_string()),
            summary: Some(summary.to_string()),
        })
        .collect()
}

fn fixture_canon() -> Vec<CanonItem> {
    let rows: [(&str, &str, &str, i32, CanonKind, &str); 5] = [
        (
            "Convolutional Neural Networks (AlexNet)",
            "https://papers.nips.cc/paper/2012/file/c399862d3b9d6b76c8436e924a68c45b-Paper.pdf",
            "NIPS",
            2012,
            CanonKind::Paper,
            "Deep CNNs achieve breakthrough on ImageNet",
        ),
        (
            "R-CNN: Region-based Convolutional Networks",
            "https://arxiv.org/abs/1311.2524",
            "CVPR",
            2014,
            CanonKind::Paper,
            "Object detection using CNNs on region proposals",
        ),
        (
            "Caffe Deep Learning Framework",
            "https://caffe.berkeleyvision.org/",
            "Berkeley",
            2014,
            CanonKind::Tool,
            "Fast, open framework for deep learning",
        ),
        (
            "Deep Neural Networks",
            "https://www.deeplearningbook.org/",
            "MIT Press",
            2014,
            CanonKind::Concept,
            "Feedforward and convolutional architectures for vision",
        ),
        (
            "Epipolar Geometry and Structure from Motion",
            "https://www.cs.cmu.edu/~16385/",
            "CMU Course",
            2014,
            CanonKind::Course,
            "Fundamental matrix and 3D reconstruction",
        ),
    ];
    rows.into_iter()
        .map(|(title, url, venue, year, kind, summary)| CanonItem {
            title: title.to_string(),
            url: url.to_string(),
            venue: venue.to_string(),
            year,
            kind,
            summary: summary.to_string(),
            confidence: None,
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "keeper_demo=info,keeper_diff=info,keeper_notes=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let baseline = fixture_baseline();
    let canon = fixture_canon();
    info!(
        topic_count = baseline.len(),
        canon_count = canon.len(),
        "Loaded fixture subject"
    );

    println!("=== {SUBJECT}: {BASELINE_YEAR} -> {TARGET_YEAR} ===\n");

    let mappings = map_baseline_to_canon(&baseline, &canon, TARGET_YEAR);
    println!("Topic mappings:");
    for topic in &baseline {
        let candidates = mappings.get(&topic.id).map(Vec::as_slice).unwrap_or(&[]);
        println!("  {} -> {} candidate(s)", topic.name, candidates.len());
        for item in candidates {
            println!("      {} ({}, {})", item.title, item.venue, item.year);
        }
    }

    let backend = Arc::new(OllamaBackend::from_env());
    let engine = DiffAnalysisEngine::new(backend.clone());
    let classified = engine
        .classify_changes(&baseline, &canon, TARGET_YEAR, BASELINE_YEAR)
        .await;
    println!(
        "\nClassified changes ({}, ranked by importance):",
        classified.source
    );

    let ranked = rank_changes_by_importance(classified.value);
    for (idx, change) in ranked.iter().enumerate() {
        println!(
            "  {}. [{}] {} -> {}",
            idx + 1,
            change.kind,
            change.from_title.as_deref().unwrap_or(""),
            change.to_title.as_deref().unwrap_or(""),
        );
        println!("     Rationale: {}", change.rationale);
        println!("     Confidence: {:.0}%", change.confidence * 100.0);
    }

    let stats = ChangeStats::from_changes(&ranked);
    println!("\nChange statistics:");
    println!("  Total: {}", stats.total);
    println!("  Additions: {}", stats.adds);
    println!("  Deprecations: {}", stats.deprecates);
    println!("  Renames: {}", stats.renames);
    println!("  Corrections: {}", stats.corrections);
    println!("  Emerging: {}", stats.emerging);

    // Evidence comes from the fixture tables unless a corpus endpoint is
    // configured.
    let mut writer = PatchNotesWriter::new(backend);
    if std::env::var("KEEPER_CORPUS_URL").is_ok() {
        let corpus = Arc::new(ArxivClient::from_env());
        writer = writer.with_evidence_source(Box::new(CorpusEvidence::new(corpus, TARGET_YEAR)));
        info!("Using corpus-backed evidence");
    }
    let notes = writer
        .generate_patch_notes(&ranked, TARGET_YEAR, BASELINE_YEAR, SUBJECT)
        .await;
    println!("\nPatch notes ({}):", notes.source);
    let notes = notes.value;

    println!("\nTL;DR:");
    for point in &notes.tldr {
        println!("  - {point}");
    }
    println!("\nMajor shifts:");
    for entry in &notes.sections.major {
        println!("  - {entry}");
    }
    println!("\nNew tools:");
    for entry in &notes.sections.tools {
        println!("  - {entry}");
    }
    println!("\nLearning path ({} hours total):", notes.total_hours());
    for step in &notes.delta_path {
        println!("  - {} ({}h) - {}", step.title, step.hours, step.kind);
    }
    println!("\nBibliography: {} sources", notes.bibliography.len());

    let report = validate_citations(&notes);
    if report.valid {
        println!("\nCitations: all properly referenced");
    } else {
        println!("\nCitation issues:");
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }

    Ok(())
}
