//! Value objects flowing through the patch-notes pipeline.
//!
//! All four pipeline stages exchange these types by value; nothing here holds
//! shared mutable state or back-references. Serde renames follow the JSON
//! shape the surrounding application persists and serves (`changeType`,
//! `fromTitle`, `deltaPath`, `lowEvidence`).

use serde::{Deserialize, Serialize};

use crate::defaults;

// ---------------------------------------------------------------------------
// Baseline topics
// ---------------------------------------------------------------------------

/// What kind of knowledge unit a baseline topic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicKind {
    Concept,
    Method,
    System,
    Paper,
}

impl TopicKind {
    pub fn as_str(&self) -> &str {
        match self {
            TopicKind::Concept => "concept",
            TopicKind::Method => "method",
            TopicKind::System => "system",
            TopicKind::Paper => "paper",
        }
    }
}

impl std::fmt::Display for TopicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of knowledge the user studied in their baseline year.
///
/// Immutable once created; owned by a Subject in the enclosing system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineTopic {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TopicKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

// ---------------------------------------------------------------------------
// Canon items
// ---------------------------------------------------------------------------

/// What kind of reference artifact a canon item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonKind {
    Paper,
    Tool,
    Course,
    Concept,
}

impl CanonKind {
    pub fn as_str(&self) -> &str {
        match self {
            CanonKind::Paper => "paper",
            CanonKind::Tool => "tool",
            CanonKind::Course => "course",
            CanonKind::Concept => "concept",
        }
    }
}

impl std::fmt::Display for CanonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reference artifact representing current field knowledge.
///
/// Sourced externally (corpus search/ingestion); read-only input to the
/// pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonItem {
    pub title: String,
    pub url: String,
    pub venue: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub kind: CanonKind,
    pub summary: String,
    /// Confidence score in [0, 1], when the ingestion source provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

// ---------------------------------------------------------------------------
// Classified changes
// ---------------------------------------------------------------------------

/// The taxonomy of how a topic's standing changed between baseline and
/// target year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Completely new concept/tool not in baseline
    #[serde(rename = "ADD")]
    Add,
    /// Same concept, different name/terminology
    #[serde(rename = "RENAME")]
    Rename,
    /// Baseline topic no longer relevant/used
    #[serde(rename = "DEPRECATE")]
    Deprecate,
    /// Baseline had a misconception, now corrected
    #[serde(rename = "CORRECT")]
    Correct,
    /// Experimental/cutting-edge, lower confidence
    #[serde(rename = "EMERGE")]
    Emerge,
}

impl ChangeKind {
    pub const ALL: [ChangeKind; 5] = [
        ChangeKind::Add,
        ChangeKind::Rename,
        ChangeKind::Deprecate,
        ChangeKind::Correct,
        ChangeKind::Emerge,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ChangeKind::Add => "ADD",
            ChangeKind::Rename => "RENAME",
            ChangeKind::Deprecate => "DEPRECATE",
            ChangeKind::Correct => "CORRECT",
            ChangeKind::Emerge => "EMERGE",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A citation-shaped reference backing a classified change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canon_id: Option<String>,
    pub title: String,
    pub url: String,
    pub venue: String,
    pub year: i32,
}

/// One classified field-evolution change.
///
/// Created by the classifier; evidence is attached by the composer's
/// enrichment step, never by the classifier itself. Immutable within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffChange {
    #[serde(rename = "changeType")]
    pub kind: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_title: Option<String>,
    pub rationale: String,
    /// Confidence score in [0, 1].
    pub confidence: f64,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
    /// Derived: true when fewer than two evidence entries back the change.
    #[serde(default)]
    pub low_evidence: bool,
}

impl DiffChange {
    /// Recompute the `low_evidence` flag from the current evidence list.
    pub fn with_derived_low_evidence(mut self) -> Self {
        self.low_evidence = self.evidence.len() < defaults::LOW_EVIDENCE_THRESHOLD;
        self
    }
}

// ---------------------------------------------------------------------------
// Patch notes
// ---------------------------------------------------------------------------

/// A bibliography entry keyed by the short string used in `[key]` markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub key: String,
    pub title: String,
    pub url: String,
    pub venue: String,
    pub year: i32,
}

/// Kind of learning resource in a delta path step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Paper,
    Video,
    Doc,
    Course,
}

impl ResourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::Paper => "paper",
            ResourceKind::Video => "video",
            ResourceKind::Doc => "doc",
            ResourceKind::Course => "course",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One step of the catch-up learning path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaStep {
    pub title: String,
    pub hours: f64,
    pub link: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
}

/// The five thematic prose sections of a patch-notes document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sections {
    pub major: Vec<String>,
    pub tools: Vec<String>,
    pub resources: Vec<String>,
    pub corrections: Vec<String>,
    pub emerging: Vec<String>,
}

impl Sections {
    /// Iterate section entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.major
            .iter()
            .chain(self.tools.iter())
            .chain(self.resources.iter())
            .chain(self.corrections.iter())
            .chain(self.emerging.iter())
            .map(String::as_str)
    }
}

/// The rendered patch-notes artifact. Created once per (subject, year)
/// request; immutable.
///
/// Invariant (checked by `validate_citations`): every bracketed `[key]` in
/// `tldr` or any section resolves to a bibliography entry, and every
/// bibliography entry is referenced at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchNotes {
    /// 3-5 summary bullets.
    pub tldr: Vec<String>,
    pub sections: Sections,
    /// 4-8 ordered learning-resource entries.
    pub delta_path: Vec<DeltaStep>,
    pub bibliography: Vec<Citation>,
}

impl PatchNotes {
    /// Every prose string subject to citation validation, in document order.
    pub fn text_entries(&self) -> impl Iterator<Item = &str> {
        self.tldr.iter().map(String::as_str).chain(self.sections.iter())
    }

    /// Total estimated hours across the delta path.
    pub fn total_hours(&self) -> f64 {
        self.delta_path.iter().map(|s| s.hours).sum()
    }
}

// ---------------------------------------------------------------------------
// Provenance tagging
// ---------------------------------------------------------------------------

/// Where a generative result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// The model produced this value.
    Generated,
    /// The generation layer failed and the deterministic fallback was used.
    Fallback,
}

impl Provenance {
    pub fn as_str(&self) -> &str {
        match self {
            Provenance::Generated => "generated",
            Provenance::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A value tagged with its provenance.
///
/// The classifier and composer never surface generation failures as errors;
/// they degrade to canned output instead. The tag lets callers and tests
/// tell the two apart without changing that contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sourced<T> {
    pub value: T,
    pub source: Provenance,
}

impl<T> Sourced<T> {
    pub fn generated(value: T) -> Self {
        Self {
            value,
            source: Provenance::Generated,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            source: Provenance::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == Provenance::Fallback
    }

    pub fn into_value(self) -> T {
        self.value
    }
}
