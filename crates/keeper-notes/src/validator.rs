//! Citation validator.
//!
//! Pure consistency check between the prose entries of a patch-notes
//! document and its bibliography. Never touches the network or the model.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use keeper_core::defaults;
use keeper_core::PatchNotes;

/// `[key]` markers in prose; the capture excludes the brackets.
static CITATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]").expect("citation marker regex"));

/// Bracketed text that is a formatting sentinel, not a citation key.
const LOW_EVIDENCE_SENTINEL: &str = "Low evidence";

/// Outcome of validating a patch-notes document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationReport {
    pub valid: bool,
    pub issues: Vec<String>,
}

/// Check that prose citations and the bibliography agree.
///
/// Issues reported, in scan order over tldr then the five sections:
/// - a `[key]` marker whose key has no bibliography entry
/// - a prose entry over 50 characters with no marker and no
///   `(Low evidence)` suffix
/// - a bibliography entry never referenced from prose
pub fn validate_citations(notes: &PatchNotes) -> CitationReport {
    let mut issues = Vec::new();

    let biblio_keys: HashSet<&str> = notes.bibliography.iter().map(|b| b.key.as_str()).collect();
    let mut used: HashSet<String> = HashSet::new();

    for text in notes.text_entries() {
        for capture in CITATION_RE.captures_iter(text) {
            let key = &capture[1];
            used.insert(key.to_string());
            if key != LOW_EVIDENCE_SENTINEL && !biblio_keys.contains(key) {
                issues.push(format!("Citation [{key}] not found in bibliography"));
            }
        }

        let uncited = text.len() > defaults::UNCITED_CLAIM_MIN_LEN
            && !text.contains('[')
            && !text.contains("(Low evidence)");
        if uncited {
            let head: String = text.chars().take(defaults::UNCITED_CLAIM_MIN_LEN).collect();
            issues.push(format!("Possible uncited claim: \"{head}...\""));
        }
    }

    for entry in &notes.bibliography {
        if !used.contains(&entry.key) {
            issues.push(format!("Bibliography entry [{}] is never referenced", entry.key));
        }
    }

    CitationReport {
        valid: issues.is_empty(),
        issues,
    }
}
