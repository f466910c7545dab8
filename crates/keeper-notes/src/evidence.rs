//! Evidence attachment for classified changes.
//!
//! The composer enriches each change with citation-shaped evidence before
//! prompting. `FixtureEvidence` is the offline default, a fixed per-kind
//! table; `CorpusEvidence` looks the change's subject up in a reference
//! corpus.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use keeper_core::{
    ChangeKind, CorpusSearch, DiffChange, Evidence, EvidenceSource, Result,
};

/// Fixed per-kind evidence table, the offline default.
///
/// ADD is the only kind with two sources; every other kind carries one and
/// therefore derives `low_evidence` after attachment.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureEvidence;

impl FixtureEvidence {
    pub fn table_for(kind: ChangeKind) -> Vec<Evidence> {
        let rows: &[(&str, &str, &str, &str, i32)] = match kind {
            ChangeKind::Add => &[
                (
                    "alexnet_2012",
                    "ImageNet Classification with Deep CNNs",
                    "https://papers.nips.cc/2012",
                    "NIPS",
                    2012,
                ),
                (
                    "lecun_2015",
                    "Deep Learning Review",
                    "https://nature.com/articles/nature14539",
                    "Nature",
                    2015,
                ),
            ],
            ChangeKind::Deprecate => &[(
                "survey_2014",
                "From SIFT to CNNs: Evolution of Features",
                "https://arxiv.org/abs/1411.4038",
                "arXiv",
                2014,
            )],
            ChangeKind::Rename => &[(
                "goodfellow_2016",
                "Deep Learning Book",
                "https://deeplearningbook.org",
                "MIT Press",
                2016,
            )],
            ChangeKind::Correct => &[(
                "bengio_2013",
                "Representation Learning",
                "https://arxiv.org/abs/1206.5538",
                "IEEE",
                2013,
            )],
            ChangeKind::Emerge => &[(
                "clip_2021",
                "Learning Transferable Visual Models",
                "https://openai.com/research/clip",
                "OpenAI",
                2021,
            )],
        };

        rows.iter()
            .map(|(id, title, url, venue, year)| Evidence {
                canon_id: Some((*id).to_string()),
                title: (*title).to_string(),
                url: (*url).to_string(),
                venue: (*venue).to_string(),
                year: *year,
            })
            .collect()
    }
}

#[async_trait]
impl EvidenceSource for FixtureEvidence {
    async fn evidence_for(&self, change: &DiffChange) -> Result<Vec<Evidence>> {
        Ok(Self::table_for(change.kind))
    }
}

/// Corpus-backed evidence lookup.
///
/// Searches for the change's target (or origin) title with the change's
/// own year implied by the corpus cutoff; corpus items map onto evidence
/// entries directly.
pub struct CorpusEvidence {
    corpus: Arc<dyn CorpusSearch>,
    year_cutoff: i32,
    max_sources: usize,
}

impl CorpusEvidence {
    pub fn new(corpus: Arc<dyn CorpusSearch>, year_cutoff: i32) -> Self {
        Self {
            corpus,
            year_cutoff,
            max_sources: 3,
        }
    }
}

#[async_trait]
impl EvidenceSource for CorpusEvidence {
    async fn evidence_for(&self, change: &DiffChange) -> Result<Vec<Evidence>> {
        let query = change
            .to_title
            .as_deref()
            .or(change.from_title.as_deref())
            .unwrap_or(change.rationale.as_str());

        let items = self.corpus.search(query, self.year_cutoff).await?;
        Ok(items
            .into_iter()
            .take(self.max_sources)
            .map(|item| Evidence {
                canon_id: None,
                title: item.title,
                url: item.url,
                venue: item.venue,
                year: item.year,
            })
            .collect())
    }
}

/// Attach evidence to every change and recompute `low_evidence`.
///
/// A failing source downgrades that change to empty evidence rather than
/// aborting the run; the composer's fallback contract covers generation,
/// not enrichment.
pub async fn attach_evidence(
    source: &dyn EvidenceSource,
    changes: &[DiffChange],
) -> Vec<DiffChange> {
    let mut enriched = Vec::with_capacity(changes.len());
    for change in changes {
        let evidence = match source.evidence_for(change).await {
            Ok(evidence) => evidence,
            Err(e) => {
                warn!(change_kind = %change.kind, error = %e, "Evidence lookup failed");
                Vec::new()
            }
        };
        let mut change = change.clone();
        change.evidence = evidence;
        enriched.push(change.with_derived_low_evidence());
    }
    enriched
}
