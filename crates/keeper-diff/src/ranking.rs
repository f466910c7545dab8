//! Importance ranking and per-kind statistics for classified changes.

use keeper_core::{ChangeKind, DiffChange};

/// Fixed importance weight for a change kind.
///
/// New knowledge ranks highest, followed by corrected misconceptions;
/// terminology updates rank lowest.
pub fn importance_weight(kind: ChangeKind) -> f64 {
    match kind {
        ChangeKind::Add => 1.0,
        ChangeKind::Correct => 0.9,
        ChangeKind::Deprecate => 0.7,
        ChangeKind::Emerge => 0.6,
        ChangeKind::Rename => 0.5,
    }
}

/// Sort changes by `weight(kind) * confidence`, descending.
///
/// The sort is stable: equal scores keep their input order.
pub fn rank_changes_by_importance(mut changes: Vec<DiffChange>) -> Vec<DiffChange> {
    let score = |c: &DiffChange| importance_weight(c.kind) * c.confidence;
    changes.sort_by(|a, b| score(b).total_cmp(&score(a)));
    changes
}

/// Per-kind counts over a classified change set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeStats {
    pub total: usize,
    pub adds: usize,
    pub renames: usize,
    pub deprecates: usize,
    pub corrections: usize,
    pub emerging: usize,
}

impl ChangeStats {
    pub fn from_changes(changes: &[DiffChange]) -> Self {
        let mut stats = Self {
            total: changes.len(),
            ..Self::default()
        };
        for change in changes {
            match change.kind {
                ChangeKind::Add => stats.adds += 1,
                ChangeKind::Rename => stats.renames += 1,
                ChangeKind::Deprecate => stats.deprecates += 1,
                ChangeKind::Correct => stats.corrections += 1,
                ChangeKind::Emerge => stats.emerging += 1,
            }
        }
        stats
    }
}
