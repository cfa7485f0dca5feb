//! Severity-first ordering and frequency counts over the working set.

use crate::models::{ClassifiedRecord, ReleaseStatus, Severity, Stage, Summary};

/// Stable sort by severity precedence; equal tiers keep their input order
pub fn order_by_severity(records: &mut [ClassifiedRecord]) {
    records.sort_by_key(|record| record.severity.rank());
}

/// Count per tier, stage and release status. Every key is present, zero or not.
pub fn aggregate(records: &[ClassifiedRecord]) -> Summary {
    let mut summary = Summary {
        total: records.len(),
        by_severity: Severity::ALL.iter().map(|s| (*s, 0)).collect(),
        by_stage: Stage::ALL.iter().map(|s| (*s, 0)).collect(),
        by_release: [
            ReleaseStatus::Released,
            ReleaseStatus::Stopped,
            ReleaseStatus::Pending,
        ]
        .iter()
        .map(|s| (*s, 0))
        .collect(),
    };

    for record in records {
        *summary.by_severity.entry(record.severity).or_default() += 1;
        *summary.by_stage.entry(record.stage).or_default() += 1;
        *summary
            .by_release
            .entry(record.record.release_status)
            .or_default() += 1;
    }

    summary
}
