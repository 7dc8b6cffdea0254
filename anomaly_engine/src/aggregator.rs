//! Merge raw detector candidates into the final anomaly list.
//!
//! Candidates are grouped by `(date, type)`. A group of one passes through as
//! is; larger groups are merged:
//! - score: sum of member scores (independent signals compound)
//! - severity: highest among members
//! - description: member descriptions joined by `"; "`, prefixed with the
//!   number of agreeing indicators
//! - date, type and value: taken from the first member
//!
//! Groups keep first-seen order, and the final sort by descending score is
//! stable, so a fixed input always produces the same ordering.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{AnomalyCandidate, AnomalyKind, AnomalyRecord, Severity};

/// Group, merge and rank `candidates`.
pub fn aggregate(candidates: Vec<AnomalyCandidate>) -> Vec<AnomalyRecord> {
    let mut groups: IndexMap<(NaiveDate, AnomalyKind), Vec<AnomalyCandidate>> = IndexMap::new();
    for c in candidates {
        groups.entry((c.date, c.kind)).or_default().push(c);
    }

    let mut records: Vec<AnomalyRecord> = groups.into_values().filter_map(merge_group).collect();
    records.sort_by(|a, b| b.score.total_cmp(&a.score));
    records
}

fn merge_group(group: Vec<AnomalyCandidate>) -> Option<AnomalyRecord> {
    let first = group.first()?;
    let (date, kind, value) = (first.date, first.kind, first.value);

    let score: f64 = group.iter().map(|c| c.score).sum();
    let severity = group
        .iter()
        .map(|c| c.severity)
        .max()
        .unwrap_or(Severity::Low);
    let detectors = group.iter().map(|c| c.detector).collect();

    let description = if group.len() == 1 {
        group.into_iter().map(|c| c.description).collect()
    } else {
        let parts: Vec<&str> = group.iter().map(|c| c.description.as_str()).collect();
        format!(
            "Multiple indicators ({}): {}",
            group.len(),
            parts.join("; ")
        )
    };

    Some(AnomalyRecord {
        id: Uuid::new_v4(),
        date,
        value,
        kind,
        severity,
        score,
        description,
        detectors,
    })
}

/// Counts for dashboard badges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalySummary {
    /// Number of records.
    pub total: usize,
    /// Records with high severity.
    pub high: usize,
    /// Records with medium severity.
    pub medium: usize,
    /// Records with low severity.
    pub low: usize,
    /// Price records.
    pub price: usize,
    /// Volume records.
    pub volume: usize,
    /// Largest score, 0 when there are no records.
    pub top_score: f64,
}

/// Tally `records` by severity and type.
pub fn summarize(records: &[AnomalyRecord]) -> AnomalySummary {
    let mut summary = AnomalySummary {
        total: records.len(),
        ..AnomalySummary::default()
    };
    for r in records {
        match r.severity {
            Severity::High => summary.high += 1,
            Severity::Medium => summary.medium += 1,
            Severity::Low => summary.low += 1,
        }
        match r.kind {
            AnomalyKind::Price => summary.price += 1,
            AnomalyKind::Volume => summary.volume += 1,
        }
        summary.top_score = summary.top_score.max(r.score);
    }
    summary
}
