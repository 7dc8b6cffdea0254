//! Anomaly candidates, records, and their classification enums.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which observable triggered an anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    /// Closing price (or a price-derived feature).
    Price,
    /// Traded volume.
    Volume,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyKind::Price => f.write_str("price"),
            AnomalyKind::Volume => f.write_str("volume"),
        }
    }
}

/// Severity buckets, ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth a glance.
    Low,
    /// Notable.
    Medium,
    /// Strong signal.
    High,
}

impl Severity {
    /// Bucket `value` with strict `>` cutoffs: above `high` is High, above
    /// `medium` is Medium, anything else (including NaN) is Low.
    pub fn from_cutoffs(value: f64, high: f64, medium: f64) -> Self {
        if value > high {
            Severity::High
        } else if value > medium {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// The detector that produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    /// Global z-score on close and volume.
    ZScore,
    /// Close outside the Bollinger envelope.
    Bollinger,
    /// Sudden MACD histogram expansion.
    Macd,
    /// Mean-distance isolation score in feature space.
    Isolation,
    /// Pump-and-dump shape.
    Pattern,
    /// Day-over-day threshold check used on short series.
    DayOverDay,
}

impl DetectorKind {
    /// Detectors that run on every series (subject to their own preconditions).
    pub const ADVANCED: [DetectorKind; 5] = [
        DetectorKind::ZScore,
        DetectorKind::Bollinger,
        DetectorKind::Macd,
        DetectorKind::Isolation,
        DetectorKind::Pattern,
    ];

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            DetectorKind::ZScore => "Z-Score",
            DetectorKind::Bollinger => "Bollinger Bands",
            DetectorKind::Macd => "MACD Divergence",
            DetectorKind::Isolation => "Isolation Score",
            DetectorKind::Pattern => "Pump-and-Dump Pattern",
            DetectorKind::DayOverDay => "Day-over-Day Change",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw output of a single detector for a single bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyCandidate {
    /// Date of the bar that triggered the detector.
    pub date: NaiveDate,
    /// The price or volume that triggered it.
    pub value: f64,
    /// Detector-specific score (not normalized across detectors).
    pub score: f64,
    /// Price or volume.
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    /// Severity as judged by the detector.
    pub severity: Severity,
    /// Human-readable explanation.
    pub description: String,
    /// Origin.
    pub detector: DetectorKind,
}

/// Final, de-duplicated anomaly handed to the presentation layer.
///
/// Ids are random and only unique within one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    /// Run-scoped identifier.
    pub id: Uuid,
    /// Date of the anomalous bar.
    pub date: NaiveDate,
    /// Value reported by the first contributing detector.
    pub value: f64,
    /// Price or volume.
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    /// Highest severity among contributors.
    pub severity: Severity,
    /// Sum of the (weighted) contributor scores.
    pub score: f64,
    /// Contributor descriptions, merged.
    pub description: String,
    /// Detectors that agreed on this date and type, in detection order.
    pub detectors: Vec<DetectorKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_low_to_high() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!(
            [Severity::Low, Severity::High, Severity::Medium].iter().max(),
            Some(&Severity::High)
        );
    }

    #[test]
    fn cutoffs_are_strict() {
        assert_eq!(Severity::from_cutoffs(3.0, 3.0, 2.5), Severity::Medium);
        assert_eq!(Severity::from_cutoffs(3.01, 3.0, 2.5), Severity::High);
        assert_eq!(Severity::from_cutoffs(2.5, 3.0, 2.5), Severity::Low);
        assert_eq!(Severity::from_cutoffs(f64::NAN, 3.0, 2.5), Severity::Low);
    }

    #[test]
    fn candidate_serializes_type_field() {
        let c = AnomalyCandidate {
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            value: 12.0,
            score: 1.0,
            kind: AnomalyKind::Volume,
            severity: Severity::Low,
            description: "x".into(),
            detector: DetectorKind::DayOverDay,
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["type"], "volume");
        assert_eq!(json["severity"], "low");
        assert_eq!(json["detector"], "day_over_day");
    }
}
