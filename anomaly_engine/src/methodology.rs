//! Static methodology text for the "how does this work" panel.

use serde::Serialize;

use crate::models::DetectorKind;

/// One detector's entry in the methodology listing.
#[derive(Debug, Clone, Serialize)]
pub struct DetectorInfo {
    /// Detector id.
    pub kind: DetectorKind,
    /// Display name.
    pub name: &'static str,
    /// What it looks for.
    pub description: &'static str,
}

/// Methodology, caveats and limitations of the engine.
#[derive(Debug, Clone, Serialize)]
pub struct Methodology {
    /// Panel title.
    pub title: &'static str,
    /// One-paragraph overview.
    pub summary: &'static str,
    /// Detectors in execution order.
    pub detectors: Vec<DetectorInfo>,
    /// Accuracy caveats.
    pub caveats: Vec<&'static str>,
    /// Known limitations.
    pub limitations: Vec<&'static str>,
}

fn describe(kind: DetectorKind) -> &'static str {
    match kind {
        DetectorKind::ZScore => {
            "Flags closes and volumes more than 2.5 standard deviations from the series mean."
        }
        DetectorKind::Bollinger => {
            "Flags closes outside a 20-day moving average plus or minus two standard deviations."
        }
        DetectorKind::Macd => {
            "Flags days where the MACD histogram (12/26/9) more than doubles in magnitude."
        }
        DetectorKind::Isolation => {
            "Scores each day by its mean distance to all other days across price, volume, range and return features; the top 10% are flagged."
        }
        DetectorKind::Pattern => {
            "Looks for a run-up of more than 10% followed by a drop of more than 8% within three days, on at least twice the average volume."
        }
        DetectorKind::DayOverDay => {
            "On short histories, flags single-day price moves above 5% and volume moves above 100%."
        }
    }
}

/// The static methodology description. Performs no computation.
pub fn methodology() -> Methodology {
    let detectors = DetectorKind::ADVANCED
        .into_iter()
        .chain([DetectorKind::DayOverDay])
        .map(|kind| DetectorInfo {
            kind,
            name: kind.label(),
            description: describe(kind),
        })
        .collect();

    Methodology {
        title: "Anomaly detection methodology",
        summary: "Several independent statistical detectors scan each price history. \
                  Signals that land on the same day and type are merged: their scores are added \
                  and the highest severity wins, so agreement between detectors ranks higher.",
        detectors,
        caveats: vec![
            "Thresholds are heuristic defaults, not fitted to any market or instrument.",
            "The isolation score approximates an isolation forest with a distance heuristic; no model is trained.",
            "Results on simulated data say nothing about real market behaviour.",
        ],
        limitations: vec![
            "Scores from different detectors use different scales (z-scores, band deviations, histogram size, feature distances) and are summed without normalization.",
            "Statistics are computed over the whole supplied history, so adding data can change past flags.",
            "Not intended for trading or risk decisions.",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_detector_once() {
        let m = methodology();
        assert_eq!(m.detectors.len(), 6);
        assert_eq!(m.detectors[0].name, "Z-Score");
        assert_eq!(m.detectors[5].kind, DetectorKind::DayOverDay);
        assert!(m.limitations.iter().any(|l| l.contains("without normalization")));
    }
}
