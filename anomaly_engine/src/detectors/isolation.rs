//! Distance-based isolation score.
//!
//! This is a deterministic stand-in for an isolation forest: a bar's score is
//! its mean Euclidean distance to every other bar in a small feature space.
//! Points far from the bulk of the data get high scores. O(n²) per series.
//!
//! Features are used unscaled, so the `volume·close` term dominates the
//! distance for typical equities.

use market_data::{Bar, BarSeries};

use crate::config::IsolationConfig;
use crate::models::{AnomalyCandidate, AnomalyKind, DetectorKind, Severity};
use crate::stats::percentile;

const HIGH_FACTOR: f64 = 1.5;
const MEDIUM_FACTOR: f64 = 1.2;

/// `[close, volume, high - low, (close - open) / open, volume * close]`
pub fn features(bar: &Bar) -> [f64; 5] {
    let volume = bar.volume as f64;
    [
        bar.close,
        volume,
        bar.range(),
        bar.body_return(),
        volume * bar.close,
    ]
}

fn distance(a: &[f64; 5], b: &[f64; 5]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Mean distance from each point to all others; all zeros for fewer than two points.
pub fn isolation_scores(points: &[[f64; 5]]) -> Vec<f64> {
    let n = points.len();
    if n < 2 {
        return vec![0.0; n];
    }
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let total: f64 = points
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, q)| distance(p, q))
                .sum();
            total / (n - 1) as f64
        })
        .collect()
}

/// Flag bars scoring strictly above the `(1 - contamination)` percentile.
pub fn detect(series: &BarSeries, cfg: &IsolationConfig) -> Vec<AnomalyCandidate> {
    let bars = series.bars();
    if bars.len() < 2 {
        return vec![];
    }

    let points: Vec<[f64; 5]> = bars.iter().map(features).collect();
    let scores = isolation_scores(&points);
    let threshold = percentile(&scores, (1.0 - cfg.contamination) * 100.0);

    bars.iter()
        .zip(&scores)
        .filter(|(_, score)| **score > threshold)
        .map(|(bar, &score)| AnomalyCandidate {
            date: bar.date,
            value: bar.close,
            score,
            kind: AnomalyKind::Price,
            severity: Severity::from_cutoffs(
                score,
                HIGH_FACTOR * threshold,
                MEDIUM_FACTOR * threshold,
            ),
            description: format!(
                "Isolation score {score:.2} above the {:.0}th percentile cut {threshold:.2}",
                (1.0 - cfg.contamination) * 100.0
            ),
            detector: DetectorKind::Isolation,
        })
        .collect()
}
