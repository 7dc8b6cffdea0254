//! Global z-score detector, run independently on closes and volumes.

use market_data::{Bar, BarSeries};

use crate::config::ZScoreConfig;
use crate::models::{AnomalyCandidate, AnomalyKind, DetectorKind, Severity};
use crate::stats::{mean, std_dev};

const HIGH: f64 = 3.0;
const MEDIUM: f64 = 2.5;

/// Flag bars whose close or volume lies more than `threshold` population
/// standard deviations from the series mean.
pub fn detect(series: &BarSeries, cfg: &ZScoreConfig) -> Vec<AnomalyCandidate> {
    let bars = series.bars();
    let mut out = Vec::new();
    scan(bars, &series.closes(), AnomalyKind::Price, cfg.threshold, &mut out);
    scan(bars, &series.volumes(), AnomalyKind::Volume, cfg.threshold, &mut out);
    out
}

fn scan(
    bars: &[Bar],
    values: &[f64],
    kind: AnomalyKind,
    threshold: f64,
    out: &mut Vec<AnomalyCandidate>,
) {
    let m = mean(values);
    let sd = std_dev(values, m);
    if sd == 0.0 {
        return;
    }

    for (bar, &x) in bars.iter().zip(values) {
        let z = (x - m).abs() / sd;
        if z > threshold {
            let label = match kind {
                AnomalyKind::Price => "Price",
                AnomalyKind::Volume => "Volume",
            };
            out.push(AnomalyCandidate {
                date: bar.date,
                value: x,
                score: z,
                kind,
                severity: Severity::from_cutoffs(z, HIGH, MEDIUM),
                description: format!("{label} Z-score of {z:.2} ({x:.2} vs mean {m:.2})"),
                detector: DetectorKind::ZScore,
            });
        }
    }
}
