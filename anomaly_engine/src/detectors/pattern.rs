//! Pump-and-dump shape detector.

use market_data::BarSeries;

use crate::config::PatternConfig;
use crate::models::{AnomalyCandidate, AnomalyKind, DetectorKind, Severity};
use crate::stats::mean;

const HIGH: f64 = 0.8;
const MEDIUM: f64 = 0.6;

/// Slide a `±window` frame over the closes and flag centers that rose sharply
/// from the frame start, fell sharply by the frame end, and traded on unusual
/// volume relative to the whole series.
///
/// Score is the confidence `min(max_confidence, (pump + dump) · spike · 0.1)`.
pub fn detect(series: &BarSeries, cfg: &PatternConfig) -> Vec<AnomalyCandidate> {
    let w = cfg.window;
    let n = series.len();
    if w == 0 || n <= w.saturating_mul(2) {
        return vec![];
    }

    let bars = series.bars();
    let avg_volume = mean(&series.volumes());
    if avg_volume == 0.0 {
        return vec![];
    }

    let mut out = Vec::new();
    for i in w..n.saturating_sub(w) {
        let pre = bars[i - w].close;
        let peak = bars[i].close;
        let post = bars[i + w].close;

        let pump = (peak - pre) / pre;
        let dump = (peak - post) / peak;
        let spike = bars[i].volume as f64 / avg_volume;
        if pump <= cfg.min_pump || dump <= cfg.min_dump || spike <= cfg.min_volume_spike {
            continue;
        }

        let confidence = ((pump + dump) * spike * 0.1).min(cfg.max_confidence);
        out.push(AnomalyCandidate {
            date: bars[i].date,
            value: peak,
            score: confidence,
            kind: AnomalyKind::Price,
            severity: Severity::from_cutoffs(confidence, HIGH, MEDIUM),
            description: format!(
                "Possible pump-and-dump: +{:.1}% run-up then -{:.1}% drop on {spike:.1}x average volume",
                pump * 100.0,
                dump * 100.0
            ),
            detector: DetectorKind::Pattern,
        });
    }
    out
}
