//! MACD histogram expansion ("divergence") detector.

use market_data::BarSeries;

use crate::config::MacdConfig;
use crate::models::{AnomalyCandidate, AnomalyKind, DetectorKind, Severity};
use crate::stats::ema;

const HIGH: f64 = 2.0;
const MEDIUM: f64 = 1.0;

/// MACD line, signal line and histogram, each the same length as the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    /// `EMA(fast) - EMA(slow)`.
    pub line: Vec<f64>,
    /// `EMA(signal)` of the MACD line.
    pub signal: Vec<f64>,
    /// `line - signal`.
    pub histogram: Vec<f64>,
}

/// Compute MACD with seeded EMAs (no warm-up NaNs).
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal = ema(&line, signal);
    let histogram = line.iter().zip(&signal).map(|(m, s)| m - s).collect();
    Macd {
        line,
        signal,
        histogram,
    }
}

/// Flag bars where the histogram suddenly expands: `|h| > jump_ratio·|h_prev|`
/// and `|h| > min_histogram`.
///
/// Requires `slow_period + signal_period` bars. Bars before `slow_period` are
/// skipped while the slow EMA is still dominated by its seed.
pub fn detect(series: &BarSeries, cfg: &MacdConfig) -> Vec<AnomalyCandidate> {
    let n = series.len();
    if n < cfg.slow_period.saturating_add(cfg.signal_period) {
        return vec![];
    }

    let closes = series.closes();
    let bars = series.bars();
    let Macd { histogram, .. } = macd(&closes, cfg.fast_period, cfg.slow_period, cfg.signal_period);

    let mut out = Vec::new();
    for i in cfg.slow_period.max(1)..n {
        let h = histogram[i];
        let prev = histogram[i - 1];
        if h.abs() > cfg.jump_ratio * prev.abs() && h.abs() > cfg.min_histogram {
            let direction = if h > 0.0 { "bullish" } else { "bearish" };
            out.push(AnomalyCandidate {
                date: bars[i].date,
                value: closes[i],
                score: h.abs(),
                kind: AnomalyKind::Price,
                severity: Severity::from_cutoffs(h.abs(), HIGH, MEDIUM),
                description: format!(
                    "MACD histogram jumped to {h:.2} from {prev:.2} ({direction} momentum shift)"
                ),
                detector: DetectorKind::Macd,
            });
        }
    }
    out
}
