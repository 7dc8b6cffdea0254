//! Bollinger band breakouts.

use market_data::BarSeries;

use crate::config::BollingerConfig;
use crate::models::{AnomalyCandidate, AnomalyKind, DetectorKind, Severity};
use crate::stats::{moving_average, std_dev};

const HIGH: f64 = 0.05;
const MEDIUM: f64 = 0.02;

/// Flag closes outside `SMA(period) ± k·σ(period)`, where the window ends at
/// (and includes) the bar being tested.
///
/// The score is the relative distance beyond the breached band, e.g. `0.05`
/// for a close 5% above the upper band.
pub fn detect(series: &BarSeries, cfg: &BollingerConfig) -> Vec<AnomalyCandidate> {
    let period = cfg.period;
    if period == 0 || series.len() < period {
        return vec![];
    }

    let closes = series.closes();
    let bars = series.bars();
    let sma = moving_average(&closes, period);

    let mut out = Vec::new();
    for (j, &middle) in sma.iter().enumerate() {
        let i = j + period - 1;
        let sd = std_dev(&closes[j..=i], middle);
        let upper = middle + cfg.std_multiplier * sd;
        let lower = middle - cfg.std_multiplier * sd;
        let close = closes[i];

        let (deviation, band, side) = if close > upper {
            ((close - upper) / upper, upper, "above upper")
        } else if close < lower && lower > 0.0 {
            ((lower - close) / lower, lower, "below lower")
        } else {
            continue;
        };

        out.push(AnomalyCandidate {
            date: bars[i].date,
            value: close,
            score: deviation,
            kind: AnomalyKind::Price,
            severity: Severity::from_cutoffs(deviation, HIGH, MEDIUM),
            description: format!(
                "Close {close:.2} broke {side} Bollinger band {band:.2} by {:.2}%",
                deviation * 100.0
            ),
            detector: DetectorKind::Bollinger,
        });
    }
    out
}
