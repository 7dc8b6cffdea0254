//! Simplified day-over-day detector for series too short for the band/MACD
//! detectors.

use market_data::BarSeries;

use crate::config::DayOverDayConfig;
use crate::models::{AnomalyCandidate, AnomalyKind, DetectorKind, Severity};

const PRICE_HIGH: f64 = 0.15;
const PRICE_MEDIUM: f64 = 0.10;
const VOLUME_HIGH: f64 = 3.0;
const VOLUME_MEDIUM: f64 = 2.0;

/// Flag single-day close moves above `price_change` and volume moves above
/// `volume_change`. Scores are the absolute relative change.
pub fn detect(series: &BarSeries, cfg: &DayOverDayConfig) -> Vec<AnomalyCandidate> {
    let mut out = Vec::new();
    for pair in series.bars().windows(2) {
        let (prev, bar) = (&pair[0], &pair[1]);

        let price_move = (bar.close - prev.close).abs() / prev.close;
        if price_move > cfg.price_change {
            let verb = if bar.close > prev.close { "jumped" } else { "fell" };
            out.push(AnomalyCandidate {
                date: bar.date,
                value: bar.close,
                score: price_move,
                kind: AnomalyKind::Price,
                severity: Severity::from_cutoffs(price_move, PRICE_HIGH, PRICE_MEDIUM),
                description: format!("Price {verb} {:.1}% in one day", price_move * 100.0),
                detector: DetectorKind::DayOverDay,
            });
        }

        if prev.volume == 0 {
            continue;
        }
        let prev_volume = prev.volume as f64;
        let volume_move = (bar.volume as f64 - prev_volume).abs() / prev_volume;
        if volume_move > cfg.volume_change {
            out.push(AnomalyCandidate {
                date: bar.date,
                value: bar.volume as f64,
                score: volume_move,
                kind: AnomalyKind::Volume,
                severity: Severity::from_cutoffs(volume_move, VOLUME_HIGH, VOLUME_MEDIUM),
                description: format!("Volume changed {:.0}% in one day", volume_move * 100.0),
                detector: DetectorKind::DayOverDay,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::fixtures;

    #[test]
    fn flags_large_moves_only() {
        let series = fixtures::series(&[100.0, 104.0, 120.0, 100.0], &[10, 10, 45, 10]);
        let found = detect(&series, &DayOverDayConfig::default());

        let prices: Vec<_> = found.iter().filter(|c| c.kind == AnomalyKind::Price).collect();
        assert_eq!(prices.len(), 2);
        // 104 -> 120 is +15.38%
        assert_eq!(prices[0].severity, Severity::High);
        assert!(prices[0].description.contains("jumped"));
        // 120 -> 100 is -16.7%
        assert!(prices[1].description.contains("fell"));

        let volumes: Vec<_> = found.iter().filter(|c| c.kind == AnomalyKind::Volume).collect();
        assert_eq!(volumes.len(), 1);
        // 10 -> 45 is +350%
        assert_eq!(volumes[0].severity, Severity::High);
        assert_eq!(volumes[0].date, series.bars()[2].date);
    }

    #[test]
    fn zero_previous_volume_is_skipped() {
        let series = fixtures::series(&[10.0, 10.0], &[0, 1_000]);
        assert!(detect(&series, &DayOverDayConfig::default()).is_empty());
    }

    #[test]
    fn single_bar_is_quiet() {
        let series = fixtures::series(&[10.0], &[1]);
        assert!(detect(&series, &DayOverDayConfig::default()).is_empty());
    }
}
