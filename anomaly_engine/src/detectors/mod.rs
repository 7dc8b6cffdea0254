//! The detector set.
//!
//! Each detector is a pure function of a [`BarSeries`] and its own config
//! section. Detectors share no state, so [`DetectorKind::run`] can be called
//! for several kinds concurrently over the same series.

pub mod bollinger;
pub mod day_over_day;
pub mod isolation;
pub mod macd;
pub mod pattern;
pub mod zscore;

use market_data::BarSeries;
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::models::{AnomalyCandidate, DetectorKind};

impl DetectorKind {
    /// Minimum number of bars before this detector can contribute anything.
    pub fn min_len(self, config: &EngineConfig) -> usize {
        match self {
            DetectorKind::ZScore => 1,
            DetectorKind::Bollinger => config.bollinger.period,
            DetectorKind::Macd => config
                .macd
                .slow_period
                .saturating_add(config.macd.signal_period),
            DetectorKind::Isolation => 2,
            DetectorKind::Pattern => config.pattern.window.saturating_mul(2).saturating_add(1),
            DetectorKind::DayOverDay => 2,
        }
    }

    /// Run the detector and apply its configured weight to every score.
    pub fn run(self, series: &BarSeries, config: &EngineConfig) -> Vec<AnomalyCandidate> {
        let mut found = match self {
            DetectorKind::ZScore => zscore::detect(series, &config.zscore),
            DetectorKind::Bollinger => bollinger::detect(series, &config.bollinger),
            DetectorKind::Macd => macd::detect(series, &config.macd),
            DetectorKind::Isolation => isolation::detect(series, &config.isolation),
            DetectorKind::Pattern => pattern::detect(series, &config.pattern),
            DetectorKind::DayOverDay => day_over_day::detect(series, &config.day_over_day),
        };

        let weight = config.weight(self);
        for c in &mut found {
            c.score *= weight;
            trace!(detector = %self, date = %c.date, score = c.score, "candidate");
        }
        debug!(
            detector = %self,
            symbol = series.symbol(),
            bars = series.len(),
            candidates = found.len(),
            "detector finished"
        );
        found
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Duration, NaiveDate};
    use market_data::{Bar, BarSeries};

    /// Flat candles (open = high = low = close) on consecutive days.
    pub fn series(closes: &[f64], volumes: &[u64]) -> BarSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&c, &v))| Bar::new(start + Duration::days(i as i64), c, c, c, c, v))
            .collect();
        BarSeries::new("TEST", bars).unwrap()
    }

    pub fn constant(n: usize) -> BarSeries {
        series(&vec![100.0; n], &vec![1_000_000; n])
    }
}
