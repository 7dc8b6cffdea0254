#![allow(dead_code)]

use anomaly_engine::{AnomalyCandidate, AnomalyKind, DetectorKind, Severity};
use chrono::{Duration, NaiveDate};
use market_data::{Bar, BarSeries};

pub fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i as i64)
}

/// Flat candles on consecutive days starting 2024-01-01.
pub fn series(symbol: &str, closes: &[f64], volumes: &[u64]) -> BarSeries {
    let bars = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&c, &v))| Bar::new(day(i), c, c, c, c, v))
        .collect();
    BarSeries::new(symbol, bars).unwrap()
}

pub fn flat(n: usize) -> BarSeries {
    series("FLAT", &vec![100.0; n], &vec![1_000_000; n])
}

/// `n` bars at 100 with the close at `at` replaced by `spike`.
pub fn spiked(n: usize, at: usize, spike: f64) -> BarSeries {
    let mut closes = vec![100.0; n];
    closes[at] = spike;
    series("SPKE", &closes, &vec![1_000_000; n])
}

pub fn candidate(
    i: usize,
    kind: AnomalyKind,
    score: f64,
    severity: Severity,
    detector: DetectorKind,
) -> AnomalyCandidate {
    AnomalyCandidate {
        date: day(i),
        value: 100.0,
        score,
        kind,
        severity,
        description: format!("{detector} hit"),
        detector,
    }
}

/// JSON document accepted by the series loaders.
pub fn series_json(series: &BarSeries) -> String {
    serde_json::to_string(series).unwrap()
}
