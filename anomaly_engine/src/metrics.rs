//! Per-symbol summary statistics for the dashboard.
//!
//! Everything is recomputed from the series on each call.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use market_data::BarSeries;
use serde::{Deserialize, Serialize};

use crate::stats::{mean, pearson_correlation, ratio, std_dev};

/// Bars averaged for [`Metrics::average_volume`].
pub const VOLUME_WINDOW: usize = 20;
/// Bars whose daily returns feed [`Metrics::volatility`].
pub const VOLATILITY_WINDOW: usize = 20;
/// Bars (so `RSI_WINDOW - 1` changes) used for [`Metrics::rsi`].
pub const RSI_WINDOW: usize = 15;
/// Annualization factor.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Summary statistics for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Symbol of the source series.
    pub symbol: String,
    /// Number of bars the metrics were computed from.
    pub bars: usize,
    /// Last close.
    pub current_price: f64,
    /// Last close minus the previous close (or the open for a single bar).
    pub change: f64,
    /// `change` as a percentage of the reference price.
    pub change_percent: f64,
    /// Annualized volatility of daily returns, in percent.
    pub volatility: f64,
    /// Relative Strength Index, 0–100.
    pub rsi: f64,
    /// Mean volume over the trailing window.
    pub average_volume: f64,
    /// Highest high in the series.
    pub period_high: f64,
    /// Lowest low in the series.
    pub period_low: f64,
}

impl Default for Metrics {
    /// The neutral record returned for an empty series: zeros and RSI 50.
    fn default() -> Self {
        Self {
            symbol: String::new(),
            bars: 0,
            current_price: 0.0,
            change: 0.0,
            change_percent: 0.0,
            volatility: 0.0,
            rsi: 50.0,
            average_volume: 0.0,
            period_high: 0.0,
            period_low: 0.0,
        }
    }
}

/// Compute [`Metrics`] for `series`.
pub fn compute_metrics(series: &BarSeries) -> Metrics {
    let Some(last) = series.last() else {
        return Metrics {
            symbol: series.symbol().to_string(),
            ..Metrics::default()
        };
    };

    let bars = series.bars();
    let reference = match bars.len() {
        1 => last.open,
        n => bars[n - 2].close,
    };
    let change = last.close - reference;

    let tail_volumes: Vec<f64> = series
        .tail(VOLUME_WINDOW)
        .iter()
        .map(|b| b.volume as f64)
        .collect();
    let tail_closes = |n: usize| -> Vec<f64> { series.tail(n).iter().map(|b| b.close).collect() };

    Metrics {
        symbol: series.symbol().to_string(),
        bars: bars.len(),
        current_price: last.close,
        change,
        change_percent: ratio(change, reference) * 100.0,
        volatility: annualized_volatility(&tail_closes(VOLATILITY_WINDOW)),
        rsi: rsi(&tail_closes(RSI_WINDOW)),
        average_volume: mean(&tail_volumes),
        period_high: bars.iter().map(|b| b.high).fold(f64::MIN, f64::max),
        period_low: bars.iter().map(|b| b.low).fold(f64::MAX, f64::min),
    }
}

/// Simple close-to-close returns; one shorter than the input.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| ratio(w[1] - w[0], w[0]))
        .collect()
}

/// `σ(daily returns) · √252 · 100`; 0 with fewer than two closes.
pub fn annualized_volatility(closes: &[f64]) -> f64 {
    let returns = daily_returns(closes);
    if returns.is_empty() {
        return 0.0;
    }
    std_dev(&returns, mean(&returns)) * TRADING_DAYS_PER_YEAR.sqrt() * 100.0
}

/// RSI from average gain over average loss across every change in `closes`.
///
/// 50 with fewer than two closes; 100 when there are no losses.
pub fn rsi(closes: &[f64]) -> f64 {
    if closes.len() < 2 {
        return 50.0;
    }
    let (mut gains, mut losses) = (0.0, 0.0);
    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        if delta > 0.0 {
            gains += delta;
        } else {
            losses -= delta;
        }
    }

    let periods = (closes.len() - 1) as f64;
    let (avg_gain, avg_loss) = (gains / periods, losses / periods);
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

/// Pearson correlation of two symbols' daily returns on the dates both traded.
///
/// Returns are keyed by the later bar's date and only taken between
/// consecutive bars of the same series. 0 with fewer than two common returns.
pub fn return_correlation(a: &BarSeries, b: &BarSeries) -> f64 {
    let returns_by_date = |s: &BarSeries| -> BTreeMap<NaiveDate, f64> {
        s.bars()
            .windows(2)
            .map(|w| (w[1].date, ratio(w[1].close - w[0].close, w[0].close)))
            .collect()
    };
    let ra = returns_by_date(a);
    let rb = returns_by_date(b);

    let (xs, ys): (Vec<f64>, Vec<f64>) = ra
        .iter()
        .filter_map(|(date, x)| rb.get(date).map(|y| (*x, *y)))
        .unzip();
    if xs.len() < 2 {
        return 0.0;
    }
    pearson_correlation(&xs, &ys)
}
