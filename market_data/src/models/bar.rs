//! Canonical in-memory representation of a daily bar (OHLCV).
//!
//! Bars are vendor-agnostic; whatever feeds the engine (a real data provider or
//! a random-walk generator) produces them in this shape.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

fn deserialize_bar_date<'de, D>(d: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    // "2024-01-02" or a full RFC 3339 timestamp; anything else is rejected
    let s = String::deserialize(d)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&s) {
        return Ok(ts.date_naive());
    }
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

/// A single OHLCV observation for one trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Calendar date of the bar.
    #[serde(deserialize_with = "deserialize_bar_date")]
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price during the day.
    pub high: f64,

    /// Lowest price during the day.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Shares traded during the day.
    pub volume: u64,

    /// Split/dividend adjusted close. Not all providers supply this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adj_close: Option<f64>,
}

/// Why a [`Bar`] was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarDefect {
    /// One of the prices is NaN or infinite.
    NonFinitePrice,
    /// One of the prices is zero or negative.
    NonPositivePrice,
    /// `high` is below `low`.
    HighBelowLow,
    /// `high` is below the open or the close.
    HighBelowBody,
    /// `low` is above the open or the close.
    LowAboveBody,
    /// The adjusted close is present but not a positive finite number.
    InvalidAdjClose,
}

impl fmt::Display for BarDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            BarDefect::NonFinitePrice => "price is not finite",
            BarDefect::NonPositivePrice => "price must be positive",
            BarDefect::HighBelowLow => "high is below low",
            BarDefect::HighBelowBody => "high is below open/close",
            BarDefect::LowAboveBody => "low is above open/close",
            BarDefect::InvalidAdjClose => "adjusted close must be a positive finite number",
        };
        f.write_str(msg)
    }
}

impl Bar {
    /// Build a bar without an adjusted close.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            adj_close: None,
        }
    }

    /// Check the OHLC invariants.
    ///
    /// Malformed bars are rejected rather than clamped, so that detectors never
    /// see a candle whose range is negative.
    pub fn validate(&self) -> Result<(), BarDefect> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err(BarDefect::NonFinitePrice);
        }
        if prices.iter().any(|&p| p <= 0.0) {
            return Err(BarDefect::NonPositivePrice);
        }
        if self.high < self.low {
            return Err(BarDefect::HighBelowLow);
        }
        if self.high < self.open.max(self.close) {
            return Err(BarDefect::HighBelowBody);
        }
        if self.low > self.open.min(self.close) {
            return Err(BarDefect::LowAboveBody);
        }
        if let Some(adj) = self.adj_close {
            if !adj.is_finite() || adj <= 0.0 {
                return Err(BarDefect::InvalidAdjClose);
            }
        }
        Ok(())
    }

    /// Intraday range (`high - low`).
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Open-to-close return of the day; 0 when the open is 0.
    pub fn body_return(&self) -> f64 {
        if self.open == 0.0 {
            0.0
        } else {
            (self.close - self.open) / self.open
        }
    }
}
