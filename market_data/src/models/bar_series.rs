//! A validated, chronologically ordered collection of bars for one symbol.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::errors::{EmptySymbolSnafu, MalformedBarSnafu, OutOfOrderSnafu, SeriesError};
use crate::models::bar::Bar;

/// Represents the daily history of a single symbol.
///
/// Construction goes through [`BarSeries::new`] (or deserialization, which calls it),
/// so every instance satisfies:
/// - each bar passes [`Bar::validate`]
/// - dates are strictly increasing (gaps such as weekends are allowed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBarSeries")]
pub struct BarSeries {
    symbol: String,
    bars: Vec<Bar>,
}

#[derive(Deserialize)]
struct RawBarSeries {
    symbol: String,
    #[serde(default)]
    bars: Vec<Bar>,
}

impl TryFrom<RawBarSeries> for BarSeries {
    type Error = SeriesError;

    fn try_from(raw: RawBarSeries) -> Result<Self, Self::Error> {
        BarSeries::new(raw.symbol, raw.bars)
    }
}

impl BarSeries {
    /// Validate `bars` and group them under `symbol`.
    ///
    /// The symbol is trimmed and uppercased (e.g. " aapl" -> "AAPL").
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let symbol = symbol.into().trim().to_uppercase();
        ensure!(!symbol.is_empty(), EmptySymbolSnafu);

        let mut previous: Option<NaiveDate> = None;
        for (index, bar) in bars.iter().enumerate() {
            if let Err(defect) = bar.validate() {
                return MalformedBarSnafu {
                    index,
                    date: bar.date,
                    defect,
                }
                .fail();
            }
            if let Some(previous) = previous {
                ensure!(
                    bar.date > previous,
                    OutOfOrderSnafu {
                        index,
                        date: bar.date,
                        previous,
                    }
                );
            }
            previous = Some(bar.date);
        }

        Ok(Self { symbol, bars })
    }

    /// A series with no bars.
    pub fn empty(symbol: impl Into<String>) -> Result<Self, SeriesError> {
        Self::new(symbol, Vec::new())
    }

    /// The symbol this data represents (e.g. "AAPL").
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// All bars, oldest first.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the series has no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// The trailing `n` bars (or all of them when the series is shorter).
    pub fn tail(&self, n: usize) -> &[Bar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    /// Closing prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volumes as floats, oldest first.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    /// Consume the series and return its bars.
    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bar::BarDefect;

    fn bar(day: u32, close: f64) -> Bar {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        Bar::new(date, close, close, close, close, 100)
    }

    #[test]
    fn accepts_ordered_bars_with_gaps() {
        let series = BarSeries::new(" msft ", vec![bar(2, 10.0), bar(3, 11.0), bar(8, 12.0)]).unwrap();
        assert_eq!(series.symbol(), "MSFT");
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
        assert_eq!(series.tail(2).len(), 2);
        assert_eq!(series.tail(10).len(), 3);
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = BarSeries::new("MSFT", vec![bar(2, 10.0), bar(2, 11.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::OutOfOrder { index: 1, .. }));
    }

    #[test]
    fn rejects_malformed_bar_with_index() {
        let mut broken = bar(3, 10.0);
        broken.high = 5.0;
        let err = BarSeries::new("MSFT", vec![bar(2, 10.0), broken]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::MalformedBar {
                index: 1,
                defect: BarDefect::HighBelowLow,
                ..
            }
        ));
        assert!(err.to_string().contains("#1"));
    }

    #[test]
    fn rejects_blank_symbol() {
        assert!(matches!(
            BarSeries::empty("   ").unwrap_err(),
            SeriesError::EmptySymbol { .. }
        ));
    }

    #[test]
    fn deserialization_runs_validation() {
        let json = r#"{"symbol":"aapl","bars":[
            {"date":"2024-01-03","open":1.0,"high":1.0,"low":1.0,"close":1.0,"volume":1},
            {"date":"2024-01-02","open":1.0,"high":1.0,"low":1.0,"close":1.0,"volume":1}
        ]}"#;
        let err = serde_json::from_str::<BarSeries>(json).unwrap_err();
        assert!(err.to_string().contains("does not follow"));
    }

    mod props {
        use super::*;
        use chrono::Duration;
        use proptest::prelude::*;

        fn arb_bar_parts() -> impl Strategy<Value = (f64, f64, f64, f64, u64, i64)> {
            (1.0f64..1_000.0, 0.0f64..0.2, 0.0f64..0.2, 0.0f64..1.0, any::<u32>(), 1i64..5)
                .prop_map(|(open, up, down, mix, volume, gap)| {
                    let close = open * (1.0 - down + (up + down) * mix);
                    (open, up, down, close, u64::from(volume), gap)
                })
        }

        proptest! {
            #[test]
            fn well_formed_candles_always_build(parts in prop::collection::vec(arb_bar_parts(), 0..50)) {
                let mut date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
                let bars: Vec<Bar> = parts
                    .iter()
                    .map(|&(open, up, down, close, volume, gap)| {
                        date += Duration::days(gap);
                        let high = open.max(close) * (1.0 + up);
                        let low = open.min(close) * (1.0 - down);
                        Bar::new(date, open, high, low, close, volume)
                    })
                    .collect();

                let series = BarSeries::new("prop", bars).unwrap();
                prop_assert_eq!(series.len(), parts.len());
                prop_assert_eq!(series.symbol(), "PROP");
            }
        }
    }
}
