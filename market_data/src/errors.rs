use chrono::NaiveDate;
use snafu::{Backtrace, Snafu};

use crate::models::bar::BarDefect;

/// Errors raised while assembling a [`BarSeries`](crate::models::bar_series::BarSeries).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SeriesError {
    /// A bar violates the OHLC invariants.
    #[snafu(display("Malformed bar #{index} ({date}): {defect}"))]
    MalformedBar {
        index: usize,
        date: NaiveDate,
        defect: BarDefect,
        backtrace: Backtrace,
    },

    /// Bar dates are not strictly increasing.
    #[snafu(display("Bar #{index} dated {date} does not follow {previous}"))]
    OutOfOrder {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
        backtrace: Backtrace,
    },

    /// The symbol is blank after trimming.
    #[snafu(display("Series symbol cannot be empty"))]
    EmptySymbol { backtrace: Backtrace },
}
