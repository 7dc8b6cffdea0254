//! Canonical market data models shared across the workspace.
//!
//! The [`models`] module holds the vendor-agnostic [`Bar`](models::bar::Bar) and the
//! validated [`BarSeries`](models::bar_series::BarSeries). The [`io`] module loads
//! series from JSON documents produced by a market-data feed or a synthetic generator.

pub mod errors;
pub mod io;
pub mod models;

pub use errors::SeriesError;
pub use models::{bar::Bar, bar_series::BarSeries};
