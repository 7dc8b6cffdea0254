//! Market data models.

pub mod bar;
pub mod bar_series;
