//! Loading bar series from external documents.

pub mod source;

pub use source::{JsonFile, JsonReader, LoadError, SeriesSource, parse_series_str};
