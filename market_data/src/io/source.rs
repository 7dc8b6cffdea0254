//! Series sources: where the engine's input comes from.
//!
//! The engine itself never performs I/O. Callers pick a [`SeriesSource`]
//! (a JSON file, stdin, or their own feed adapter) and hand the resulting
//! [`BarSeries`] to the detectors.
//!
//! The JSON document shape is:
//!
//! ```json
//! { "symbol": "AAPL",
//!   "bars": [ { "date": "2024-01-02", "open": 187.1, "high": 188.4,
//!               "low": 183.9, "close": 185.6, "volume": 82488700 } ] }
//! ```

use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use snafu::{Backtrace, ResultExt, Snafu};

use crate::models::bar_series::BarSeries;

/// Errors raised while loading a series.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LoadError {
    /// The file could not be opened or read.
    #[snafu(display("Failed to read {}: {source}", path.display()))]
    Read {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// The document is not valid JSON, does not match the schema, or contains
    /// a malformed bar.
    #[snafu(display("Invalid series document: {source}"))]
    Parse {
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}

/// Anything that can produce a validated [`BarSeries`].
pub trait SeriesSource {
    /// Load the series.
    fn load(&mut self) -> Result<BarSeries, LoadError>;
}

/// A JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    /// Point at a JSON series document.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SeriesSource for JsonFile {
    fn load(&mut self) -> Result<BarSeries, LoadError> {
        let file = File::open(&self.path).context(ReadSnafu { path: &self.path })?;
        serde_json::from_reader(BufReader::new(file)).context(ParseSnafu)
    }
}

/// A JSON document read from any [`Read`] implementation (e.g. stdin).
pub struct JsonReader<R> {
    reader: R,
}

impl<R: Read> JsonReader<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> SeriesSource for JsonReader<R> {
    fn load(&mut self) -> Result<BarSeries, LoadError> {
        serde_json::from_reader(&mut self.reader).context(ParseSnafu)
    }
}

/// Parse a series from an in-memory JSON string.
pub fn parse_series_str(json: &str) -> Result<BarSeries, LoadError> {
    serde_json::from_str(json).context(ParseSnafu)
}
