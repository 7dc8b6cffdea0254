//! Stock anomaly detection engine.
//!
//! Takes a validated [`BarSeries`](market_data::BarSeries), runs a set of
//! independent statistical detectors over it, and merges their output into a
//! ranked list of [`AnomalyRecord`]s. Also derives per-symbol dashboard
//! [`Metrics`] and serves a static [`Methodology`] description.
//!
//! ```
//! use anomaly_engine::{EngineConfig, detect_anomalies};
//! use market_data::BarSeries;
//!
//! let series = BarSeries::empty("AAPL").unwrap();
//! let records = detect_anomalies(&series, &EngineConfig::default()).unwrap();
//! assert!(records.is_empty());
//! ```

pub mod aggregator;
pub mod config;
pub mod detectors;
pub mod engine;
pub mod methodology;
pub mod metrics;
pub mod models;
pub mod stats;

pub use aggregator::{AnomalySummary, aggregate, summarize};
pub use config::{ConfigError, EngineConfig, load_config_path, load_config_str};
pub use engine::{AnomalyEngine, detect_anomalies, detector_plan};
pub use methodology::{Methodology, methodology};
pub use metrics::{Metrics, compute_metrics, return_correlation};
pub use models::{AnomalyCandidate, AnomalyKind, AnomalyRecord, DetectorKind, Severity};
