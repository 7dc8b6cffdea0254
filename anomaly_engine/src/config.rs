//! Engine configuration: per-detector switches, weights, and parameters.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! yields the stock configuration. A file only needs the knobs it changes:
//!
//! ```toml
//! fallback_min_len = 15
//!
//! [zscore]
//! threshold = 3.0
//!
//! [isolation]
//! enabled = false
//! ```
//!
//! Entrypoints:
//! - Parse + validate from a TOML string: [`load_config_str`]
//! - Parse + validate from a file path: [`load_config_path`]

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::DetectorKind;

/// Reasons a configuration is rejected by [`EngineConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A period, window, or threshold that must be strictly positive is not.
    #[error("{section}.{field} must be greater than zero")]
    NotPositive {
        /// Config section, e.g. `bollinger`.
        section: &'static str,
        /// Field within the section.
        field: &'static str,
    },

    /// A detector weight is negative, NaN, or infinite.
    #[error("{section}.weight must be a finite, non-negative number (got {value})")]
    InvalidWeight {
        /// Config section.
        section: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Contamination must leave some points on both sides of the cut.
    #[error("isolation.contamination must be within (0, 1) (got {0})")]
    Contamination(f64),

    /// The fast EMA must be shorter than the slow one.
    #[error("macd.fast_period ({fast}) must be shorter than macd.slow_period ({slow})")]
    MacdPeriods {
        /// Fast EMA period.
        fast: usize,
        /// Slow EMA period.
        slow: usize,
    },
}

/// Z-score detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZScoreConfig {
    /// Run this detector.
    pub enabled: bool,
    /// Multiplier applied to every score before merging.
    pub weight: f64,
    /// Flag bars whose |z| exceeds this.
    pub threshold: f64,
}

impl Default for ZScoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            weight: 1.0,
            threshold: 2.5,
        }
    }
}

/// Bollinger band detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BollingerConfig {
    /// Run this detector.
    pub enabled: bool,
    /// Multiplier applied to every score before merging.
    pub weight: f64,
    /// SMA window; also the minimum series length.
    pub period: usize,
    /// Band width in standard deviations.
    pub std_multiplier: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            weight: 1.0,
            period: 20,
            std_multiplier: 2.0,
        }
    }
}

/// MACD histogram detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MacdConfig {
    /// Run this detector.
    pub enabled: bool,
    /// Multiplier applied to every score before merging.
    pub weight: f64,
    /// Fast EMA period.
    pub fast_period: usize,
    /// Slow EMA period.
    pub slow_period: usize,
    /// Signal-line EMA period.
    pub signal_period: usize,
    /// |histogram| must exceed this multiple of the previous |histogram|.
    pub jump_ratio: f64,
    /// |histogram| must also exceed this absolute floor.
    pub min_histogram: f64,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            weight: 1.0,
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
            jump_ratio: 2.0,
            min_histogram: 0.5,
        }
    }
}

/// Isolation-score detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IsolationConfig {
    /// Run this detector.
    pub enabled: bool,
    /// Multiplier applied to every score before merging.
    pub weight: f64,
    /// Expected share of anomalous bars; the cut is the `(1 - contamination)` percentile.
    pub contamination: f64,
}

impl Default for IsolationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            weight: 1.0,
            contamination: 0.1,
        }
    }
}

/// Pump-and-dump pattern detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternConfig {
    /// Run this detector.
    pub enabled: bool,
    /// Multiplier applied to every score before merging.
    pub weight: f64,
    /// Bars on each side of the peak.
    pub window: usize,
    /// Minimum run-up into the peak, as a fraction.
    pub min_pump: f64,
    /// Minimum decline after the peak, as a fraction.
    pub min_dump: f64,
    /// Minimum peak volume relative to the series average.
    pub min_volume_spike: f64,
    /// Confidence ceiling.
    pub max_confidence: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            weight: 1.0,
            window: 3,
            min_pump: 0.10,
            min_dump: 0.08,
            min_volume_spike: 2.0,
            max_confidence: 0.9,
        }
    }
}

/// Day-over-day fallback detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DayOverDayConfig {
    /// Run this detector on short series.
    pub enabled: bool,
    /// Multiplier applied to every score before merging.
    pub weight: f64,
    /// Flag absolute close-to-close moves above this fraction.
    pub price_change: f64,
    /// Flag absolute volume moves above this fraction.
    pub volume_change: f64,
}

impl Default for DayOverDayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            weight: 1.0,
            price_change: 0.05,
            volume_change: 1.0,
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Series shorter than this also get the day-over-day detector.
    pub fallback_min_len: usize,
    /// Z-score detector.
    pub zscore: ZScoreConfig,
    /// Bollinger band detector.
    pub bollinger: BollingerConfig,
    /// MACD detector.
    pub macd: MacdConfig,
    /// Isolation-score detector.
    pub isolation: IsolationConfig,
    /// Pump-and-dump detector.
    pub pattern: PatternConfig,
    /// Day-over-day fallback detector.
    pub day_over_day: DayOverDayConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_min_len: 20,
            zscore: ZScoreConfig::default(),
            bollinger: BollingerConfig::default(),
            macd: MacdConfig::default(),
            isolation: IsolationConfig::default(),
            pattern: PatternConfig::default(),
            day_over_day: DayOverDayConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Whether `detector` is switched on.
    pub fn is_enabled(&self, detector: DetectorKind) -> bool {
        match detector {
            DetectorKind::ZScore => self.zscore.enabled,
            DetectorKind::Bollinger => self.bollinger.enabled,
            DetectorKind::Macd => self.macd.enabled,
            DetectorKind::Isolation => self.isolation.enabled,
            DetectorKind::Pattern => self.pattern.enabled,
            DetectorKind::DayOverDay => self.day_over_day.enabled,
        }
    }

    /// Score multiplier for `detector`.
    pub fn weight(&self, detector: DetectorKind) -> f64 {
        match detector {
            DetectorKind::ZScore => self.zscore.weight,
            DetectorKind::Bollinger => self.bollinger.weight,
            DetectorKind::Macd => self.macd.weight,
            DetectorKind::Isolation => self.isolation.weight,
            DetectorKind::Pattern => self.pattern.weight,
            DetectorKind::DayOverDay => self.day_over_day.weight,
        }
    }

    /// Check every section; the first problem found is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (section, weight) in [
            ("zscore", self.zscore.weight),
            ("bollinger", self.bollinger.weight),
            ("macd", self.macd.weight),
            ("isolation", self.isolation.weight),
            ("pattern", self.pattern.weight),
            ("day_over_day", self.day_over_day.weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    section,
                    value: weight,
                });
            }
        }

        positive("zscore", "threshold", self.zscore.threshold)?;
        positive_len("bollinger", "period", self.bollinger.period)?;
        positive("bollinger", "std_multiplier", self.bollinger.std_multiplier)?;

        positive_len("macd", "fast_period", self.macd.fast_period)?;
        positive_len("macd", "slow_period", self.macd.slow_period)?;
        positive_len("macd", "signal_period", self.macd.signal_period)?;
        if self.macd.fast_period >= self.macd.slow_period {
            return Err(ConfigError::MacdPeriods {
                fast: self.macd.fast_period,
                slow: self.macd.slow_period,
            });
        }
        positive("macd", "jump_ratio", self.macd.jump_ratio)?;
        positive("macd", "min_histogram", self.macd.min_histogram)?;

        let c = self.isolation.contamination;
        if !(c > 0.0 && c < 1.0) {
            return Err(ConfigError::Contamination(c));
        }

        positive_len("pattern", "window", self.pattern.window)?;
        positive("pattern", "min_pump", self.pattern.min_pump)?;
        positive("pattern", "min_dump", self.pattern.min_dump)?;
        positive("pattern", "min_volume_spike", self.pattern.min_volume_spike)?;
        positive("pattern", "max_confidence", self.pattern.max_confidence)?;

        positive("day_over_day", "price_change", self.day_over_day.price_change)?;
        positive("day_over_day", "volume_change", self.day_over_day.volume_change)?;
        Ok(())
    }
}

fn positive(section: &'static str, field: &'static str, value: f64) -> Result<(), ConfigError> {
    // NaN fails the comparison as well
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { section, field })
    }
}

fn positive_len(section: &'static str, field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { section, field })
    }
}

/// Parse and validate an [`EngineConfig`] from a TOML string.
///
/// Errors:
/// - TOML parse failures, including unknown keys
/// - Validation failures (see [`EngineConfig::validate`])
pub fn load_config_str(toml_str: &str) -> anyhow::Result<EngineConfig> {
    let cfg: EngineConfig =
        toml::from_str(toml_str).context("failed to parse engine config TOML")?;
    cfg.validate().context("invalid engine config")?;
    Ok(cfg)
}

/// Read an engine config TOML file from disk, parse, and validate it.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<EngineConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read engine config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
