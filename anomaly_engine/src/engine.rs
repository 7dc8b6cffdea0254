//! Detection entrypoints: fan the series out to the detectors, fan the
//! candidates back in, and aggregate.

use market_data::BarSeries;
use tracing::{debug, instrument};

use crate::aggregator::aggregate;
use crate::config::{ConfigError, EngineConfig};
use crate::metrics::{Metrics, compute_metrics};
use crate::models::{AnomalyCandidate, AnomalyRecord, DetectorKind};

/// Detectors that will run for `series` under `config`, in a fixed order.
///
/// Disabled detectors and detectors whose minimum length is not met are left
/// out. The day-over-day detector joins when the series is shorter than
/// `fallback_min_len`.
pub fn detector_plan(series: &BarSeries, config: &EngineConfig) -> Vec<DetectorKind> {
    let n = series.len();
    let mut plan: Vec<DetectorKind> = DetectorKind::ADVANCED
        .into_iter()
        .filter(|d| config.is_enabled(*d))
        .filter(|d| {
            let needed = d.min_len(config);
            if n < needed {
                debug!(detector = %d, bars = n, needed, "series too short, skipping");
            }
            n >= needed
        })
        .collect();

    if n < config.fallback_min_len && config.is_enabled(DetectorKind::DayOverDay) {
        plan.push(DetectorKind::DayOverDay);
    }
    plan
}

#[cfg(any(not(feature = "parallel"), test))]
fn run_serial(
    plan: &[DetectorKind],
    series: &BarSeries,
    config: &EngineConfig,
) -> Vec<AnomalyCandidate> {
    plan.iter().flat_map(|d| d.run(series, config)).collect()
}

#[cfg(not(feature = "parallel"))]
fn run_detectors(
    plan: &[DetectorKind],
    series: &BarSeries,
    config: &EngineConfig,
) -> Vec<AnomalyCandidate> {
    run_serial(plan, series, config)
}

#[cfg(feature = "parallel")]
fn run_detectors(
    plan: &[DetectorKind],
    series: &BarSeries,
    config: &EngineConfig,
) -> Vec<AnomalyCandidate> {
    use rayon::prelude::*;

    // collect keeps plan order, so the fan-in is identical to the serial path
    let per_detector: Vec<Vec<AnomalyCandidate>> =
        plan.par_iter().map(|d| d.run(series, config)).collect();
    per_detector.into_iter().flatten().collect()
}

/// Detection over a config that has already passed [`EngineConfig::validate`].
#[instrument(level = "debug", skip_all, fields(symbol = series.symbol(), bars = series.len()))]
fn detect_validated(series: &BarSeries, config: &EngineConfig) -> Vec<AnomalyRecord> {
    if series.is_empty() {
        return vec![];
    }

    let plan = detector_plan(series, config);
    let candidates = run_detectors(&plan, series, config);
    let raw = candidates.len();
    let records = aggregate(candidates);
    debug!(detectors = plan.len(), raw, merged = records.len(), "detection complete");
    records
}

/// Validate `config`, then run every applicable detector over `series` and
/// return the merged, score-sorted anomaly list.
///
/// An empty series yields an empty list. Errors only when `config` fails
/// [`EngineConfig::validate`]; use [`AnomalyEngine`] to validate once and
/// detect many times.
pub fn detect_anomalies(
    series: &BarSeries,
    config: &EngineConfig,
) -> Result<Vec<AnomalyRecord>, ConfigError> {
    config.validate()?;
    Ok(detect_validated(series, config))
}

/// A validated configuration bundled with the detection and metrics entrypoints.
#[derive(Debug, Clone, Default)]
pub struct AnomalyEngine {
    config: EngineConfig,
}

impl AnomalyEngine {
    /// Validate `config` and build an engine around it.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// See [`detect_anomalies`]; the config was validated in [`AnomalyEngine::new`].
    pub fn detect(&self, series: &BarSeries) -> Vec<AnomalyRecord> {
        detect_validated(series, &self.config)
    }

    /// See [`compute_metrics`].
    pub fn metrics(&self, series: &BarSeries) -> Metrics {
        compute_metrics(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::fixtures;

    #[test]
    fn plan_skips_short_and_disabled_detectors() {
        let cfg = EngineConfig::default();

        let plan = detector_plan(&fixtures::constant(10), &cfg);
        assert_eq!(
            plan,
            vec![
                DetectorKind::ZScore,
                DetectorKind::Isolation,
                DetectorKind::Pattern,
                DetectorKind::DayOverDay
            ]
        );

        let plan = detector_plan(&fixtures::constant(40), &cfg);
        assert_eq!(plan, DetectorKind::ADVANCED.to_vec());

        let mut cfg = EngineConfig::default();
        cfg.macd.enabled = false;
        cfg.day_over_day.enabled = false;
        let plan = detector_plan(&fixtures::constant(5), &cfg);
        assert!(!plan.contains(&DetectorKind::DayOverDay));
        assert!(!plan.contains(&DetectorKind::Macd));
    }

    #[test]
    fn engine_rejects_invalid_config() {
        let mut cfg = EngineConfig::default();
        cfg.zscore.threshold = 0.0;
        assert!(AnomalyEngine::new(cfg).is_err());
        assert!(AnomalyEngine::new(EngineConfig::default()).is_ok());
    }

    #[test]
    fn weights_scale_scores() {
        let mut closes = vec![100.0; 25];
        closes[20] = 150.0;
        let series = fixtures::series(&closes, &[1_000; 25]);

        let mut only_z = EngineConfig::default();
        only_z.bollinger.enabled = false;
        only_z.isolation.enabled = false;
        only_z.pattern.enabled = false;
        let base = detect_anomalies(&series, &only_z).unwrap();

        only_z.zscore.weight = 2.0;
        let doubled = detect_anomalies(&series, &only_z).unwrap();

        assert_eq!(base.len(), 1);
        assert!((doubled[0].score - 2.0 * base[0].score).abs() < 1e-9);
        assert_eq!(doubled[0].severity, base[0].severity);
    }

    fn spiked() -> BarSeries {
        let mut closes = vec![100.0; 25];
        closes[20] = 150.0;
        fixtures::series(&closes, &[1_000; 25])
    }

    #[test]
    fn unvalidated_configs_are_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.zscore.weight = f64::NAN;
        assert!(matches!(
            detect_anomalies(&spiked(), &cfg),
            Err(ConfigError::InvalidWeight { section: "zscore", .. })
        ));

        let mut cfg = EngineConfig::default();
        cfg.zscore.threshold = -1.0;
        assert_eq!(
            detect_anomalies(&spiked(), &cfg),
            Err(ConfigError::NotPositive {
                section: "zscore",
                field: "threshold"
            })
        );
    }

    #[test]
    fn huge_windows_skip_detectors_without_overflow() {
        let mut cfg = EngineConfig::default();
        cfg.pattern.window = usize::MAX;
        cfg.macd.slow_period = usize::MAX;
        cfg.macd.signal_period = usize::MAX;
        assert!(cfg.validate().is_ok());

        let plan = detector_plan(&spiked(), &cfg);
        assert!(!plan.contains(&DetectorKind::Pattern));
        assert!(!plan.contains(&DetectorKind::Macd));
        assert_eq!(detect_anomalies(&spiked(), &cfg).unwrap().len(), 1);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_fan_out_matches_serial() {
        let mut closes: Vec<f64> = (0..60).map(|i| 100.0 + (i % 7) as f64).collect();
        closes[45] = 160.0;
        let mut volumes = vec![1_000u64; 60];
        volumes[45] = 9_000;
        let series = fixtures::series(&closes, &volumes);
        let cfg = EngineConfig::default();
        let plan = detector_plan(&series, &cfg);

        let serial = run_serial(&plan, &series, &cfg);
        let parallel = run_detectors(&plan, &series, &cfg);
        assert!(!serial.is_empty());
        assert_eq!(serial, parallel);

        let fingerprint = |records: Vec<AnomalyRecord>| -> Vec<_> {
            records
                .into_iter()
                .map(|r| (r.date, r.kind, r.score, r.severity))
                .collect()
        };
        assert_eq!(
            fingerprint(aggregate(serial)),
            fingerprint(detect_anomalies(&series, &cfg).unwrap())
        );
    }
}
