/// Configuration for the comparison service.
///
/// Read from `config.toml` next to the binary. Every key is optional; absent
/// keys (or an absent file) fall back to the documented defaults, so the
/// service runs out of the box against a `./data` directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::model::Metric;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Significance threshold for the Kruskal-Wallis interpretation.
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Each country's sample must be strictly larger than this for the
/// hypothesis test to run.
pub const DEFAULT_MIN_GROUP_SIZE: usize = 5;

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_target_metrics() -> Vec<String> {
    vec!["GHI".to_string(), "DNI".to_string(), "DHI".to_string()]
}

fn default_test_metric() -> String {
    "GHI".to_string()
}

fn default_significance_level() -> f64 {
    DEFAULT_SIGNIFICANCE_LEVEL
}

fn default_min_group_size() -> usize {
    DEFAULT_MIN_GROUP_SIZE
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Raw TOML shape. Metric names are validated into `Metric` when converting
/// to `Config`.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
    #[serde(default = "default_target_metrics")]
    target_metrics: Vec<String>,
    #[serde(default = "default_test_metric")]
    test_metric: String,
    #[serde(default = "default_significance_level")]
    significance_level: f64,
    #[serde(default = "default_min_group_size")]
    min_group_size: usize,
}

/// Validated service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the per-country cleaned CSVs.
    pub data_dir: PathBuf,
    /// Metrics the grouped statistics engine summarizes.
    pub target_metrics: Vec<Metric>,
    /// Metric the Kruskal-Wallis test and the ranking use.
    pub test_metric: Metric,
    /// p-value threshold for the "significant" classification.
    pub significance_level: f64,
    /// Strictly-greater-than sample size guard for the hypothesis test.
    pub min_group_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: default_data_dir(),
            target_metrics: vec![Metric::Ghi, Metric::Dni, Metric::Dhi],
            test_metric: Metric::Ghi,
            significance_level: DEFAULT_SIGNIFICANCE_LEVEL,
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration from a TOML file.
///
/// A missing file yields `Config::default()`. A file that exists but cannot
/// be parsed, or that names an unknown metric, is an error — a present but
/// broken config should not be silently ignored.
pub fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let text = std::fs::read_to_string(path)?;
    let raw: RawConfig = toml::from_str(&text)?;
    validate(raw)
}

fn validate(raw: RawConfig) -> Result<Config, Box<dyn std::error::Error>> {
    let mut target_metrics = Vec::with_capacity(raw.target_metrics.len());
    for name in &raw.target_metrics {
        let metric = Metric::from_column_name(name)
            .ok_or_else(|| format!("Unknown target metric in config: {}", name))?;
        target_metrics.push(metric);
    }

    let test_metric = Metric::from_column_name(&raw.test_metric)
        .ok_or_else(|| format!("Unknown test metric in config: {}", raw.test_metric))?;

    if !(0.0..1.0).contains(&raw.significance_level) {
        return Err(format!(
            "significance_level must be in (0, 1), got {}",
            raw.significance_level
        )
        .into());
    }

    Ok(Config {
        data_dir: raw.data_dir,
        target_metrics,
        test_metric,
        significance_level: raw.significance_level,
        min_group_size: raw.min_group_size,
    })
}
