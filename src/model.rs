/// Core data types for the cross-country solar comparison service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond field access, no I/O, and no statistics —
/// only types.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::countries::Country;

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// A sensor metric column the comparator understands.
///
/// GHI/DNI/DHI are the irradiance components (W/m²); the remaining metrics
/// are ambient conditions carried along for the time-series pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    Ghi,
    Dni,
    Dhi,
    /// Ambient temperature (°C).
    Tamb,
    /// Relative humidity (%).
    Rh,
    /// Wind speed (m/s).
    Ws,
}

impl Metric {
    /// All metrics, in the column order the cleaned CSVs use.
    pub const ALL: [Metric; 6] = [
        Metric::Ghi,
        Metric::Dni,
        Metric::Dhi,
        Metric::Tamb,
        Metric::Rh,
        Metric::Ws,
    ];

    /// Column header name in the cleaned CSV files.
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::Ghi => "GHI",
            Metric::Dni => "DNI",
            Metric::Dhi => "DHI",
            Metric::Tamb => "Tamb",
            Metric::Rh => "RH",
            Metric::Ws => "WS",
        }
    }

    /// Parse a metric from its column name. Case-sensitive, matching the
    /// cleaned-data headers exactly.
    pub fn from_column_name(name: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.column_name() == name)
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

// ---------------------------------------------------------------------------
// Measurement types
// ---------------------------------------------------------------------------

/// One timestamped sensor reading from a country's cleaned dataset.
///
/// Every metric field is `Option<f64>`: `None` means the cleaning stage left
/// the cell explicitly missing (empty, "null" or NaN in the file). Statistics
/// code filters `None` rather than substituting zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRow {
    pub timestamp: NaiveDateTime,
    pub ghi: Option<f64>,
    pub dni: Option<f64>,
    pub dhi: Option<f64>,
    pub tamb: Option<f64>,
    pub rh: Option<f64>,
    pub ws: Option<f64>,
}

impl MeasurementRow {
    /// Value of one metric on this row, `None` if missing.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Ghi => self.ghi,
            Metric::Dni => self.dni,
            Metric::Dhi => self.dhi,
            Metric::Tamb => self.tamb,
            Metric::Rh => self.rh,
            Metric::Ws => self.ws,
        }
    }
}

/// All rows loaded from one country's cleaned CSV, in file order.
///
/// Produced by `ingest::csv_loader::load_country_dataset`; read-only
/// afterward. `present_metrics` records which metric columns the file header
/// actually carried — a metric absent here contributes only missing values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryDataset {
    pub country: Country,
    pub rows: Vec<MeasurementRow>,
    pub present_metrics: Vec<Metric>,
}

impl CountryDataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One row of the combined dataset: a measurement tagged with its country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledRow {
    pub country: Country,
    pub row: MeasurementRow,
}

/// All selected countries' rows concatenated in declaration order, each
/// country's rows keeping their original file order. Timestamps are retained
/// per row and never globally re-sorted or deduplicated.
///
/// Built by `analysis::combine::combine_all` only when *every* selected
/// country loaded; partial data is rejected, not analyzed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedDataset {
    pub rows: Vec<LabeledRow>,
    /// Union of the metric columns present across the source files.
    pub present_metrics: Vec<Metric>,
}

impl CombinedDataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Countries that contributed at least one row, in first-occurrence
    /// (i.e. declaration) order.
    pub fn countries(&self) -> Vec<Country> {
        let mut seen = Vec::new();
        for labeled in &self.rows {
            if !seen.contains(&labeled.country) {
                seen.push(labeled.country);
            }
        }
        seen
    }

    /// Non-missing values of `metric` for rows labeled `country`,
    /// in row order.
    pub fn metric_values(&self, country: Country, metric: Metric) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|l| l.country == country)
            .filter_map(|l| l.row.metric(metric))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when loading a country's cleaned dataset.
#[derive(Debug, PartialEq)]
pub enum LoadError {
    /// The cleaned CSV for this country does not exist at the expected path.
    /// Recoverable: the caller records it and continues with the other
    /// countries; the combiner then skips the comparison.
    DatasetNotFound { country: Country, path: String },
    /// The file exists but its structure cannot be parsed (missing header,
    /// missing Timestamp column, unparseable cell). This is the one hard
    /// failure class and propagates to the caller.
    Malformed { country: Country, detail: String },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::DatasetNotFound { country, path } => {
                write!(f, "Dataset not found for {}: {}", country, path)
            }
            LoadError::Malformed { country, detail } => {
                write!(f, "Malformed dataset for {}: {}", country, detail)
            }
        }
    }
}

impl std::error::Error for LoadError {}
