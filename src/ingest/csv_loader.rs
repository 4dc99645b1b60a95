/// Cleaned-CSV loader
///
/// Reads one per-country cleaned CSV into a `CountryDataset`. The expected
/// shape is a header row with a `Timestamp` column plus named metric columns
/// (GHI, DNI, DHI, Tamb, RH, WS — unknown columns are ignored). Cells that
/// are empty, "null" or NaN become explicit missing values; a present but
/// non-numeric cell is treated as a malformed file, since the cleaning stage
/// is supposed to have produced numeric data.

use chrono::NaiveDateTime;
use csv::StringRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::countries::Country;
use crate::model::{CountryDataset, LoadError, MeasurementRow, Metric};

/// Header name of the timestamp column in cleaned files.
const TIMESTAMP_COLUMN: &str = "Timestamp";

/// Timestamp formats the cleaning stage emits. Minute precision appears in
/// the raw campaign data, second precision after pandas round-trips.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Path of a country's cleaned CSV inside `data_dir`.
pub fn clean_file_path(data_dir: &Path, country: Country) -> PathBuf {
    data_dir.join(country.clean_file_name())
}

/// Load one country's cleaned dataset from `data_dir`.
///
/// A missing file returns `LoadError::DatasetNotFound` (recoverable — the
/// caller records it and continues with the other countries). Any structural
/// problem returns `LoadError::Malformed`, the hard failure class.
pub fn load_country_dataset(data_dir: &Path, country: Country) -> Result<CountryDataset, LoadError> {
    let path = clean_file_path(data_dir, country);
    if !path.exists() {
        return Err(LoadError::DatasetNotFound {
            country,
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&path)
        .map_err(|e| malformed(country, format!("failed to open {}: {}", path.display(), e)))?;

    let headers = reader
        .headers()
        .map_err(|e| malformed(country, format!("failed to read header row: {}", e)))?
        .clone();

    let columns = map_columns(country, &headers)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        // records() starts at line 2, after the header
        let line = i + 2;
        let record =
            record.map_err(|e| malformed(country, format!("line {}: {}", line, e)))?;
        rows.push(parse_row(country, &columns, &record, line)?);
    }

    Ok(CountryDataset {
        country,
        rows,
        present_metrics: columns.present_metrics(),
    })
}

// ---------------------------------------------------------------------------
// Header mapping
// ---------------------------------------------------------------------------

/// Resolved column indices for one file.
struct ColumnMap {
    timestamp: usize,
    /// Metric to column index, only for metrics present in the header.
    metrics: HashMap<Metric, usize>,
}

impl ColumnMap {
    fn present_metrics(&self) -> Vec<Metric> {
        // Report in canonical metric order, not header order.
        Metric::ALL
            .iter()
            .copied()
            .filter(|m| self.metrics.contains_key(m))
            .collect()
    }
}

fn map_columns(country: Country, headers: &StringRecord) -> Result<ColumnMap, LoadError> {
    let mut timestamp = None;
    let mut metrics = HashMap::new();

    for (idx, name) in headers.iter().enumerate() {
        if name == TIMESTAMP_COLUMN {
            timestamp = Some(idx);
        } else if let Some(metric) = Metric::from_column_name(name) {
            metrics.insert(metric, idx);
        }
        // Unknown columns (cleaning artifacts, comment fields) are ignored.
    }

    let timestamp = timestamp.ok_or_else(|| {
        malformed(
            country,
            format!("header row has no '{}' column", TIMESTAMP_COLUMN),
        )
    })?;

    Ok(ColumnMap { timestamp, metrics })
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

fn parse_row(
    country: Country,
    columns: &ColumnMap,
    record: &StringRecord,
    line: usize,
) -> Result<MeasurementRow, LoadError> {
    let raw_ts = record.get(columns.timestamp).ok_or_else(|| {
        malformed(country, format!("line {}: row is missing the timestamp field", line))
    })?;

    let timestamp = parse_timestamp(raw_ts).ok_or_else(|| {
        malformed(
            country,
            format!("line {}: unparseable timestamp '{}'", line, raw_ts),
        )
    })?;

    let field = |metric: Metric| -> Result<Option<f64>, LoadError> {
        match columns.metrics.get(&metric) {
            None => Ok(None), // column absent from this file
            Some(&idx) => {
                let cell = record.get(idx).unwrap_or("");
                parse_field(cell).map_err(|()| {
                    malformed(
                        country,
                        format!("line {}: non-numeric {} value '{}'", line, metric, cell),
                    )
                })
            }
        }
    };

    Ok(MeasurementRow {
        timestamp,
        ghi: field(Metric::Ghi)?,
        dni: field(Metric::Dni)?,
        dhi: field(Metric::Dhi)?,
        tamb: field(Metric::Tamb)?,
        rh: field(Metric::Rh)?,
        ws: field(Metric::Ws)?,
    })
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Parse a metric cell that might be missing.
///
/// Empty, "null" and NaN spellings are missing; anything else must be a
/// float. Returns Err(()) for a present but non-numeric cell.
fn parse_field(s: &str) -> Result<Option<f64>, ()> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "null" || trimmed == "NaN" || trimmed == "nan" {
        return Ok(None);
    }
    trimmed.parse::<f64>().map(Some).map_err(|_| ())
}

fn malformed(country: Country, detail: String) -> LoadError {
    LoadError::Malformed { country, detail }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
