/// Dataset combination with the all-or-nothing gate.
///
/// The comparison is only meaningful over the full selected set: a missing
/// country would silently bias every cross-country statistic, so a single
/// load failure skips the combination entirely rather than analyzing a
/// partial union. The gate is a pure validation step — callers get either a
/// combined dataset or the list of countries that blocked it.

use serde::Serialize;

use crate::countries::Country;
use crate::model::{CombinedDataset, CountryDataset, LabeledRow, LoadError, Metric};

/// Result of attempting to load one country, as handed to the combiner.
#[derive(Debug)]
pub struct LoadResult {
    pub country: Country,
    pub outcome: Result<CountryDataset, LoadError>,
}

/// Outcome of the combination step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CombineOutcome {
    /// Every selected country loaded; rows are concatenated in declaration
    /// order, each country's rows in original file order.
    Combined(CombinedDataset),
    /// At least one selected country failed to load. No partial combination
    /// is produced.
    Skipped { missing: Vec<Country> },
}

impl CombineOutcome {
    pub fn combined(&self) -> Option<&CombinedDataset> {
        match self {
            CombineOutcome::Combined(dataset) => Some(dataset),
            CombineOutcome::Skipped { .. } => None,
        }
    }
}

/// Combine per-country load results into a single labeled dataset, or skip
/// if any country is missing.
///
/// `results` is expected in `Country::ALL` declaration order (restricted to
/// the selection); the concatenation preserves that order. Timestamps are
/// kept per row — no global re-sort, no deduplication.
pub fn combine_all(results: Vec<LoadResult>) -> CombineOutcome {
    let missing: Vec<Country> = results
        .iter()
        .filter(|r| r.outcome.is_err())
        .map(|r| r.country)
        .collect();

    if !missing.is_empty() {
        return CombineOutcome::Skipped { missing };
    }

    let mut rows = Vec::new();
    let mut present_metrics: Vec<Metric> = Vec::new();

    for result in results {
        // All outcomes are Ok past the gate above.
        let Ok(dataset) = result.outcome else { continue };
        for metric in &dataset.present_metrics {
            if !present_metrics.contains(metric) {
                present_metrics.push(*metric);
            }
        }
        rows.extend(dataset.rows.into_iter().map(|row| LabeledRow {
            country: dataset.country,
            row,
        }));
    }

    // Canonical metric order regardless of per-file header order.
    present_metrics.sort_by_key(|m| Metric::ALL.iter().position(|c| c == m));

    CombineOutcome::Combined(CombinedDataset {
        rows,
        present_metrics,
    })
}
