/// Consumer surface for the comparison results.
///
/// The dashboard/notebook layer consumes this module: a serializable report
/// carrying per-country load status, the combination outcome, the summary
/// table, the test outcome and the ranking, plus the raw combined rows for
/// ad-hoc plotting. Display rounding (three decimal places) and the
/// significance interpretation live here — they are presentation concerns,
/// never applied to the stored values.

use serde::Serialize;

use crate::analysis::combine::CombineOutcome;
use crate::analysis::kruskal::{TestOutcome, TestResult};
use crate::analysis::ranking::Ranking;
use crate::analysis::stats::SummaryTable;
use crate::countries::Country;
use crate::model::{CombinedDataset, CountryDataset, LoadError};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Per-country outcome of the load stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryLoadStatus {
    pub country: Country,
    pub loaded: bool,
    pub row_count: usize,
    pub error_message: Option<String>,
}

impl CountryLoadStatus {
    pub fn loaded(country: Country, dataset: &CountryDataset) -> Self {
        CountryLoadStatus {
            country,
            loaded: true,
            row_count: dataset.len(),
            error_message: None,
        }
    }

    pub fn failed(country: Country, err: &LoadError) -> Self {
        CountryLoadStatus {
            country,
            loaded: false,
            row_count: 0,
            error_message: Some(err.to_string()),
        }
    }
}

/// Full result of one comparison run.
///
/// `combined` holds the raw labeled rows when the combination gate passed;
/// statistics fields are `None` when the comparison was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Countries the run was asked to compare, in declaration order.
    pub selected: Vec<Country>,
    pub load_statuses: Vec<CountryLoadStatus>,
    /// Whether the all-or-nothing gate passed, and the missing countries if
    /// not. The combined rows themselves live in `combined`.
    pub skipped_missing: Option<Vec<Country>>,
    pub combined: Option<CombinedDataset>,
    pub summary: Option<SummaryTable>,
    pub test: Option<TestOutcome>,
    pub ranking: Option<Ranking>,
    /// Threshold the interpretation compares p against.
    pub significance_level: f64,
}

impl ComparisonReport {
    pub fn skipped(
        selected: Vec<Country>,
        load_statuses: Vec<CountryLoadStatus>,
        outcome: CombineOutcome,
        significance_level: f64,
    ) -> Self {
        let skipped_missing = match outcome {
            CombineOutcome::Skipped { missing } => Some(missing),
            CombineOutcome::Combined(_) => None,
        };
        ComparisonReport {
            selected,
            load_statuses,
            skipped_missing,
            combined: None,
            summary: None,
            test: None,
            ranking: None,
            significance_level,
        }
    }

    pub fn completed(
        selected: Vec<Country>,
        load_statuses: Vec<CountryLoadStatus>,
        outcome: CombineOutcome,
        summary: SummaryTable,
        test: TestOutcome,
        ranking: Ranking,
        significance_level: f64,
    ) -> Self {
        let combined = match outcome {
            CombineOutcome::Combined(dataset) => Some(dataset),
            CombineOutcome::Skipped { .. } => None,
        };
        ComparisonReport {
            selected,
            load_statuses,
            skipped_missing: None,
            combined,
            summary: Some(summary),
            test: Some(test),
            ranking: Some(ranking),
            significance_level,
        }
    }

    /// Whether the all-or-nothing gate passed.
    pub fn comparison_ran(&self) -> bool {
        self.combined.is_some()
    }

    /// Serialize the report to pretty JSON for the dashboard layer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Presentation helpers
// ---------------------------------------------------------------------------

/// Round to three decimal places for display. Computation keeps full
/// precision; only rendered values go through this.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn fmt3(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.3}", round3(v)),
        None => "n/a".to_string(),
    }
}

/// Classify a completed test against the significance threshold. Derived at
/// render time, never stored.
pub fn interpret(result: &TestResult, significance_level: f64) -> &'static str {
    if result.p_value < significance_level {
        "significant"
    } else {
        "not significant"
    }
}

/// Human-readable status line for the test step.
pub fn test_status_line(outcome: &TestOutcome, significance_level: f64) -> String {
    match outcome {
        TestOutcome::Completed(result) => format!(
            "Kruskal-Wallis on {}: H = {:.3}, p = {:.3e} ({} at α = {})",
            result.metric,
            round3(result.statistic),
            result.p_value,
            interpret(result, significance_level),
            significance_level
        ),
        TestOutcome::Insufficient { reason } => format!("Test skipped: {}", reason),
        TestOutcome::Failed { cause } => format!("Test could not be performed: {}", cause),
    }
}

// ---------------------------------------------------------------------------
// Console summary
// ---------------------------------------------------------------------------

pub fn print_summary(report: &ComparisonReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 CROSS-COUNTRY SOLAR COMPARISON");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for status in &report.load_statuses {
        if status.loaded {
            println!("  ✓ {:<14} {} rows", status.country.display_name(), status.row_count);
        } else {
            println!(
                "  ✗ {:<14} {}",
                status.country.display_name(),
                status.error_message.as_deref().unwrap_or("Unknown")
            );
        }
    }
    println!();

    if let Some(missing) = &report.skipped_missing {
        let names: Vec<&str> = missing.iter().map(|c| c.display_name()).collect();
        println!("Comparison skipped — missing data for: {}", names.join(", "));
        println!("All selected countries must load before any cross-country");
        println!("statistics are computed.");
        println!("═══════════════════════════════════════════════════════════");
        return;
    }

    if let Some(summary) = &report.summary {
        println!("Summary statistics (per country, per metric):");
        println!("  {:<14} {:<6} {:>10} {:>10} {:>10} {:>8}", "Country", "Metric", "Mean", "Median", "Std Dev", "Count");
        for cell in &summary.cells {
            println!(
                "  {:<14} {:<6} {:>10} {:>10} {:>10} {:>8}",
                cell.country.display_name(),
                cell.metric.column_name(),
                fmt3(cell.mean),
                fmt3(cell.median),
                fmt3(cell.std_dev),
                cell.count
            );
        }
        for metric in &summary.skipped_metrics {
            println!("  (metric {} absent from the data — skipped)", metric);
        }
        println!();
    }

    if let Some(test) = &report.test {
        println!("{}", test_status_line(test, report.significance_level));
        println!();
    }

    if let Some(ranking) = &report.ranking {
        println!("Ranking by mean {} (W/m²):", ranking.metric);
        for entry in &ranking.entries {
            println!(
                "  {}. {:<14} {}",
                entry.rank,
                entry.country.display_name(),
                fmt3(Some(entry.mean))
            );
        }
    }

    println!("═══════════════════════════════════════════════════════════");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Metric;

    fn result_with_p(p_value: f64) -> TestResult {
        TestResult {
            metric: Metric::Ghi,
            statistic: 12.3456789,
            p_value,
            degrees_of_freedom: 2,
            group_sizes: vec![(Country::Benin, 10), (Country::Togo, 10)],
        }
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(20.4996), 20.5);
        assert_eq!(round3(18.2004), 18.2);
        assert_eq!(round3(-0.0004), -0.0);
    }

    #[test]
    fn test_interpretation_threshold() {
        assert_eq!(interpret(&result_with_p(0.01), 0.05), "significant");
        assert_eq!(interpret(&result_with_p(0.2), 0.05), "not significant");
        // Exactly at the threshold is not significant (strict less-than).
        assert_eq!(interpret(&result_with_p(0.05), 0.05), "not significant");
    }

    #[test]
    fn test_status_lines_for_skips_and_failures() {
        let skipped = TestOutcome::Insufficient {
            reason: "Benin has only 3 GHI values (need more than 5)".to_string(),
        };
        assert!(test_status_line(&skipped, 0.05).starts_with("Test skipped"));

        let failed = TestOutcome::Failed {
            cause: "all pooled values are identical; H is undefined".to_string(),
        };
        assert!(test_status_line(&failed, 0.05).contains("could not be performed"));
    }
}
