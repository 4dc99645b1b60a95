/// Comparison orchestration.
///
/// Runs the full pipeline for a selected set of countries: load each cleaned
/// CSV, apply the all-or-nothing combination gate, then — only when combined
/// — grouped statistics, the Kruskal-Wallis test and the ranking. Every
/// recoverable condition (missing file, absent metric, insufficient sample,
/// degenerate test input) is captured in the report and logged; only a
/// malformed file aborts the run with an error.
///
/// The run is deterministic: the same input files produce an identical
/// report, so callers may recompute per interaction instead of caching.

use crate::analysis::combine::{self, CombineOutcome, LoadResult};
use crate::analysis::kruskal::{self, TestOutcome};
use crate::analysis::ranking;
use crate::analysis::stats;
use crate::config::Config;
use crate::countries::Country;
use crate::ingest::csv_loader;
use crate::logging::{self, Stage};
use crate::model::{CountryDataset, LoadError};
use crate::report::{ComparisonReport, CountryLoadStatus};

/// Run the comparison over all countries.
pub fn run_full_comparison(config: &Config) -> Result<ComparisonReport, LoadError> {
    run_comparison(config, &Country::ALL)
}

/// Run the comparison over a selected subset of countries.
///
/// The selection is normalized to declaration order; duplicates are ignored.
/// Returns `Err` only for a malformed file — a missing file is recorded in
/// the report and skips the comparison via the combination gate.
pub fn run_comparison(
    config: &Config,
    selected: &[Country],
) -> Result<ComparisonReport, LoadError> {
    let selection: Vec<Country> = Country::ALL
        .iter()
        .copied()
        .filter(|c| selected.contains(c))
        .collect();

    logging::info(
        Stage::System,
        None,
        &format!(
            "comparing {} countries from {}",
            selection.len(),
            config.data_dir.display()
        ),
    );

    // Stage 1: load each selected country. Missing files are recorded and
    // the remaining countries still attempted; malformed files abort.
    let mut load_results = Vec::with_capacity(selection.len());
    let mut load_statuses = Vec::with_capacity(selection.len());
    for &country in &selection {
        let outcome = match csv_loader::load_country_dataset(&config.data_dir, country) {
            Ok(dataset) => {
                logging::info(
                    Stage::Loader,
                    Some(country.display_name()),
                    &format!("loaded {} rows", dataset.len()),
                );
                load_statuses.push(CountryLoadStatus::loaded(country, &dataset));
                Ok(dataset)
            }
            Err(err @ LoadError::DatasetNotFound { .. }) => {
                logging::log_load_failure(&err);
                load_statuses.push(CountryLoadStatus::failed(country, &err));
                Err(err)
            }
            Err(err @ LoadError::Malformed { .. }) => {
                logging::log_load_failure(&err);
                return Err(err);
            }
        };
        load_results.push(LoadResult { country, outcome });
    }

    // Stage 2: all-or-nothing combination.
    let combine_outcome = combine::combine_all(load_results);
    let combined = match &combine_outcome {
        CombineOutcome::Skipped { missing } => {
            let names: Vec<&str> = missing.iter().map(|c| c.display_name()).collect();
            logging::warn(
                Stage::Combine,
                None,
                &format!("comparison skipped, missing data for: {}", names.join(", ")),
            );
            return Ok(ComparisonReport::skipped(
                selection,
                load_statuses,
                combine_outcome,
                config.significance_level,
            ));
        }
        CombineOutcome::Combined(combined) => combined,
    };

    // Stages 3-5 run only over a complete combination.
    let summary = stats::grouped_summary(combined, &config.target_metrics);
    logging::info(
        Stage::Stats,
        None,
        &format!("summarized {} (country, metric) cells", summary.cells.len()),
    );

    let test = kruskal::kruskal_wallis(combined, config.test_metric, config.min_group_size);
    log_test_outcome(&test);

    let ranking = ranking::rank_by_mean(combined, config.test_metric);
    logging::info(
        Stage::Ranking,
        None,
        &format!("ranked {} countries by mean {}", ranking.entries.len(), ranking.metric),
    );

    Ok(ComparisonReport::completed(
        selection,
        load_statuses,
        combine_outcome,
        summary,
        test,
        ranking,
        config.significance_level,
    ))
}

/// Load a single country's dataset for the dashboard's time-series view.
/// Pure pass-through: no combination gate involved.
pub fn load_single_country(
    config: &Config,
    country: Country,
) -> Result<CountryDataset, LoadError> {
    csv_loader::load_country_dataset(&config.data_dir, country)
}

fn log_test_outcome(outcome: &TestOutcome) {
    match outcome {
        TestOutcome::Completed(result) => logging::info(
            Stage::Test,
            None,
            &format!(
                "Kruskal-Wallis on {}: H = {:.3}, p = {:.3e}",
                result.metric, result.statistic, result.p_value
            ),
        ),
        TestOutcome::Insufficient { reason } => {
            logging::warn(Stage::Test, None, &format!("test skipped: {}", reason));
        }
        TestOutcome::Failed { cause } => {
            logging::warn(
                Stage::Test,
                None,
                &format!("test could not be performed: {}", cause),
            );
        }
    }
}
