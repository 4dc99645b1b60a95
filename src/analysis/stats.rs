/// Grouped descriptive statistics over the combined dataset.
///
/// Computes per-(country, metric) mean, median and sample standard deviation
/// with missing values excluded from both numerator and divisor. All
/// computation is full f64 precision; display rounding happens in the report
/// layer. Also provides the time-series helpers the dashboard layer uses for
/// single-country plots.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::countries::Country;
use crate::logging::{self, Stage};
use crate::model::{CombinedDataset, CountryDataset, Metric};

// ---------------------------------------------------------------------------
// Scalar statistics
// ---------------------------------------------------------------------------

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median with midpoint averaging for even counts. `None` for an empty
/// slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Sample standard deviation (N−1 denominator). `None` for fewer than two
/// values, where the sample variant is undefined.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((sum_sq / (n - 1) as f64).sqrt())
}

// ---------------------------------------------------------------------------
// Grouped summary
// ---------------------------------------------------------------------------

/// Descriptive statistics for one (country, metric) cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCell {
    pub country: Country,
    pub metric: Metric,
    /// Count of non-missing values the statistics are computed over.
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// `None` when fewer than two non-missing values exist.
    pub std_dev: Option<f64>,
}

/// Grouped summary over every country present and every requested metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    /// Cells in (country, metric) order: countries in first-occurrence
    /// order, metrics in the requested order.
    pub cells: Vec<SummaryCell>,
    /// Requested metrics absent from every loaded file, skipped with a
    /// warning rather than failing.
    pub skipped_metrics: Vec<Metric>,
}

impl SummaryTable {
    pub fn cell(&self, country: Country, metric: Metric) -> Option<&SummaryCell> {
        self.cells
            .iter()
            .find(|c| c.country == country && c.metric == metric)
    }
}

/// Compute the grouped summary for `target_metrics` over the combined
/// dataset.
///
/// A target metric that none of the source files carried is skipped with a
/// warning-level log; metrics present in only some files simply contribute
/// missing values elsewhere.
pub fn grouped_summary(combined: &CombinedDataset, target_metrics: &[Metric]) -> SummaryTable {
    let countries = combined.countries();
    let mut cells = Vec::new();
    let mut skipped_metrics = Vec::new();

    for &metric in target_metrics {
        if !combined.present_metrics.contains(&metric) {
            logging::warn(
                Stage::Stats,
                None,
                &format!("metric {} absent from all loaded files, skipping", metric),
            );
            skipped_metrics.push(metric);
            continue;
        }

        for &country in &countries {
            let values = combined.metric_values(country, metric);
            cells.push(SummaryCell {
                country,
                metric,
                count: values.len(),
                mean: mean(&values),
                median: median(&values),
                std_dev: sample_std(&values),
            });
        }
    }

    // (country, metric) ordering: country-major, requested-metric-minor.
    cells.sort_by_key(|c| {
        (
            countries.iter().position(|&x| x == c.country),
            target_metrics.iter().position(|&x| x == c.metric),
        )
    });

    SummaryTable {
        cells,
        skipped_metrics,
    }
}

// ---------------------------------------------------------------------------
// Time-series helpers (dashboard pass-through)
// ---------------------------------------------------------------------------

/// Non-missing (timestamp, value) pairs for one metric of a single country's
/// dataset, in file order. Used by the dashboard when exactly one country is
/// selected.
pub fn metric_series(dataset: &CountryDataset, metric: Metric) -> Vec<(NaiveDateTime, f64)> {
    dataset
        .rows
        .iter()
        .filter_map(|row| row.metric(metric).map(|v| (row.timestamp, v)))
        .collect()
}

/// Downsample a series to per-calendar-day means, preserving first-seen day
/// order. High-frequency sensor data is unreadable when plotted raw; the
/// dashboard plots daily averages instead.
pub fn daily_mean(series: &[(NaiveDateTime, f64)]) -> Vec<(NaiveDate, f64)> {
    let mut days: Vec<(NaiveDate, f64, usize)> = Vec::new();
    for &(ts, value) in series {
        let date = ts.date();
        match days.iter_mut().find(|(d, _, _)| *d == date) {
            Some((_, sum, count)) => {
                *sum += value;
                *count += 1;
            }
            None => days.push((date, value, 1)),
        }
    }
    days.into_iter()
        .map(|(date, sum, count)| (date, sum / count as f64))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LabeledRow, MeasurementRow};

    fn row(day: u32, h: u32, ghi: Option<f64>, dni: Option<f64>) -> MeasurementRow {
        MeasurementRow {
            timestamp: NaiveDate::from_ymd_opt(2021, 8, day)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
            ghi,
            dni,
            dhi: None,
            tamb: None,
            rh: None,
            ws: None,
        }
    }

    fn combined_fixture() -> CombinedDataset {
        // Benin GHI = [10, 20, 30] (one missing), SierraLeone GHI = [5, 5, 5].
        CombinedDataset {
            rows: vec![
                LabeledRow { country: Country::Benin, row: row(9, 10, Some(10.0), None) },
                LabeledRow { country: Country::Benin, row: row(9, 11, Some(20.0), None) },
                LabeledRow { country: Country::Benin, row: row(9, 12, None, None) },
                LabeledRow { country: Country::Benin, row: row(9, 13, Some(30.0), None) },
                LabeledRow { country: Country::SierraLeone, row: row(9, 10, Some(5.0), None) },
                LabeledRow { country: Country::SierraLeone, row: row(9, 11, Some(5.0), None) },
                LabeledRow { country: Country::SierraLeone, row: row(9, 12, Some(5.0), None) },
            ],
            present_metrics: vec![Metric::Ghi],
        }
    }

    // --- Scalar statistics --------------------------------------------------

    #[test]
    fn test_mean_median_of_empty_are_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(sample_std(&[]), None);
    }

    #[test]
    fn test_median_even_and_odd_counts() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
    }

    #[test]
    fn test_sample_std_uses_n_minus_one() {
        // [10, 20, 30]: sample variance = (100 + 0 + 100) / 2 = 100.
        let std = sample_std(&[10.0, 20.0, 30.0]).unwrap();
        assert!((std - 10.0).abs() < 1e-12, "expected 10, got {}", std);
        // Undefined for a single value.
        assert_eq!(sample_std(&[42.0]), None);
    }

    // --- Grouped summary ----------------------------------------------------

    #[test]
    fn test_grouped_summary_matches_hand_computed_values() {
        let table = grouped_summary(&combined_fixture(), &[Metric::Ghi]);

        let benin = table.cell(Country::Benin, Metric::Ghi).unwrap();
        assert_eq!(benin.count, 3, "missing value excluded from the count");
        assert!((benin.mean.unwrap() - 20.0).abs() < 1e-12);
        assert!((benin.median.unwrap() - 20.0).abs() < 1e-12);
        assert!((benin.std_dev.unwrap() - 10.0).abs() < 1e-12);

        let sl = table.cell(Country::SierraLeone, Metric::Ghi).unwrap();
        assert_eq!(sl.count, 3);
        assert_eq!(sl.mean, Some(5.0));
        assert_eq!(sl.median, Some(5.0));
        assert_eq!(sl.std_dev, Some(0.0));
    }

    #[test]
    fn test_absent_metric_skipped_not_failed() {
        let table = grouped_summary(&combined_fixture(), &[Metric::Ghi, Metric::Dhi]);
        assert_eq!(table.skipped_metrics, vec![Metric::Dhi]);
        assert!(table.cell(Country::Benin, Metric::Dhi).is_none());
        assert!(table.cell(Country::Benin, Metric::Ghi).is_some());
    }

    // --- Time series --------------------------------------------------------

    #[test]
    fn test_metric_series_filters_missing() {
        let dataset = CountryDataset {
            country: Country::Togo,
            rows: vec![
                row(9, 10, Some(100.0), None),
                row(9, 11, None, None),
                row(9, 12, Some(200.0), None),
            ],
            present_metrics: vec![Metric::Ghi],
        };
        let series = metric_series(&dataset, Metric::Ghi);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].1, 100.0);
        assert_eq!(series[1].1, 200.0);
    }

    #[test]
    fn test_daily_mean_groups_by_calendar_day() {
        let series = vec![
            (row(9, 10, None, None).timestamp, 100.0),
            (row(9, 14, None, None).timestamp, 300.0),
            (row(10, 12, None, None).timestamp, 50.0),
        ];
        let daily = daily_mean(&series);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0], (NaiveDate::from_ymd_opt(2021, 8, 9).unwrap(), 200.0));
        assert_eq!(daily[1], (NaiveDate::from_ymd_opt(2021, 8, 10).unwrap(), 50.0));
    }
}
