/// Kruskal-Wallis rank test across country groups.
///
/// Tests whether the per-country samples of one metric originate from the
/// same distribution. H0: all groups share a distribution. The test is
/// rank-based (no normality assumption), with average ranks for ties, a tie
/// correction factor, and a chi-squared approximation with k−1 degrees of
/// freedom for the p-value.
///
/// Guard rails before computing: at least two non-empty groups, and every
/// group strictly larger than the configured minimum (default 5). Below
/// that the chi-squared approximation is unreliable, so the step reports
/// "insufficient data" instead of a number nobody should trust.

use serde::Serialize;

use crate::countries::Country;
use crate::model::{CombinedDataset, Metric};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// A completed Kruskal-Wallis computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub metric: Metric,
    /// Tie-corrected H statistic.
    pub statistic: f64,
    /// Survival-function p-value from the chi-squared approximation.
    pub p_value: f64,
    /// k − 1, where k is the number of groups tested.
    pub degrees_of_freedom: usize,
    /// Per-group sample sizes, in group order.
    pub group_sizes: Vec<(Country, usize)>,
}

/// Outcome of the hypothesis-test step. Skips and degenerate inputs are
/// reported, not raised — they must not abort the rest of the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TestOutcome {
    Completed(TestResult),
    /// The sample-size precondition was not met.
    Insufficient { reason: String },
    /// The numeric routine could not produce a result (degenerate input,
    /// e.g. every pooled value identical).
    Failed { cause: String },
}

impl TestOutcome {
    pub fn result(&self) -> Option<&TestResult> {
        match self {
            TestOutcome::Completed(result) => Some(result),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Test entry point
// ---------------------------------------------------------------------------

/// Run the Kruskal-Wallis test on `metric` across all countries present in
/// the combined dataset.
///
/// `min_group_size` is a strictly-greater-than bound: a group of exactly
/// that many values trips the insufficient-data guard.
pub fn kruskal_wallis(
    combined: &CombinedDataset,
    metric: Metric,
    min_group_size: usize,
) -> TestOutcome {
    let groups: Vec<(Country, Vec<f64>)> = combined
        .countries()
        .into_iter()
        .map(|c| (c, combined.metric_values(c, metric)))
        .filter(|(_, values)| !values.is_empty())
        .collect();

    if groups.len() < 2 {
        return TestOutcome::Insufficient {
            reason: format!(
                "need at least 2 groups with data for {}, have {}",
                metric,
                groups.len()
            ),
        };
    }

    if let Some((country, values)) = groups.iter().find(|(_, v)| v.len() <= min_group_size) {
        return TestOutcome::Insufficient {
            reason: format!(
                "{} has only {} {} values (need more than {})",
                country,
                values.len(),
                metric,
                min_group_size
            ),
        };
    }

    let samples: Vec<&[f64]> = groups.iter().map(|(_, v)| v.as_slice()).collect();
    match h_statistic(&samples) {
        Ok(statistic) => {
            let df = groups.len() - 1;
            let p_value = chi2_survival(statistic, df);
            TestOutcome::Completed(TestResult {
                metric,
                statistic,
                p_value,
                degrees_of_freedom: df,
                group_sizes: groups.iter().map(|(c, v)| (*c, v.len())).collect(),
            })
        }
        Err(cause) => TestOutcome::Failed { cause },
    }
}

// ---------------------------------------------------------------------------
// H statistic
// ---------------------------------------------------------------------------

/// Tie-corrected Kruskal-Wallis H over the given samples.
///
/// Pools all samples, assigns average ranks to ties, computes
/// H = 12/(N(N+1)) · Σ Rᵢ²/nᵢ − 3(N+1), then divides by the tie correction
/// 1 − Σ(t³−t)/(N³−N). Errors on degenerate input where the correction
/// collapses to zero (all pooled values identical).
fn h_statistic(samples: &[&[f64]]) -> Result<f64, String> {
    let n_total: usize = samples.iter().map(|s| s.len()).sum();
    let n = n_total as f64;

    // Pool with group tags, sort, then assign average ranks to ties.
    let mut pooled: Vec<(f64, usize)> = Vec::with_capacity(n_total);
    for (group_idx, sample) in samples.iter().enumerate() {
        for &value in *sample {
            if !value.is_finite() {
                return Err(format!("non-finite value {} in group {}", value, group_idx));
            }
            pooled.push((value, group_idx));
        }
    }
    pooled.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut rank_sums = vec![0.0_f64; samples.len()];
    let mut tie_term = 0.0_f64; // Σ (t³ − t) over tie groups

    let mut i = 0;
    while i < pooled.len() {
        let mut j = i;
        while j < pooled.len() && pooled[j].0 == pooled[i].0 {
            j += 1;
        }
        // Ranks are 1-based; positions i..j share the average rank.
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for k in i..j {
            rank_sums[pooled[k].1] += avg_rank;
        }
        let t = (j - i) as f64;
        if t > 1.0 {
            tie_term += t * t * t - t;
        }
        i = j;
    }

    let rank_sq_term: f64 = samples
        .iter()
        .enumerate()
        .map(|(g, s)| rank_sums[g] * rank_sums[g] / s.len() as f64)
        .sum();

    let h = 12.0 / (n * (n + 1.0)) * rank_sq_term - 3.0 * (n + 1.0);

    let correction = 1.0 - tie_term / (n * n * n - n);
    if correction <= 0.0 {
        return Err("all pooled values are identical; H is undefined".to_string());
    }

    let h_corrected = h / correction;
    if !h_corrected.is_finite() {
        return Err(format!("H statistic is not finite ({})", h_corrected));
    }
    Ok(h_corrected)
}

/// p-value from the chi-squared survival function with `df` degrees of
/// freedom.
fn chi2_survival(x: f64, df: usize) -> f64 {
    use statrs::distribution::{ChiSquared, ContinuousCDF};

    if let Ok(chi2) = ChiSquared::new(df as f64) {
        1.0 - chi2.cdf(x)
    } else {
        1.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::model::{LabeledRow, MeasurementRow};

    fn combined_from(groups: &[(Country, &[f64])]) -> CombinedDataset {
        let mut rows = Vec::new();
        for (country, values) in groups {
            for (i, &v) in values.iter().enumerate() {
                rows.push(LabeledRow {
                    country: *country,
                    row: MeasurementRow {
                        timestamp: NaiveDate::from_ymd_opt(2021, 8, 9)
                            .unwrap()
                            .and_hms_opt(10, 0, i as u32)
                            .unwrap(),
                        ghi: Some(v),
                        dni: None,
                        dhi: None,
                        tamb: None,
                        rh: None,
                        ws: None,
                    },
                });
            }
        }
        CombinedDataset {
            rows,
            present_metrics: vec![Metric::Ghi],
        }
    }

    #[test]
    fn test_separated_groups_are_significant() {
        // Ranges far apart: every Benin value below every SierraLeone value
        // below every Togo value. Six values each to clear the guard.
        let combined = combined_from(&[
            (Country::Benin, &[1.0, 2.0, 3.0, 1.5, 2.5, 3.5]),
            (Country::SierraLeone, &[10.0, 11.0, 12.0, 10.5, 11.5, 12.5]),
            (Country::Togo, &[20.0, 21.0, 22.0, 20.5, 21.5, 22.5]),
        ]);

        let outcome = kruskal_wallis(&combined, Metric::Ghi, 5);
        let result = outcome.result().expect("test should complete");
        assert_eq!(result.degrees_of_freedom, 2);
        assert!(
            result.p_value < 0.01,
            "fully separated groups should be clearly significant, p = {}",
            result.p_value
        );
        // No ties, full separation: H is at its maximum for these sizes.
        assert!(result.statistic > 10.0, "H = {}", result.statistic);
    }

    #[test]
    fn test_identical_distributions_are_not_significant() {
        // Interleaved values so the samples genuinely share a distribution.
        let a: Vec<f64> = (0..10).map(|i| i as f64 * 3.0).collect();
        let b: Vec<f64> = (0..10).map(|i| i as f64 * 3.0 + 1.0).collect();
        let c: Vec<f64> = (0..10).map(|i| i as f64 * 3.0 + 2.0).collect();
        let combined = combined_from(&[
            (Country::Benin, &a),
            (Country::SierraLeone, &b),
            (Country::Togo, &c),
        ]);

        let outcome = kruskal_wallis(&combined, Metric::Ghi, 5);
        let result = outcome.result().expect("test should complete");
        assert!(
            result.p_value > 0.05,
            "interleaved groups should not reject H0, p = {}",
            result.p_value
        );
    }

    #[test]
    fn test_small_group_trips_insufficient_guard() {
        let combined = combined_from(&[
            (Country::Benin, &[1.0, 2.0, 3.0]),
            (Country::SierraLeone, &[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]),
        ]);

        match kruskal_wallis(&combined, Metric::Ghi, 5) {
            TestOutcome::Insufficient { reason } => {
                assert!(reason.contains("Benin"), "reason was: {}", reason);
            }
            other => panic!("expected Insufficient, got {:?}", other),
        }
    }

    #[test]
    fn test_exactly_min_group_size_is_insufficient() {
        // The guard is strictly greater than: 5 values with min 5 must skip.
        let combined = combined_from(&[
            (Country::Benin, &[1.0, 2.0, 3.0, 4.0, 5.0]),
            (Country::Togo, &[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]),
        ]);
        assert!(matches!(
            kruskal_wallis(&combined, Metric::Ghi, 5),
            TestOutcome::Insufficient { .. }
        ));
    }

    #[test]
    fn test_single_group_is_insufficient() {
        let combined = combined_from(&[(Country::Togo, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])]);
        assert!(matches!(
            kruskal_wallis(&combined, Metric::Ghi, 5),
            TestOutcome::Insufficient { .. }
        ));
    }

    #[test]
    fn test_all_identical_values_fail_gracefully() {
        // Zero variance everywhere: tie correction collapses to zero.
        let combined = combined_from(&[
            (Country::Benin, &[7.0; 6]),
            (Country::Togo, &[7.0; 6]),
        ]);

        match kruskal_wallis(&combined, Metric::Ghi, 5) {
            TestOutcome::Failed { cause } => {
                assert!(cause.contains("identical"), "cause was: {}", cause);
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_h_matches_reference_value_without_ties() {
        // Hand-checked against scipy.stats.kruskal:
        // kruskal([1,2,3,4,5,6], [7,8,9,10,11,12]) -> H = 8.3076923...
        let h = h_statistic(&[
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0],
        ])
        .unwrap();
        assert!((h - 8.307692307692307).abs() < 1e-9, "H = {}", h);
    }

    #[test]
    fn test_tie_correction_increases_h() {
        // Same data with and without a tie; the corrected H with ties must
        // exceed the uncorrected value since the correction factor < 1.
        let h_tied = h_statistic(&[&[1.0, 2.0, 2.0, 4.0, 5.0, 6.0], &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]]).unwrap();
        let h_plain = h_statistic(&[&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]]).unwrap();
        // Rank sums are unchanged (the tie is within one group), so the only
        // difference is the correction divisor.
        assert!(h_tied > h_plain, "tied H {} <= plain H {}", h_tied, h_plain);
    }
}
