//! Statistics Verification Tests
//!
//! Verifies the grouped statistics engine, the Kruskal-Wallis test and the
//! ranking producer against hand-computed fixtures, through the public crate
//! API.

use chrono::NaiveDate;

use solcomp_service::analysis::kruskal::{kruskal_wallis, TestOutcome};
use solcomp_service::analysis::ranking::rank_by_mean;
use solcomp_service::analysis::stats::grouped_summary;
use solcomp_service::countries::Country;
use solcomp_service::model::{CombinedDataset, LabeledRow, MeasurementRow, Metric};
use solcomp_service::report::{interpret, test_status_line};

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

fn ghi_row(minute: u32, ghi: f64) -> MeasurementRow {
    MeasurementRow {
        timestamp: NaiveDate::from_ymd_opt(2021, 8, 9)
            .unwrap()
            .and_hms_opt(12, minute % 60, minute / 60)
            .unwrap(),
        ghi: Some(ghi),
        dni: None,
        dhi: None,
        tamb: None,
        rh: None,
        ws: None,
    }
}

fn combined_from(groups: &[(Country, &[f64])]) -> CombinedDataset {
    let mut rows = Vec::new();
    for (country, values) in groups {
        for (i, &v) in values.iter().enumerate() {
            rows.push(LabeledRow {
                country: *country,
                row: ghi_row(i as u32, v),
            });
        }
    }
    CombinedDataset {
        rows,
        present_metrics: vec![Metric::Ghi],
    }
}

// ---------------------------------------------------------------------------
// Grouped statistics
// ---------------------------------------------------------------------------

#[test]
fn test_summary_matches_hand_computed_fixture() {
    // Benin GHI = [10, 20, 30] -> mean 20, median 20, sample std 10.
    // SierraLeone GHI = [5, 5, 5] -> mean 5, median 5, std 0.
    let combined = combined_from(&[
        (Country::Benin, &[10.0, 20.0, 30.0]),
        (Country::SierraLeone, &[5.0, 5.0, 5.0]),
    ]);

    let table = grouped_summary(&combined, &[Metric::Ghi]);

    let benin = table.cell(Country::Benin, Metric::Ghi).unwrap();
    assert_eq!(benin.mean, Some(20.0));
    assert_eq!(benin.median, Some(20.0));
    assert!((benin.std_dev.unwrap() - 10.0).abs() < 1e-12);

    let sl = table.cell(Country::SierraLeone, Metric::Ghi).unwrap();
    assert_eq!(sl.mean, Some(5.0));
    assert_eq!(sl.median, Some(5.0));
    assert_eq!(sl.std_dev, Some(0.0));
}

// ---------------------------------------------------------------------------
// Kruskal-Wallis
// ---------------------------------------------------------------------------

#[test]
fn test_separated_ranges_reject_the_null() {
    // Three groups with clearly separated ranges, each large enough to
    // clear the guard.
    let combined = combined_from(&[
        (Country::Benin, &[1.0, 2.0, 3.0, 1.2, 2.2, 3.2]),
        (Country::SierraLeone, &[10.0, 11.0, 12.0, 10.2, 11.2, 12.2]),
        (Country::Togo, &[20.0, 21.0, 22.0, 20.2, 21.2, 22.2]),
    ]);

    let outcome = kruskal_wallis(&combined, Metric::Ghi, 5);
    let result = outcome.result().expect("test should complete");
    assert!(result.p_value < 0.05, "p = {}", result.p_value);
    assert_eq!(interpret(result, 0.05), "significant");
}

#[test]
fn test_identical_distributions_fail_to_reject() {
    // Interleave the same arithmetic progression across the three groups.
    let a: Vec<f64> = (0..12).map(|i| (i * 3) as f64).collect();
    let b: Vec<f64> = (0..12).map(|i| (i * 3 + 1) as f64).collect();
    let c: Vec<f64> = (0..12).map(|i| (i * 3 + 2) as f64).collect();
    let combined = combined_from(&[
        (Country::Benin, &a),
        (Country::SierraLeone, &b),
        (Country::Togo, &c),
    ]);

    let outcome = kruskal_wallis(&combined, Metric::Ghi, 5);
    let result = outcome.result().expect("test should complete");
    assert!(result.p_value > 0.05, "p = {}", result.p_value);
    assert_eq!(interpret(result, 0.05), "not significant");
}

#[test]
fn test_three_value_group_reports_insufficient_data() {
    let combined = combined_from(&[
        (Country::Benin, &[1.0, 2.0, 3.0]),
        (Country::SierraLeone, &[4.0, 5.0, 6.0, 7.0, 8.0, 9.0]),
        (Country::Togo, &[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]),
    ]);

    let outcome = kruskal_wallis(&combined, Metric::Ghi, 5);
    match &outcome {
        TestOutcome::Insufficient { reason } => {
            assert!(reason.contains("Benin"), "reason: {}", reason);
        }
        other => panic!("expected insufficient-data report, got {:?}", other),
    }

    let line = test_status_line(&outcome, 0.05);
    assert!(line.starts_with("Test skipped"), "line: {}", line);
}

#[test]
fn test_degenerate_input_is_reported_not_raised() {
    let combined = combined_from(&[
        (Country::Benin, &[100.0; 8]),
        (Country::Togo, &[100.0; 8]),
    ]);

    let outcome = kruskal_wallis(&combined, Metric::Ghi, 5);
    match &outcome {
        TestOutcome::Failed { cause } => assert!(!cause.is_empty()),
        other => panic!("expected Failed with a cause, got {:?}", other),
    }

    let line = test_status_line(&outcome, 0.05);
    assert!(line.contains("could not be performed"), "line: {}", line);
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

#[test]
fn test_ranking_order_for_known_means() {
    // Means: Benin 18.2, Togo 20.5, SierraLeone 15.0 -> Togo, Benin, SL.
    let combined = combined_from(&[
        (Country::Benin, &[18.2, 18.2]),
        (Country::SierraLeone, &[15.0, 15.0]),
        (Country::Togo, &[20.5, 20.5]),
    ]);

    let ranking = rank_by_mean(&combined, Metric::Ghi);
    let order: Vec<Country> = ranking.entries.iter().map(|e| e.country).collect();
    assert_eq!(order, vec![Country::Togo, Country::Benin, Country::SierraLeone]);
    assert_eq!(
        ranking.entries.iter().map(|e| e.rank).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}
