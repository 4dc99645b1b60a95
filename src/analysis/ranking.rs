/// Country ranking by mean metric value.
///
/// Orders the countries present in the combined dataset by the mean of one
/// metric, descending. Ties keep the first-occurrence (declaration) order:
/// the sort is stable, so equal means never reorder. Countries with zero
/// non-missing values for the metric are omitted rather than ranked at
/// negative infinity.

use serde::Serialize;

use crate::analysis::stats;
use crate::countries::Country;
use crate::model::{CombinedDataset, Metric};

/// One ranking entry. `rank` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry {
    pub rank: usize,
    pub country: Country,
    pub mean: f64,
}

/// The full ranking for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub metric: Metric,
    pub entries: Vec<RankEntry>,
}

/// Rank countries by mean `metric` value, descending.
pub fn rank_by_mean(combined: &CombinedDataset, metric: Metric) -> Ranking {
    let mut means: Vec<(Country, f64)> = combined
        .countries()
        .into_iter()
        .filter_map(|country| {
            let values = combined.metric_values(country, metric);
            stats::mean(&values).map(|m| (country, m))
        })
        .collect();

    // Stable sort: equal means keep declaration order.
    means.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ranking {
        metric,
        entries: means
            .into_iter()
            .enumerate()
            .map(|(i, (country, mean))| RankEntry {
                rank: i + 1,
                country,
                mean,
            })
            .collect(),
    }
}
