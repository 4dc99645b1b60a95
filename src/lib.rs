/// Cross-country solar irradiance comparison service.
///
/// Loads cleaned per-country sensor CSVs (Benin, Sierra Leone, Togo),
/// combines them under an all-or-nothing gate, computes grouped descriptive
/// statistics, runs a Kruskal-Wallis test across the country groups, and
/// ranks countries by mean GHI. The dashboard and notebook layers consume
/// the resulting `ComparisonReport`.

pub mod analysis;
pub mod comparator;
pub mod config;
pub mod countries;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;
