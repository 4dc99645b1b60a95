/// Comparison analysis for the solar service.
///
/// Plotting and dashboard widgets are handled by the external notebook and
/// dashboard layer, which consumes this module's outputs.
///
/// Submodules:
/// - `combine` — all-or-nothing union of per-country datasets.
/// - `stats` — grouped mean/median/std plus time-series helpers.
/// - `kruskal` — Kruskal-Wallis rank test across country groups.
/// - `ranking` — countries ordered by mean metric value.

pub mod combine;
pub mod kruskal;
pub mod ranking;
pub mod stats;
