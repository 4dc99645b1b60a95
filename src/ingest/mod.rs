/// Cleaned-data ingest for the comparison service.
///
/// The cleaning stage (external notebooks) writes one `<country>_clean.csv`
/// per country; this module reads those files into typed datasets. There is
/// no raw-sensor ingest here — cleaning is out of scope.
///
/// Submodules:
/// - `csv_loader` — reads one cleaned CSV into a `CountryDataset`.

pub mod csv_loader;
