/// Country registry for the cross-country solar comparison service.
///
/// Defines the canonical list of countries covered by the cleaned solar
/// datasets, along with their display names and cleaned-file stems. This is
/// the single source of truth for country identity and ordering — all other
/// modules should reference countries from here rather than hardcoding
/// labels. The declaration order of `Country::ALL` is the combination order
/// and the stable tie order for rankings.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Country enumeration
// ---------------------------------------------------------------------------

/// One of the monitored countries. The set is closed: the cleaning stage
/// produces exactly one file per country listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Country {
    Benin,
    SierraLeone,
    Togo,
}

impl Country {
    /// All countries in canonical declaration order.
    pub const ALL: [Country; 3] = [Country::Benin, Country::SierraLeone, Country::Togo];

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Country::Benin => "Benin",
            Country::SierraLeone => "Sierra Leone",
            Country::Togo => "Togo",
        }
    }

    /// File stem of the cleaned CSV: `<stem>_clean.csv` in the data
    /// directory.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Country::Benin => "benin",
            Country::SierraLeone => "sierraleone",
            Country::Togo => "togo",
        }
    }

    /// Cleaned-CSV file name for this country.
    pub fn clean_file_name(&self) -> String {
        format!("{}_clean.csv", self.file_stem())
    }

    /// Parse a country from its display name or file stem.
    pub fn parse(name: &str) -> Option<Country> {
        Country::ALL
            .iter()
            .copied()
            .find(|c| c.display_name().eq_ignore_ascii_case(name) || c.file_stem() == name.to_ascii_lowercase())
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Country metadata
// ---------------------------------------------------------------------------

/// Metadata for a single monitored solar measurement site.
pub struct CountryInfo {
    pub country: Country,
    /// Location of the measurement station the dataset comes from.
    pub site_name: &'static str,
    /// Human-readable description of the dataset's role in the comparison.
    pub description: &'static str,
}

/// All monitored countries with site metadata, in canonical order.
///
/// Sources: the Solar Radiation Measurement Data campaign files the cleaned
/// CSVs are derived from.
pub static COUNTRY_REGISTRY: &[CountryInfo] = &[
    CountryInfo {
        country: Country::Benin,
        site_name: "Malanville, Benin",
        description: "Northern Benin site; highest expected irradiance of the \
                      three, used as the performance reference.",
    },
    CountryInfo {
        country: Country::SierraLeone,
        site_name: "Bumbuna, Sierra Leone",
        description: "Humid inland site; cloud cover depresses GHI relative \
                      to the Sahel-adjacent sites.",
    },
    CountryInfo {
        country: Country::Togo,
        site_name: "Dapaong, Togo",
        description: "Northern Togo site; comparable climate to Malanville, \
                      useful as a near-peer comparison group.",
    },
];
