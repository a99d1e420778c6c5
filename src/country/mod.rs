//! Country tagging for free-text issuer names.
//!
//! Two layers, applied at different pipeline stages:
//!
//! - [`extract_country`]: the generic first-match substring scan over a fixed,
//!   priority-ordered country list (stage 3)
//! - [`apply_overrides`]: manual corrections for known naming quirks, applied
//!   during the merge (stage 5); every matching rule assigns, so the *last*
//!   match wins

use crate::domain::{ScreenedBond, TaggedBond};

/// Known country names and entities, in match-priority order.
///
/// Order is the tie-break for ambiguous names: earlier entries win the
/// first-match scan. `"Philippine"` deliberately trails `"Philippines"`.
pub const COUNTRIES: &[&str] = &[
    "Abu Dhabi",
    "Argentina",
    "Australia",
    "Austria",
    "Bahrain",
    "Belgium",
    "Brazil",
    "Bulgaria",
    "Canada",
    "Chile",
    "China",
    "Colombia",
    "Costa Rica",
    "Croatia",
    "Cyprus",
    "Czech",
    "Denmark",
    "Dominican Republic",
    "Dubai",
    "Ecuador",
    "Egypt",
    "El Salvador",
    "Estonia",
    "Finland",
    "France",
    "Gabon",
    "Germany",
    "Greece",
    "Guatemala",
    "Hong Kong",
    "Hungary",
    "Iceland",
    "India",
    "Indonesia",
    "Iraq",
    "Ireland",
    "Israel",
    "Italy",
    "Japan",
    "Kazakhstan",
    "Korea",
    "Kuwait",
    "Latvia",
    "Lithuania",
    "Malaysia",
    "Mexico",
    "Morocco",
    "Netherlands",
    "New Zealand",
    "Nigeria",
    "Norway",
    "Oman",
    "Pakistan",
    "Panama",
    "Peru",
    "Philippines",
    "Poland",
    "Portugal",
    "Qatar",
    "Romania",
    "Saudi Arabia",
    "Serbia",
    "Singapore",
    "Slovakia",
    "Slovenia",
    "South Africa",
    "Spain",
    "Sweden",
    "Switzerland",
    "Thailand",
    "Tunisia",
    "Turkey",
    "United Kingdom",
    "United States",
    "Uruguay",
    "Venezuela",
    "Vietnam",
    "Philippine",
];

/// Tag returned when no country in the list matches.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Manual corrections keyed on substrings of the original issuer name.
///
/// Applied in order, each matching rule assigning its country; a name that
/// matches several rules ends up with the last one.
pub const COUNTRY_OVERRIDES: &[(&str, &str)] = &[
    ("federal", "United States"),
    ("korea", "South Korea"),
    ("turkiye", "Turkey"),
    ("deutschland", "Germany"),
    ("french", "France"),
    ("hellenic", "Greece"),
    ("bundes", "Germany"),
    ("romanian", "Romania"),
    ("philippine", "Philippines"),
];

/// Extract a country from a free-text issuer name.
///
/// Pure, deterministic, case-insensitive substring match; returns the first
/// list entry contained in the name, else [`UNKNOWN_COUNTRY`].
pub fn extract_country(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    for country in COUNTRIES {
        if lower.contains(&country.to_lowercase()) {
            return country;
        }
    }
    UNKNOWN_COUNTRY
}

/// Correct a previously extracted country for known naming quirks.
pub fn apply_overrides(name: &str, country: &str) -> String {
    let lower = name.to_lowercase();
    let mut out = country.to_string();
    for (needle, mapped) in COUNTRY_OVERRIDES {
        if lower.contains(needle) {
            out = (*mapped).to_string();
        }
    }
    out
}

/// Tag every screened bond with its extracted country.
pub fn tag_bonds(bonds: Vec<ScreenedBond>) -> Vec<TaggedBond> {
    bonds
        .into_iter()
        .map(|bond| {
            let country = extract_country(&bond.name).to_string();
            TaggedBond { bond, country }
        })
        .collect()
}
