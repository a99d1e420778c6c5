//! Country-level merge & reconciliation (stage 5).
//!
//! Bonds are joined to the weighted CDS spreads by country, the manual
//! name-override rules are applied, and spreads are reconciled so every bond
//! sharing a country carries the identical per-country mean. Bonds with no
//! resolvable spread (unknown or unmapped countries) drop out here.

use std::collections::BTreeMap;

use crate::country::apply_overrides;
use crate::domain::{MergedBond, TaggedBond, WeightedSpread};

/// Join tagged bonds to the weighted spreads and reconcile per country.
pub fn merge_with_spreads(bonds: Vec<TaggedBond>, spreads: &[WeightedSpread]) -> Vec<MergedBond> {
    let by_name: BTreeMap<&str, f64> = spreads
        .iter()
        .map(|s| (s.name.as_str(), s.final_weighted_avg_spread))
        .collect();

    // Correct countries, then look the spread up by the corrected country.
    let joined: Vec<(TaggedBond, Option<f64>)> = bonds
        .into_iter()
        .map(|mut tagged| {
            tagged.country = apply_overrides(&tagged.bond.name, &tagged.country);
            let spread = by_name.get(tagged.country.as_str()).copied();
            (tagged, spread)
        })
        .collect();

    // Per-country mean of the mapped spread. Rows without a spread do not
    // participate, mirroring mean-over-present semantics.
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (tagged, spread) in &joined {
        if let Some(s) = spread {
            let entry = sums.entry(tagged.country.as_str()).or_insert((0.0, 0));
            entry.0 += s;
            entry.1 += 1;
        }
    }
    let means: BTreeMap<String, f64> = sums
        .into_iter()
        .map(|(country, (sum, n))| (country.to_string(), sum / n as f64))
        .collect();

    // Overwrite every bond's spread with its country mean, dropping bonds
    // whose country resolved to nothing.
    joined
        .into_iter()
        .filter_map(|(tagged, _)| {
            let spread = means.get(tagged.country.as_str()).copied()?;
            Some(MergedBond {
                bond: tagged.bond,
                country: tagged.country,
                spread,
            })
        })
        .collect()
}
