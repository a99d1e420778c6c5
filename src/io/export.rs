//! Export the pipeline's output tables to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts, so column names mirror the source schema plus the derived fields.
//!
//! Note: the record structs spell every column out instead of flattening a
//! shared inner struct; the CSV serializer rejects `#[serde(flatten)]` (it
//! would force map serialization).

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{ScreenedBond, TaggedBond, WeightedSpread};
use crate::error::AppError;
use crate::report::CarryRow;

/// Output file names, fixed per run.
pub const FILTERED_BONDS_CSV: &str = "filtered_bonds.csv";
pub const WEIGHTED_CDS_CSV: &str = "weighted_cds.csv";
pub const BONDS_WITH_COUNTRY_CSV: &str = "bonds_with_country.csv";
pub const MERGED_BONDS_CDS_CSV: &str = "merged_bonds_cds.csv";
pub const LESS_THAN_1_CSV: &str = "less_than_1.csv";
pub const LESS_THAN_3_CSV: &str = "less_than_3.csv";
pub const LESS_THAN_1_FILTERED_CSV: &str = "less_than_1_filtered.csv";
pub const LESS_THAN_3_FILTERED_CSV: &str = "less_than_3_filtered.csv";

#[derive(Debug, Serialize)]
struct FilteredBondRecord<'a> {
    #[serde(rename = "Ticker")]
    ticker: &'a str,
    #[serde(rename = "Cpn")]
    cpn: f64,
    #[serde(rename = "Maturity")]
    maturity: NaiveDate,
    #[serde(rename = "Mty Type")]
    mty_type: &'a str,
    #[serde(rename = "Amt Out")]
    amt_out: f64,
    #[serde(rename = "Yld to Mty (Bid)")]
    yld_bid: f64,
    #[serde(rename = "Yld to Mty (Ask)")]
    yld_ask: f64,
    #[serde(rename = "Name")]
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct TaggedBondRecord<'a> {
    #[serde(rename = "Ticker")]
    ticker: &'a str,
    #[serde(rename = "Cpn")]
    cpn: f64,
    #[serde(rename = "Maturity")]
    maturity: NaiveDate,
    #[serde(rename = "Mty Type")]
    mty_type: &'a str,
    #[serde(rename = "Amt Out")]
    amt_out: f64,
    #[serde(rename = "Yld to Mty (Bid)")]
    yld_bid: f64,
    #[serde(rename = "Yld to Mty (Ask)")]
    yld_ask: f64,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Country")]
    country: &'a str,
}

#[derive(Debug, Serialize)]
struct WeightedSpreadRecord<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Final_Weighted_Avg_Spread")]
    final_weighted_avg_spread: f64,
}

#[derive(Debug, Serialize)]
struct CarryRecord<'a> {
    #[serde(rename = "Ticker")]
    ticker: &'a str,
    #[serde(rename = "Cpn")]
    cpn: f64,
    #[serde(rename = "Maturity")]
    maturity: NaiveDate,
    #[serde(rename = "Mty Type")]
    mty_type: &'a str,
    #[serde(rename = "Amt Out")]
    amt_out: f64,
    #[serde(rename = "Yld to Mty (Bid)")]
    yld_bid: f64,
    #[serde(rename = "Yld to Mty (Ask)")]
    yld_ask: f64,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Country")]
    country: &'a str,
    #[serde(rename = "Final_Weighted_Avg_Spread")]
    spread: f64,
    #[serde(rename = "Final_Weighted_Avg_Spread_Percentage")]
    spread_pct: f64,
    #[serde(rename = "Y-CDS")]
    ycds: f64,
}

/// Write the post-filter bond table.
pub fn write_filtered_bonds(path: &Path, bonds: &[ScreenedBond]) -> Result<(), AppError> {
    let mut writer = open_writer(path)?;
    for b in bonds {
        writer
            .serialize(FilteredBondRecord {
                ticker: &b.ticker,
                cpn: b.cpn,
                maturity: b.maturity,
                mty_type: &b.mty_type,
                amt_out: b.amt_out,
                yld_bid: b.yld_bid,
                yld_ask: b.yld_ask,
                name: &b.name,
            })
            .map_err(|e| write_error(path, e))?;
    }
    finish(path, writer)
}

/// Write the country-tagged bond table.
pub fn write_tagged_bonds(path: &Path, bonds: &[TaggedBond]) -> Result<(), AppError> {
    let mut writer = open_writer(path)?;
    for tagged in bonds {
        let b = &tagged.bond;
        writer
            .serialize(TaggedBondRecord {
                ticker: &b.ticker,
                cpn: b.cpn,
                maturity: b.maturity,
                mty_type: &b.mty_type,
                amt_out: b.amt_out,
                yld_bid: b.yld_bid,
                yld_ask: b.yld_ask,
                name: &b.name,
                country: &tagged.country,
            })
            .map_err(|e| write_error(path, e))?;
    }
    finish(path, writer)
}

/// Write the per-name weighted CDS spreads.
pub fn write_weighted_spreads(path: &Path, spreads: &[WeightedSpread]) -> Result<(), AppError> {
    let mut writer = open_writer(path)?;
    for s in spreads {
        writer
            .serialize(WeightedSpreadRecord {
                name: &s.name,
                final_weighted_avg_spread: s.final_weighted_avg_spread,
            })
            .map_err(|e| write_error(path, e))?;
    }
    finish(path, writer)
}

/// Write a merged bonds+CDS table with carry metrics (also used for tiers).
pub fn write_carry_table(path: &Path, rows: &[CarryRow]) -> Result<(), AppError> {
    let mut writer = open_writer(path)?;
    for row in rows {
        let b = &row.merged.bond;
        writer
            .serialize(CarryRecord {
                ticker: &b.ticker,
                cpn: b.cpn,
                maturity: b.maturity,
                mty_type: &b.mty_type,
                amt_out: b.amt_out,
                yld_bid: b.yld_bid,
                yld_ask: b.yld_ask,
                name: &b.name,
                country: &row.merged.country,
                spread: row.merged.spread,
                spread_pct: row.spread_pct,
                ycds: row.ycds,
            })
            .map_err(|e| write_error(path, e))?;
    }
    finish(path, writer)
}

fn open_writer(path: &Path) -> Result<csv::Writer<std::fs::File>, AppError> {
    csv::Writer::from_path(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })
}

fn write_error(path: &Path, e: csv::Error) -> AppError {
    AppError::new(2, format!("Failed to write export CSV '{}': {e}", path.display()))
}

fn finish(path: &Path, mut writer: csv::Writer<std::fs::File>) -> Result<(), AppError> {
    writer.flush().map_err(|e| {
        AppError::new(2, format!("Failed to flush export CSV '{}': {e}", path.display()))
    })
}
