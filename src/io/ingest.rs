//! CSV ingest and normalization for the bond and CDS source tables.
//!
//! This module turns heterogeneous spreadsheet exports into typed rows that
//! are safe to filter.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level tolerance** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (coercion rules are fixed, no inference)
//! - **Separation of concerns**: no filtering logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{BOND_COLUMNS, BondRow};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub ticker: Option<String>,
    pub message: String,
}

/// Ingest output for the bond table: typed rows + source schema + row errors.
#[derive(Debug, Clone)]
pub struct BondTable {
    pub rows: Vec<BondRow>,
    /// Source column names, trimmed and BOM-stripped, in file order.
    pub headers: Vec<String>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// The CDS table is kept as raw cells under its *exact* header names.
///
/// The upstream export spells one column `Spread 5Y ` (trailing space); the
/// aggregator must match it exactly, so headers are not trimmed here.
#[derive(Debug, Clone)]
pub struct CdsTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Load and type the bond source table.
pub fn load_bond_table(path: &Path) -> Result<BondTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open bonds CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read bonds CSV headers: {e}")))?
        .clone();

    let headers: Vec<String> = headers.iter().map(normalize_header_name).collect();
    let header_map = build_header_map(&headers);
    ensure_bond_columns_exist(&header_map)?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because records() starts after the header row and CSV line
        // numbers are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    ticker: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_bond_row(&record, &header_map) {
            Ok(row) => rows.push(row),
            Err((ticker, message)) => row_errors.push(RowError {
                line,
                ticker,
                message,
            }),
        }
    }

    Ok(BondTable {
        rows,
        headers,
        row_errors,
        rows_read,
    })
}

/// Load the CDS source table as raw cells.
///
/// No schema validation happens here: the spread aggregator owns the
/// precondition on its input columns and reports the exact missing name.
pub fn load_cds_table(path: &Path) -> Result<CdsTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CDS CSV '{}': {e}", path.display()))
    })?;

    // No trimming: header whitespace is significant for this table.
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CDS CSV headers: {e}")))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| AppError::new(2, format!("CDS CSV parse error: {e}")))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(CdsTable { headers, rows })
}

fn build_header_map(headers: &[String]) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.to_ascii_lowercase(), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "﻿Ticker"). If we don't strip it, schema
    // validation will incorrectly report missing columns.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn ensure_bond_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for col in BOND_COLUMNS {
        if !header_map.contains_key(&col.to_ascii_lowercase()) {
            return Err(AppError::new(
                2,
                format!("Bonds CSV is missing required column: `{col}`"),
            ));
        }
    }
    Ok(())
}

fn parse_bond_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<BondRow, (Option<String>, String)> {
    let ticker = get_required(record, header_map, "ticker")
        .map_err(|e| (None, e))?
        .to_string();
    let name = get_required(record, header_map, "name")
        .map_err(|e| (Some(ticker.clone()), e))?
        .to_string();

    let cpn = parse_opt_f64(get_optional(record, header_map, "cpn"));
    let maturity =
        get_optional(record, header_map, "maturity").and_then(|s| parse_date(s).ok());
    let mty_type = get_optional(record, header_map, "mty type")
        .unwrap_or_default()
        .to_string();
    let amt_out = parse_opt_f64(get_optional(record, header_map, "amt out"));
    let yld_bid = parse_opt_f64(get_optional(record, header_map, "yld to mty (bid)"));
    let yld_ask = parse_opt_f64(get_optional(record, header_map, "yld to mty (ask)"));

    let raw = record.iter().map(str::to_string).collect();

    Ok(BondRow {
        ticker,
        cpn,
        maturity,
        mty_type,
        amt_out,
        yld_bid,
        yld_ask,
        name,
        raw,
    })
}

/// Exact column position lookup in the CDS table.
///
/// Whitespace-sensitive on purpose; see [`CdsTable`].
pub fn cds_column(table: &CdsTable, name: &str) -> Option<usize> {
    table.headers.iter().position(|h| h == name)
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a date the way bond-list exports actually spell them.
///
/// ISO is preferred, but `DD/MM/YYYY` and friends show up in practice.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

/// Numeric coercion: non-numeric or non-finite cells become `None`.
pub fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let s = s?;
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        for s in ["2026-03-15", "15/03/2026", "15-03-2026", "2026/03/15"] {
            assert_eq!(parse_date(s), Ok(expected), "format: {s}");
        }
        assert!(parse_date("tomorrow").is_err());
    }

    #[test]
    fn parse_opt_f64_coerces_junk_to_none() {
        assert_eq!(parse_opt_f64(Some("4.5")), Some(4.5));
        assert_eq!(parse_opt_f64(Some(" 4.5 ")), Some(4.5));
        assert_eq!(parse_opt_f64(Some("N.A.")), None);
        assert_eq!(parse_opt_f64(Some("inf")), None);
        assert_eq!(parse_opt_f64(None), None);
    }

    #[test]
    fn cds_column_is_whitespace_sensitive() {
        let table = CdsTable {
            headers: vec!["Name".into(), "Spread 5Y ".into(), "Spread 2Y".into()],
            rows: vec![],
        };
        assert_eq!(cds_column(&table, "Spread 5Y "), Some(1));
        assert_eq!(cds_column(&table, "Spread 5Y"), None);
        assert_eq!(cds_column(&table, "Spread 2Y"), Some(2));
    }
}
