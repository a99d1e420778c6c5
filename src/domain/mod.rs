//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the run configuration (`ScreenConfig`)
//! - ingested and screened bond rows (`BondRow`, `ScreenedBond`)
//! - derived records produced by later stages (`TaggedBond`, `WeightedSpread`,
//!   `MergedBond`)
//! - the fixed business constants of the screen

pub mod types;

pub use types::*;
