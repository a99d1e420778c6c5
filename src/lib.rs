//! `bond-carry` library crate.
//!
//! The binary (`carry`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the screening stages are pure table-in/table-out functions, usable
//!   without touching the filesystem
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cds;
pub mod cli;
pub mod country;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod merge;
pub mod report;
pub mod screen;
