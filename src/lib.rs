//! `carry-roll` library crate.
//!
//! The binary (`carry`) is a thin wrapper around this library so that:
//!
//! - core analytics are testable without spawning processes or hitting FRED
//! - modules are reusable (e.g., notebooks, other front-ends)
//! - code stays easy to navigate as the project grows

pub mod analytics;
pub mod app;
pub mod cli;
pub mod curve;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod pricing;
pub mod report;
pub mod scenario;
