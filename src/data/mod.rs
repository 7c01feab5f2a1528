//! Market data collaborators.
//!
//! The analytics core only ever sees a `YieldCurve`; everything about where the
//! yields came from lives here.

pub mod fred;

pub use fred::{FredClient, SeriesObservation, TreasurySnapshot, TREASURY_SERIES};
