//! Carry, roll-down and rate-risk analytics.
//!
//! All functions are pure: given a bond, a curve snapshot and a horizon they
//! return the same numbers every time and never touch the curve.

pub mod returns;
pub mod risk;

pub use returns::*;
pub use risk::*;
