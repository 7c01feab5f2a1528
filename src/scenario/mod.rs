//! Curve shock scenarios and total-return decomposition.
//!
//! - `shocks`: parallel shifts and linear twists, each producing a new curve
//! - `decomp`: carry / roll / shift decomposition against a base curve

pub mod decomp;
pub mod shocks;

pub use decomp::*;
pub use shocks::*;
