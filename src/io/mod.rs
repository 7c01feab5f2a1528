//! Input/output helpers.
//!
//! - curve snapshot JSON read/write (`curve`)
//! - per-run CSV exports into an explicit output directory (`export`)

pub mod curve;
pub mod export;

pub use curve::*;
pub use export::*;
