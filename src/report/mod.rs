//! Reporting utilities: terminal tables, pivots and the closing commentary.

pub mod format;

pub use format::*;
