//! Yield curve snapshots.
//!
//! A `YieldCurve` is an immutable, tenor-sorted set of `(tenor, yield)` points
//! with piecewise-linear interpolation and flat extrapolation at both ends.
//! Shocked curves are built as new values (see `scenario`).

pub mod yield_curve;

pub use yield_curve::*;
