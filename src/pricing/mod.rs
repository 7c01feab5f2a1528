//! Fixed-coupon bond pricing from a flat yield.
//!
//! `bond::price_at` is the single pricing primitive; every carry, roll-down,
//! duration and scenario metric is built from repeated calls to it.

pub mod bond;

pub use bond::*;
