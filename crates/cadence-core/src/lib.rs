//! cadence-core: forecasting and reconciliation rules for the cadence pipeline.
//!
//! Pure, deterministic logic only. All time values are passed in as
//! parameters (no system clock access) and all persistence lives in the
//! runtime crate.

pub mod forecast;
pub mod reconcile;
pub mod types;
