//! cadence-runtime: JSON document store, services, and the three-phase
//! pipeline orchestrator around `cadence-core`.

pub mod cli;
pub mod history;
pub mod pipeline;
pub mod predictions;
pub mod stable;
pub mod store;
