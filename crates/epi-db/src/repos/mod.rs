//! Repository modules for the three epicast tables.
//!
//! Each module adds methods to `EpiDb` via `impl EpiDb` blocks. Batch writes
//! run inside a single transaction.

pub mod aggregates;
pub mod forecasts;
pub mod yearly;
