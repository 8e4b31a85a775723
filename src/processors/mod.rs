//! Analysis routines operating on loaded data tables.

pub mod batch;
pub mod hysteresis;
pub mod peaks;
