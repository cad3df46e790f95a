//! Core data handling for RegDash
//!
//! This crate loads uploaded tables and turns a variable selection into a
//! model-ready design matrix. Estimation lives in `rd-models`.

pub mod data;
pub mod design;
pub mod io;

// Re-exports
pub use data::{DataError, DataFrame, Series};
pub use design::{build, DesignError, DesignMatrix, ModelKind};
pub use io::load_table;
