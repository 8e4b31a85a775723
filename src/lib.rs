//! Laboratory measurement data pipeline for VSM magnetometry.
//!
//! This crate provides tools for:
//! - Locating indexed data files in a measurement directory
//! - Parsing whitespace-delimited VSM tables with CGS-to-SI normalization
//! - Splitting hysteresis loops and computing enclosed areas
//! - Temperature statistics and Gaussian peak model helpers (XRD)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use vsm_pipeline::{PipelineConfig, Selection};
//! use vsm_pipeline::processors::batch::analyze_directory;
//!
//! let config = PipelineConfig::default();
//! let reports = analyze_directory(Path::new("data"), &Selection::All, &config).unwrap();
//! for report in &reports {
//!     println!("{}: {:?} {:?}", report.name, report.area, report.mean_temperature);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;

pub use config::{IndexConfig, LoaderConfig, PipelineConfig, UnitConfig};
pub use core::indexer::{IndexedFile, Selection};
pub use core::table::{ColumnRole, DataTable, RoleMap};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
