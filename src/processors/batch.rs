//! Batch loading and analysis of indexed measurement directories.
//!
//! A directory is processed as a unit: files are matched by index, loaded
//! in parallel, and each file's outcome is reported individually. One
//! malformed file never aborts the batch.

use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::core::indexer::{self, Selection};
use crate::core::loader::{self, LoaderError};
use crate::core::table::DataTable;
use crate::processors::hysteresis;

/// Per-file result of a batch load.
#[derive(Debug)]
pub struct LoadOutcome {
    /// Absolute path of the data file.
    pub path: PathBuf,
    /// Index extracted from the filename.
    pub index: u32,
    /// The parsed table, or the error that made this file unloadable.
    pub result: Result<DataTable, LoaderError>,
}

/// Per-file result of a batch hysteresis analysis.
#[derive(Debug, Clone)]
pub struct HysteresisReport {
    /// Bare filename.
    pub name: String,
    /// Index extracted from the filename.
    pub index: u32,
    /// Enclosed hysteresis-loop area, if computable.
    pub area: Option<f64>,
    /// Mean of the temperature column, if computable.
    pub mean_temperature: Option<f64>,
    /// First error encountered for this file, if any.
    pub error: Option<String>,
}

impl HysteresisReport {
    /// Returns true if neither quantity could be computed.
    pub fn is_failure(&self) -> bool {
        self.area.is_none() && self.mean_temperature.is_none()
    }
}

/// Load all matching data files in a directory.
///
/// Files are matched with [`indexer::match_files`] and loaded in parallel;
/// each file's parse result is captured in its [`LoadOutcome`] instead of
/// aborting the batch.
///
/// # Errors
///
/// Only directory-level failures (unreadable directory, invalid marker)
/// are returned as errors; per-file failures live in the outcomes.
pub fn load_directory(
    directory: &Path,
    selection: &Selection,
    config: &PipelineConfig,
) -> indexer::Result<Vec<LoadOutcome>> {
    let matched = indexer::match_files(
        directory,
        &config.indexing.extension,
        &config.indexing.marker,
        selection,
    )?;

    info!(
        "{}: loading {} file(s)",
        directory.display(),
        matched.len()
    );

    let outcomes: Vec<LoadOutcome> = matched
        .par_iter()
        .map(|file| {
            let path = directory.join(&file.name);
            let result = loader::load_table(&path, &config.loader);
            LoadOutcome {
                path,
                index: file.index,
                result,
            }
        })
        .collect();

    Ok(outcomes)
}

/// Load and analyze all matching data files in a directory.
///
/// Produces one [`HysteresisReport`] per matched file with the enclosed
/// loop area and mean temperature. Load or analysis failures are recorded
/// per file with the offending filename attached and logged as warnings.
pub fn analyze_directory(
    directory: &Path,
    selection: &Selection,
    config: &PipelineConfig,
) -> indexer::Result<Vec<HysteresisReport>> {
    let outcomes = load_directory(directory, selection, config)?;

    let reports = outcomes
        .into_iter()
        .map(|outcome| {
            let name = outcome
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| outcome.path.display().to_string());

            match outcome.result {
                Ok(table) => analyze_table(name, outcome.index, &table),
                Err(e) => {
                    warn!("{}: {}", name, e);
                    HysteresisReport {
                        name,
                        index: outcome.index,
                        area: None,
                        mean_temperature: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    Ok(reports)
}

fn analyze_table(name: String, index: u32, table: &DataTable) -> HysteresisReport {
    let mut error = None;

    let area = match hysteresis::hysteresis_area(table) {
        Ok(a) => Some(a),
        Err(e) => {
            warn!("{}: {}", name, e);
            error = Some(e.to_string());
            None
        }
    };

    let mean_temperature = match hysteresis::temperature_average(table) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!("{}: {}", name, e);
            error.get_or_insert_with(|| e.to_string());
            None
        }
    };

    HysteresisReport {
        name,
        index,
        area,
        mean_temperature,
        error,
    }
}
