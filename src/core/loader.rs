//! Loader for whitespace-delimited VSM data files.
//!
//! VSM files carry free-form instrument metadata, then a single column-name
//! header row, then a marker line (default `***DATA***`), then one
//! whitespace-delimited row of numbers per sample. The loader locates the
//! marker, takes the preceding line as the header, and parses everything
//! after the marker as numeric columns.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::config::{LoaderConfig, UnitConfig};
use crate::core::table::{Column, DataTable};

/// Errors that can occur while loading a data file.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Header marker not found in {path}")]
    HeaderNotFound { path: PathBuf },

    #[error("No header row precedes the marker line in {path}")]
    MissingHeaderRow { path: PathBuf },

    #[error("Row {row} has {found} values, expected {expected} ({path})")]
    ColumnCountMismatch {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}, column '{column}': '{value}' is not a number ({path})")]
    ValueParse {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Find the first line containing a marker string.
///
/// The marker is matched as a literal substring; regex metacharacters in it
/// have no special meaning.
///
/// # Arguments
///
/// * `path` - File to scan (text, line by line)
/// * `marker` - Literal marker string, e.g. "***DATA***"
///
/// # Returns
///
/// The 0-based line number of the first matching line.
///
/// # Errors
///
/// `HeaderNotFound` if no line contains the marker.
pub fn find_marker_line(path: &Path, marker: &str) -> Result<usize> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.contains(marker) {
            return Ok(line_number);
        }
    }

    Err(LoaderError::HeaderNotFound {
        path: path.to_path_buf(),
    })
}

/// Load a VSM data file into a [`DataTable`].
///
/// The header row is the line immediately preceding the marker line; data
/// rows begin immediately after the marker line. Any run of whitespace
/// delimits columns. Blank data lines are skipped. When
/// `config.si_units` is set, recognized CGS columns are converted and
/// renamed in place (see [`units_to_si`]).
///
/// # Errors
///
/// All errors are fatal for this file and carry its path:
/// - `HeaderNotFound` if the marker line is absent
/// - `MissingHeaderRow` if the marker is the first line
/// - `ColumnCountMismatch` if a data row's value count differs from the header
/// - `ValueParse` if a token is not a number (`NaN` parses and propagates)
pub fn load_table(path: &Path, config: &LoaderConfig) -> Result<DataTable> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let lines: Vec<String> = reader.lines().collect::<std::io::Result<_>>()?;

    let marker_line = lines
        .iter()
        .position(|line| line.contains(&config.header_marker))
        .ok_or_else(|| LoaderError::HeaderNotFound {
            path: path.to_path_buf(),
        })?;

    if marker_line == 0 {
        return Err(LoaderError::MissingHeaderRow {
            path: path.to_path_buf(),
        });
    }

    let names: Vec<String> = lines[marker_line - 1]
        .split_whitespace()
        .map(|s| s.to_string())
        .collect();

    debug!(
        "{}: marker at line {}, {} columns",
        path.display(),
        marker_line,
        names.len()
    );

    let mut columns: Vec<Column> = names
        .iter()
        .map(|name| Column {
            name: name.clone(),
            values: Vec::new(),
        })
        .collect();

    for (offset, line) in lines[marker_line + 1..].iter().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.is_empty() {
            continue;
        }

        if tokens.len() != names.len() {
            return Err(LoaderError::ColumnCountMismatch {
                path: path.to_path_buf(),
                row: offset,
                expected: names.len(),
                found: tokens.len(),
            });
        }

        for (col, token) in columns.iter_mut().zip(&tokens) {
            let value: f64 = token.parse().map_err(|_| LoaderError::ValueParse {
                path: path.to_path_buf(),
                row: offset,
                column: col.name.clone(),
                value: token.to_string(),
            })?;
            col.values.push(value);
        }
    }

    let mut table = DataTable { columns };

    if config.si_units {
        units_to_si(&mut table, &config.units);
    }

    Ok(table)
}

/// Convert recognized CGS columns to SI units in place, renaming them.
///
/// Matches column names exactly; the rename guards against double
/// conversion, since a second application finds none of the original
/// names. Columns with other names are left untouched.
///
/// - `Field(G)`: values divided by `units.field_divisor`, renamed `B`
/// - `Moment(emu)`: values multiplied by `units.moment_factor`, renamed `m`
/// - `Temperature(K)`: `units.temperature_offset` added, renamed `T`
pub fn units_to_si(table: &mut DataTable, units: &UnitConfig) {
    if let Some(col) = table.column_mut("Field(G)") {
        for v in &mut col.values {
            *v /= units.field_divisor;
        }
        col.name = "B".to_string();
    }

    if let Some(col) = table.column_mut("Moment(emu)") {
        for v in &mut col.values {
            *v *= units.moment_factor;
        }
        col.name = "m".to_string();
    }

    if let Some(col) = table.column_mut("Temperature(K)") {
        for v in &mut col.values {
            *v += units.temperature_offset;
        }
        col.name = "T".to_string();
    }
}
