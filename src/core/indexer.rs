//! Directory indexing for numbered measurement files.
//!
//! VSM runs write one file per measurement with a running index embedded in
//! the filename (e.g. `sample#12.txt`). This module lists files with a given
//! extension, extracts the index following a marker string, and selects a
//! subset by index criteria.

use std::fs;
use std::path::Path;

use regex::Regex;
use thiserror::Error;

/// Errors that can occur while indexing a directory.
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid index marker '{marker}': {reason}")]
    InvalidMarker { marker: String, reason: String },
}

/// Result type for indexer operations.
pub type Result<T> = std::result::Result<T, IndexerError>;

/// A filename paired with the integer index extracted from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFile {
    /// Bare filename (no directory component).
    pub name: String,
    /// Non-negative index parsed from the digits after the marker.
    pub index: u32,
}

/// Criterion selecting a subset of indexed files. Exactly one is active
/// per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Keep every indexed file.
    All,
    /// Keep only the file with the minimum index.
    First,
    /// Keep only the file with the maximum index.
    Last,
    /// Keep only the file with exactly this index.
    Exact(u32),
    /// Keep files whose index is a member of the list.
    List(Vec<u32>),
    /// Keep files with low <= index <= high (inclusive).
    Range(u32, u32),
}

/// List filenames in a directory whose extension matches exactly.
///
/// The extension comparison is case-sensitive and accepts the leading dot
/// in either form (".txt" and "txt" are equivalent). Results are sorted by
/// name so discovery order is deterministic.
///
/// # Arguments
///
/// * `directory` - Directory to scan (non-recursive)
/// * `extension` - Extension to match, e.g. ".txt"
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_files(directory: &Path, extension: &str) -> Result<Vec<String>> {
    let wanted = extension.trim_start_matches('.');

    let mut names: Vec<String> = fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext == wanted)
                    .unwrap_or(false)
        })
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();

    names.sort();

    Ok(names)
}

/// Extract file indices from filenames containing a marker string.
///
/// The marker is matched literally (regex metacharacters escaped) and must
/// be immediately followed by one or more decimal digits, which form the
/// file's index. Filenames without such a match are silently dropped; this
/// is not an error. Digit runs that overflow a `u32` are dropped as well.
///
/// # Arguments
///
/// * `filenames` - Candidate filenames
/// * `marker` - Literal marker string preceding the index digits, e.g. "#"
///
/// # Returns
///
/// The matched files sorted ascending by index (stable on ties).
pub fn index_files(filenames: &[String], marker: &str) -> Result<Vec<IndexedFile>> {
    let pattern = format!("{}(\\d+)", regex::escape(marker));
    let index_regex = Regex::new(&pattern).map_err(|e| IndexerError::InvalidMarker {
        marker: marker.to_string(),
        reason: e.to_string(),
    })?;

    let mut matched = Vec::with_capacity(filenames.len());

    for name in filenames {
        let Some(captures) = index_regex.captures(name) else {
            continue;
        };
        let Some(digits) = captures.get(1) else {
            continue;
        };
        let Ok(index) = digits.as_str().parse::<u32>() else {
            continue;
        };

        matched.push(IndexedFile {
            name: name.clone(),
            index,
        });
    }

    matched.sort_by_key(|f| f.index);

    Ok(matched)
}

/// Apply a selection criterion to a list of indexed files.
///
/// The input is expected sorted ascending by index (as produced by
/// [`index_files`]); the output preserves that order. A criterion matching
/// zero files yields an empty result, not an error.
pub fn select(files: &[IndexedFile], selection: &Selection) -> Vec<IndexedFile> {
    match selection {
        Selection::All => files.to_vec(),

        Selection::First => files
            .iter()
            .min_by_key(|f| f.index)
            .cloned()
            .into_iter()
            .collect(),

        Selection::Last => files
            .iter()
            .max_by_key(|f| f.index)
            .cloned()
            .into_iter()
            .collect(),

        Selection::Exact(wanted) => files
            .iter()
            .filter(|f| f.index == *wanted)
            .cloned()
            .collect(),

        Selection::List(indices) => files
            .iter()
            .filter(|f| indices.contains(&f.index))
            .cloned()
            .collect(),

        Selection::Range(low, high) => files
            .iter()
            .filter(|f| f.index >= *low && f.index <= *high)
            .cloned()
            .collect(),
    }
}

/// List, index, and select data files in a directory.
///
/// # Arguments
///
/// * `directory` - Directory to scan
/// * `extension` - File extension to match exactly
/// * `marker` - Literal marker preceding the index digits
/// * `selection` - Index criterion to apply
///
/// # Returns
///
/// Matching files sorted ascending by index. Empty when nothing matches.
pub fn match_files(
    directory: &Path,
    extension: &str,
    marker: &str,
    selection: &Selection,
) -> Result<Vec<IndexedFile>> {
    let names = list_files(directory, extension)?;
    let indexed = index_files(&names, marker)?;
    Ok(select(&indexed, selection))
}
