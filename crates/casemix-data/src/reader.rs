//! Tab-delimited claim export loading.
//!
//! Reads an E-Klaim text export (header row plus one claim per line, cells
//! separated by tabs) into a [`ClaimTable`]. Every cell is kept as text.
//! `.txt`, `.tsv` and `.csv` files are parsed identically.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use casemix_core::error::{CasemixError, Result};
use casemix_core::models::{ClaimRow, ClaimTable};
use tracing::{debug, info, warn};

/// Cell separator in claim exports.
pub const DELIMITER: char = '\t';

/// File extensions offered when looking for claim exports.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["txt", "tsv", "csv"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Whether `path` has one of the [`ACCEPTED_EXTENSIONS`] (case-insensitive).
pub fn is_claim_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// Load a claim export from disk.
///
/// Fails with a human-readable [`CasemixError`] when the file cannot be
/// opened, is not UTF-8, has no header, or is evidently delimited by
/// something other than tabs. On failure nothing is returned, so a caller
/// holding a previous table keeps it.
pub fn load_claim_table(path: &Path) -> Result<ClaimTable> {
    let file = std::fs::File::open(path).map_err(|source| CasemixError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_claims(std::io::BufReader::new(file), path)?;
    info!(
        "Loaded {} claims with {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// Parse a claim export from any buffered reader. `origin` is only used in
/// error messages.
pub fn parse_claims<R: BufRead>(reader: R, origin: &Path) -> Result<ClaimTable> {
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            None => return Err(CasemixError::EmptyFile(origin.to_path_buf())),
            Some((idx, line)) => {
                let line = read_line(line, origin, idx)?;
                let line = line.trim_start_matches('\u{feff}');
                if !line.trim().is_empty() {
                    break line.to_string();
                }
            }
        }
    };

    let columns = parse_header(&header, origin)?;

    let mut rows: Vec<ClaimRow> = Vec::new();
    let mut ragged = 0usize;
    for (idx, line) in lines {
        let line = read_line(line, origin, idx)?;
        if line.trim().is_empty() {
            continue;
        }
        let cells = split_line(&line);
        if cells.len() != columns.len() {
            ragged += 1;
            debug!(
                "Line {} of {} has {} cells, header has {}",
                idx + 1,
                origin.display(),
                cells.len(),
                columns.len()
            );
        }
        rows.push(ClaimRow::new(cells));
    }

    if ragged > 0 {
        warn!(
            "{} of {} rows in {} do not match the header width",
            ragged,
            rows.len(),
            origin.display()
        );
    }

    Ok(ClaimTable::new(columns, rows))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Map a line read error into [`CasemixError`]. Invalid UTF-8 surfaces as
/// [`CasemixError::Decode`].
fn read_line(line: std::io::Result<String>, origin: &Path, idx: usize) -> Result<String> {
    line.map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => CasemixError::Decode {
            path: origin.to_path_buf(),
            line: idx + 1,
        },
        _ => CasemixError::FileRead {
            path: origin.to_path_buf(),
            source: e,
        },
    })
}

/// Split the header and reject single-column headers that look comma or
/// semicolon delimited.
fn parse_header(header: &str, origin: &Path) -> Result<Vec<String>> {
    let columns: Vec<String> = split_line(header)
        .into_iter()
        .map(|c| c.trim().to_string())
        .collect();

    if columns.len() == 1 {
        if let Some(found) = [',', ';'].into_iter().find(|d| header.contains(*d)) {
            return Err(CasemixError::WrongDelimiter {
                path: PathBuf::from(origin),
                found,
            });
        }
    }
    Ok(columns)
}

/// Split one line on tabs, dropping a trailing carriage return.
fn split_line(line: &str) -> Vec<String> {
    line.strip_suffix('\r')
        .unwrap_or(line)
        .split(DELIMITER)
        .map(str::to_string)
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
