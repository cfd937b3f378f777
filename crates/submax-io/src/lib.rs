// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use submax_core::SubmaxError;

/// Row handling options shared by the readers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadOptions {
    /// Retain at most this many leading fields per row.
    ///
    /// Anomaly-detection dumps like KDDCup99 carry an id and a label in
    /// their trailing columns; the default cap of 41 drops both.
    pub max_fields: Option<usize>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_fields: Some(41),
        }
    }
}

impl ReadOptions {
    fn validate(&self) -> Result<(), SubmaxError> {
        if let Some(0) = self.max_fields {
            return Err(SubmaxError::invalid_input(
                "ReadOptions.max_fields must be >= 1 when set; got 0",
            ));
        }
        Ok(())
    }
}

/// Parsed dataset plus the rows the reader had to drop.
///
/// Malformed rows are never fatal: they are recorded as warnings so the
/// driver can surface them, and parsing continues.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    pub items: Vec<Vec<f64>>,
    pub warnings: Vec<String>,
}

impl Dataset {
    /// Number of retained rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dimensionality of the retained rows (0 for an empty dataset).
    pub fn dimensions(&self) -> usize {
        self.items.first().map_or(0, Vec::len)
    }
}

fn io_error(path: &Path, err: std::io::Error) -> SubmaxError {
    SubmaxError::invalid_input(format!("cannot read {}: {err}", path.display()))
}

fn parse_rows(
    reader: impl BufRead,
    options: &ReadOptions,
    skip_metadata: bool,
) -> Result<Dataset, SubmaxError> {
    options.validate()?;
    let max_fields = options.max_fields.unwrap_or(usize::MAX);
    let mut dataset = Dataset::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| {
            SubmaxError::invalid_input(format!("read failure at line {}: {err}", line_no + 1))
        })?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        if skip_metadata && line.starts_with('@') {
            continue;
        }

        let mut row = Vec::new();
        let mut parse_failure = None;
        for field in line.split(',') {
            if row.len() >= max_fields {
                break;
            }
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            match field.parse::<f64>() {
                Ok(value) => row.push(value),
                Err(_) => {
                    parse_failure = Some(field.to_string());
                    break;
                }
            }
        }

        if let Some(bad_field) = parse_failure {
            dataset.warnings.push(format!(
                "line {}: unparsable field '{bad_field}'; ignoring line",
                line_no + 1
            ));
            continue;
        }
        if row.is_empty() {
            continue;
        }
        if !dataset.items.is_empty() && row.len() != dataset.items[0].len() {
            dataset.warnings.push(format!(
                "line {}: size mismatch detected ({} fields, expected {}); ignoring line",
                line_no + 1,
                row.len(),
                dataset.items[0].len()
            ));
            continue;
        }

        dataset.items.push(row);
    }

    Ok(dataset)
}

/// Reads an ARFF-like numeric table.
///
/// Lines starting with `@` are metadata and skipped, as are empty lines and
/// bare carriage returns. Data rows are comma-separated scalars, truncated
/// to [`ReadOptions::max_fields`]; rows whose width disagrees with the first
/// retained row are dropped with a warning.
pub fn read_arff(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Dataset, SubmaxError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| io_error(path, err))?;
    read_arff_from(BufReader::new(file), options)
}

/// ARFF parsing over any buffered reader.
pub fn read_arff_from(
    reader: impl BufRead,
    options: &ReadOptions,
) -> Result<Dataset, SubmaxError> {
    parse_rows(reader, options, true)
}

/// Reads a headerless numeric CSV with the same row rules as
/// [`read_arff`], minus the `@` metadata convention.
pub fn read_csv(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Dataset, SubmaxError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| io_error(path, err))?;
    read_csv_from(BufReader::new(file), options)
}

/// CSV parsing over any buffered reader.
pub fn read_csv_from(
    reader: impl BufRead,
    options: &ReadOptions,
) -> Result<Dataset, SubmaxError> {
    parse_rows(reader, options, false)
}
