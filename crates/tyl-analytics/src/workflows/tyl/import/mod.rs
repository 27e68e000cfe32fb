//! CSV loaders feeding mark records and profiles into a record store.

mod columns;
mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use super::domain::{MarkRecord, StudentProfile};

#[derive(Debug)]
pub enum MarkImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
    MissingValue {
        line: usize,
        column: &'static str,
    },
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },
}

impl std::fmt::Display for MarkImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkImportError::Io(err) => write!(f, "failed to read CSV export: {}", err),
            MarkImportError::Csv(err) => write!(f, "invalid CSV data: {}", err),
            MarkImportError::MissingColumn(column) => {
                write!(f, "CSV header is missing the '{}' column", column)
            }
            MarkImportError::MissingValue { line, column } => {
                write!(f, "row {}: '{}' is required", line, column)
            }
            MarkImportError::InvalidValue {
                line,
                column,
                value,
            } => write!(f, "row {}: '{}' is not a valid {}", line, value, column),
        }
    }
}

impl std::error::Error for MarkImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MarkImportError::Io(err) => Some(err),
            MarkImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MarkImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for MarkImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct MarkImporter;

impl MarkImporter {
    pub fn marks_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<MarkRecord>, MarkImportError> {
        let file = std::fs::File::open(path)?;
        Self::marks_from_reader(file)
    }

    /// Subject codes are normalised; empty score cells become `None`.
    pub fn marks_from_reader<R: Read>(reader: R) -> Result<Vec<MarkRecord>, MarkImportError> {
        parser::parse_marks(reader)
    }

    pub fn profiles_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<StudentProfile>, MarkImportError> {
        let file = std::fs::File::open(path)?;
        Self::profiles_from_reader(file)
    }

    pub fn profiles_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<StudentProfile>, MarkImportError> {
        parser::parse_profiles(reader)
    }
}
