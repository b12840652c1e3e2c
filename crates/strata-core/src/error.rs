//! Error types for ingest, export and record validation

use std::path::PathBuf;
use thiserror::Error;

use crate::model::BandId;

/// Errors raised while reading or writing datasets
#[derive(Debug, Error)]
pub enum StrataError {
    /// Filesystem error
    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV input or failed CSV write
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON input or failed JSON write
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Required columns absent from a CSV header
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Nothing to build band records from
    #[error("No band records provided")]
    EmptyDataset,
}

impl StrataError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for dataset operations
pub type StrataResult<T> = Result<T, StrataError>;

/// Rejection reasons for manual add/edit of a band
///
/// The `Display` text is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Field text is not a finite number
    #[error("{field} must be a number")]
    NotNumeric { field: &'static str },

    /// Value outside the normalized depth range
    #[error("{field} must be between 0 and 1 (got {value})")]
    OutOfRange { field: &'static str, value: f64 },

    /// Edit produced an inverted interval
    #[error("Top ({top}) must not be greater than bottom ({bottom})")]
    TopAfterBottom { top: f64, bottom: f64 },

    /// Add requires a strictly positive thickness
    #[error("Top ({top}) must be less than bottom ({bottom})")]
    TopNotBeforeBottom { top: f64, bottom: f64 },

    /// Formation name is blank
    #[error("Formation name must not be empty")]
    EmptyFormation,

    /// Group name is blank
    #[error("Group name must not be empty")]
    EmptyGroup,

    /// Manual add of a formation name that already exists
    #[error("Formation '{0}' already exists")]
    DuplicateFormation(String),

    /// Command referenced a band that is not in the store
    #[error("Band {0} not found")]
    UnknownBand(BandId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_display() {
        let err = StrataError::MissingColumns(vec!["所属层位".to_string(), "top".to_string()]);
        let text = err.to_string();
        assert!(text.contains("所属层位"));
        assert!(text.contains("top"));
    }

    #[test]
    fn test_validation_messages_name_the_field() {
        let err = ValidationError::OutOfRange {
            field: "Top",
            value: 1.5,
        };
        assert!(err.to_string().starts_with("Top"));
        assert!(err.to_string().contains("1.5"));

        let err = ValidationError::NotNumeric { field: "Bottom" };
        assert_eq!(err.to_string(), "Bottom must be a number");
    }
}
