// File: crates/barline-core/src/error.rs
// Summary: Error taxonomy: structured validation results and the crate-level ChartError.

use std::fmt;

use thiserror::Error;

/// Fatal problem found by [`crate::data::DataProcessor::validate_data`]. Any of these aborts rendering.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ValidationError {
    #[error("data must be an array of records")]
    NotAnArray,
    #[error("record {index} is not an object")]
    NotAnObject { index: usize },
    #[error("record {index} has a non-numeric y value: {value}")]
    NonNumericY { index: usize, value: String },
}

/// Recoverable gap; the processor substitutes a default and continues.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    #[error("data set is empty")]
    Empty,
    #[error("record {index} has no x/date/timestamp field")]
    MissingX { index: usize },
    #[error("record {index} has no y/value field")]
    MissingY { index: usize },
}

/// Outcome of a structural data check.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub(crate) fn from_parts(errors: Vec<ValidationError>, warnings: Vec<ValidationWarning>) -> Self {
        Self { is_valid: errors.is_empty(), errors, warnings }
    }

    /// Convert a failed report into an error; a passing report yields its warnings.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ChartError> {
        if self.is_valid {
            Ok(self.warnings)
        } else {
            Err(ChartError::Validation(ValidationErrors(self.errors)))
        }
    }
}

/// Non-empty list of validation errors carried by [`ChartError::Validation`].
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid chart data: {0}")]
    Validation(ValidationErrors),
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
}

pub type Result<T, E = ChartError> = std::result::Result<T, E>;
