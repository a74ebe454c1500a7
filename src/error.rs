//! Error types for the advisor.

use thiserror::Error;

/// Failures raised by a [`crate::model::Classifier`] backend.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InferenceError {
    #[error("feature length mismatch: got {got}, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("feature {index} is not a finite number")]
    NonFiniteFeature { index: usize },

    #[error("model returned an invalid probability: {0}")]
    InvalidProbability(f64),

    #[error("model returned an unknown class label: {0}")]
    UnknownClass(i64),

    #[error("model backend failed: {0}")]
    Backend(String),
}

/// A submitted field the input widgets would not have allowed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be {constraint} (got {value})")]
    OutOfRange {
        field: &'static str,
        constraint: &'static str,
        value: f64,
    },

    #[error("{field} must be a number (got {raw:?})")]
    NotANumber { field: &'static str, raw: String },

    #[error("{field} must be one of {allowed} (got {raw:?})")]
    UnknownChoice {
        field: &'static str,
        allowed: &'static str,
        raw: String,
    },
}

/// Anything that can go wrong between a submitted request and a recommendation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdvisorError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}

impl AdvisorError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AdvisorError::Validation(_))
    }
}
