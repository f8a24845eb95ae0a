//! Error types for the model-checking engine.
//!
//! All errors are fatal to the current `verify` call: they are deterministic
//! logic errors (bad dimensions, bad indices, malformed formulas), not
//! transient faults, so no retries are attempted and no partial result is
//! returned.

use thiserror::Error;

use crate::types::State;

/// An error aborting a solver operation or a `verify` call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CheckError {
    /// Two parameter-space operands disagree on dimension.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A state id or coordinate vector is outside the valid range.
    #[error("invalid state index: {state} (state count is {state_count})")]
    InvalidStateIndex { state: State, state_count: usize },

    /// A coordinate is outside its dimension's grid.
    #[error("invalid coordinate {coordinate} in dimension {dimension} (size {size})")]
    InvalidCoordinate {
        dimension: usize,
        coordinate: usize,
        size: usize,
    },

    /// An AST node references something the model does not define.
    #[error("malformed formula: {reason}")]
    MalformedFormula { reason: String },

    /// A fixed-point loop exceeded the configured safety bound.
    #[error("fixed-point iteration for `{formula}` did not converge within {limit} rounds")]
    NonConvergence { formula: String, limit: usize },

    /// A hybrid model failed construction-time validation.
    #[error("invalid hybrid model: {reason}")]
    InvalidModel { reason: String },
}

impl CheckError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CheckError::MalformedFormula {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_model(reason: impl Into<String>) -> Self {
        CheckError::InvalidModel {
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CheckError>;
