// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors surfaced by the facilitator. Nothing is recovered locally; every
/// failure propagates to the caller, which owns retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FacilitatorError {
    // An address field failed hex parsing or has the wrong length
    #[error("invalid address in field `{field}`: {value}")]
    InvalidAddress { field: &'static str, value: String },

    // A numeric field is not a non-negative decimal integer
    #[error("invalid numeric value in field `{field}`: {value}")]
    InvalidNumeric { field: &'static str, value: String },

    // A hash field failed hex parsing or has the wrong length
    #[error("invalid hash in field `{field}`: {value}")]
    InvalidHash { field: &'static str, value: String },

    // Record store read or write failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl FacilitatorError {
    /// Returns a short string identifying the error type for metrics labels
    pub fn error_type(&self) -> &'static str {
        match self {
            FacilitatorError::InvalidAddress { .. } => "invalid_address",
            FacilitatorError::InvalidNumeric { .. } => "invalid_numeric",
            FacilitatorError::InvalidHash { .. } => "invalid_hash",
            FacilitatorError::Storage(_) => "storage_error",
        }
    }
}

pub type FacilitatorResult<T> = Result<T, FacilitatorError>;
