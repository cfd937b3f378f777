// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::fmt;

/// Unified error type for the submax crates.
///
/// Parameter problems are reported at construction time (`InvalidInput`);
/// `NonSpd` is the numerical signal that a candidate row would make the
/// regularized Gram matrix singular. Reading accessors before a successful
/// `fit`/`next` is not an error and returns empty/zero state instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmaxError {
    /// A caller-supplied parameter or input is out of contract.
    InvalidInput(String),
    /// Cholesky hit a non-positive pivot; the matrix is not positive definite.
    NonSpd(String),
    /// The operation is not implemented for this optimizer.
    NotSupported(String),
    /// A computation produced a non-finite or otherwise unusable value.
    NumericalIssue(String),
    /// An internal capacity or counter limit was exceeded.
    ResourceLimit(String),
}

impl SubmaxError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn non_spd(message: impl Into<String>) -> Self {
        Self::NonSpd(message.into())
    }

    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::NotSupported(message.into())
    }

    pub fn numerical_issue(message: impl Into<String>) -> Self {
        Self::NumericalIssue(message.into())
    }

    pub fn resource_limit(message: impl Into<String>) -> Self {
        Self::ResourceLimit(message.into())
    }

    /// True when the error marks a candidate as ineligible rather than the
    /// whole run as failed. Optimizers skip such candidates and continue.
    pub fn is_non_spd(&self) -> bool {
        matches!(self, Self::NonSpd(_))
    }
}

impl fmt::Display for SubmaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::NonSpd(message) => write!(f, "matrix is not positive definite: {message}"),
            Self::NotSupported(message) => write!(f, "not supported: {message}"),
            Self::NumericalIssue(message) => write!(f, "numerical issue: {message}"),
            Self::ResourceLimit(message) => write!(f, "resource limit exceeded: {message}"),
        }
    }
}

impl std::error::Error for SubmaxError {}
