use std::fmt;

use thiserror::Error;

use crate::testing::roots::RootFindingError;

pub type Result<T> = std::result::Result<T, FarringtonManningError>;

/// Which end of the confidence interval a root search was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Lower => f.write_str("lower"),
            Bound::Upper => f.write_str("upper"),
        }
    }
}

/// Errors raised by the Farrington-Manning test.
///
/// Every failure is a deterministic function of the inputs, so nothing is retried and no
/// partial result is ever returned.
#[derive(Debug, Error)]
pub enum FarringtonManningError {
    /// A configuration value (alternative, alpha) is not recognised or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The outcome data cannot be reduced to a sample (empty group, non-binary value, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The restricted maximum-likelihood solution left its numeric domain.
    #[error("numeric domain error: {0}")]
    NumericDomainError(String),

    /// The p-value function did not cross the target level inside the search bracket.
    #[error("no root found for the {bound} confidence bound")]
    NoRootFound {
        bound: Bound,
        #[source]
        source: RootFindingError,
    },
}
