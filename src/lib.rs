//! # rate-difference
//!
//! The Farrington-Manning test for comparing the success rates of two independent binomial
//! samples against a pre-specified margin.
//!
//! Given two groups of binary outcomes, the test reports the observed rate difference
//! `p1 - p2`, a z-statistic whose standard error is evaluated at the maximum-likelihood
//! estimates restricted to the null hypothesis `p1 - p2 = delta`, the matching p-value, and a
//! confidence interval obtained by inverting the two-sided test.
//!
//! ## Core Features
//!
//! - **Non-inferiority and superiority testing**: `delta < 0` with `Greater` tests
//!   non-inferiority, `delta >= 0` with `Greater` tests superiority
//! - **Closed-form restricted estimates**: the constrained MLE is the trigonometric root of a cubic
//! - **Test-inverted confidence intervals**: Brent's method on the two-sided p-value
//!
//! ## Quick Start
//!
//! Call [`farrington_manning`] with two sequences of outcomes (booleans or 0/1 numbers), or
//! reduce them to [`Sample`]s and call [`farrington_manning_test`] with a [`Hypothesis`].
//!
//! ## Module Organization
//!
//! - **[`testing`]**: hypothesis configuration, results, errors and the test itself

pub mod testing;

pub use testing::inference::RateDifferenceTests;
pub use testing::inference::discrete::{
    NullRestrictedEstimate, farrington_manning, farrington_manning_test,
};
pub use testing::utils::{BinaryOutcome, ProportionPair, Sample};
pub use testing::{Alternative, Bound, FarringtonManningError, Hypothesis, Result, TestResult};
