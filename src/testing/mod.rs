use std::fmt;
use std::str::FromStr;

use crate::testing::inference::discrete::NullRestrictedEstimate;

pub mod error;
pub mod inference;
pub mod roots;

pub mod utils;

pub use error::{Bound, FarringtonManningError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alternative {
    #[default]
    TwoSided,
    Less,
    Greater,
}

impl Alternative {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alternative::TwoSided => "two-sided",
            Alternative::Less => "less",
            Alternative::Greater => "greater",
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alternative {
    type Err = FarringtonManningError;

    /// Case-insensitive: `"GREATER"` parses the same as `"greater"`.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "two-sided" => Ok(Alternative::TwoSided),
            "less" => Ok(Alternative::Less),
            "greater" => Ok(Alternative::Greater),
            _ => Err(FarringtonManningError::InvalidArgument(format!(
                "alternative must be one of `two-sided`, `greater` or `less`, got `{s}`"
            ))),
        }
    }
}

/// The hypothesis under test and its error rate.
///
/// For `Greater` the null hypothesis reads `p1 - p2 <= delta`, so a negative `delta` gives a
/// non-inferiority test and a non-negative one a superiority test. `Less` mirrors this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hypothesis {
    /// Rate difference under the null hypothesis
    pub delta: f64,
    pub alternative: Alternative,
    /// Significance level, in (0, 0.5)
    pub alpha: f64,
}

impl Default for Hypothesis {
    fn default() -> Self {
        Hypothesis {
            delta: 0.0,
            alternative: Alternative::TwoSided,
            alpha: 0.05,
        }
    }
}

impl Hypothesis {
    pub fn new(delta: f64, alternative: Alternative, alpha: f64) -> Self {
        Hypothesis {
            delta,
            alternative,
            alpha,
        }
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Check alpha and delta before any numeric work is done.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 0.5) {
            return Err(FarringtonManningError::InvalidArgument(format!(
                "alpha must lie in (0, 0.5), got {}",
                self.alpha
            )));
        }
        if !(self.delta > -1.0 && self.delta < 1.0) {
            return Err(FarringtonManningError::NumericDomainError(format!(
                "delta must lie strictly inside (-1, 1), got {}",
                self.delta
            )));
        }
        Ok(())
    }

    /// Level at which the two-sided test is inverted for the confidence interval.
    ///
    /// One-sided tests use `2 * alpha`, so the interval has confidence `1 - 2 * alpha` and its
    /// relevant bound is a valid one-sided bound at level `alpha`.
    pub fn alpha_mod(&self) -> f64 {
        match self.alternative {
            Alternative::TwoSided => self.alpha,
            Alternative::Less | Alternative::Greater => 2.0 * self.alpha,
        }
    }

    pub fn confidence_level(&self) -> f64 {
        1.0 - self.alpha_mod()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    /// Observed rate difference `p1 - p2`
    pub rate_difference: f64,
    pub z_statistic: f64,
    pub p_value: f64,
    /// Confidence interval `(lower, upper)` from inverting the two-sided test
    pub ci: (f64, f64),
    /// Restricted estimates at the hypothesised delta, used for `z_statistic`
    pub null_estimate: NullRestrictedEstimate,
}

impl TestResult {
    /// Check if the result is statistically significant at the given threshold
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }

    /// Whether `delta` lies inside the confidence interval
    pub fn contains(&self, delta: f64) -> bool {
        self.ci.0 <= delta && delta <= self.ci.1
    }
}
