use num_traits::{One, Zero};

use crate::testing::error::{FarringtonManningError, Result};

/// A value that can be read as a single binary outcome, `true` meaning success.
///
/// Booleans map directly; numeric types are accepted only when they equal exactly 0 or 1.
pub trait BinaryOutcome {
    /// Returns `None` when the value is not a valid 0/1 outcome.
    fn as_success(&self) -> Option<bool>;
}

impl BinaryOutcome for bool {
    fn as_success(&self) -> Option<bool> {
        Some(*self)
    }
}

impl<V: BinaryOutcome + ?Sized> BinaryOutcome for &V {
    fn as_success(&self) -> Option<bool> {
        (**self).as_success()
    }
}

macro_rules! impl_numeric_outcome {
    ($($t:ty),* $(,)?) => {
        $(
            impl BinaryOutcome for $t {
                fn as_success(&self) -> Option<bool> {
                    if self.is_zero() {
                        Some(false)
                    } else if self.is_one() {
                        Some(true)
                    } else {
                        None
                    }
                }
            }
        )*
    };
}

impl_numeric_outcome!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

/// A binomial sample reduced to its sufficient statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    successes: usize,
    trials: usize,
}

impl Sample {
    /// Reduce an ordered sequence of binary outcomes to (successes, trials).
    pub fn from_outcomes<I>(outcomes: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: BinaryOutcome,
    {
        let mut successes = 0;
        let mut trials = 0;
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome.as_success() {
                Some(true) => successes += 1,
                Some(false) => {}
                None => {
                    return Err(FarringtonManningError::InvalidInput(format!(
                        "value at index {index} is not a binary outcome"
                    )));
                }
            }
            trials += 1;
        }

        Self::from_counts(successes, trials)
    }

    pub fn from_counts(successes: usize, trials: usize) -> Result<Self> {
        if trials == 0 {
            return Err(FarringtonManningError::InvalidInput(
                "group must contain at least one observation".to_string(),
            ));
        }
        if successes > trials {
            return Err(FarringtonManningError::InvalidInput(format!(
                "{successes} successes exceed {trials} trials"
            )));
        }
        Ok(Sample { successes, trials })
    }

    pub fn successes(&self) -> usize {
        self.successes
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Unrestricted maximum-likelihood success rate.
    pub fn proportion(&self) -> f64 {
        self.successes as f64 / self.trials as f64
    }
}

/// Unrestricted success-rate estimates of two groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionPair {
    pub p1: f64,
    pub p2: f64,
}

impl ProportionPair {
    /// Build a pair, rejecting rates outside [0, 1].
    pub fn new(p1: f64, p2: f64) -> Result<Self> {
        let pair = ProportionPair { p1, p2 };
        pair.validate()?;
        Ok(pair)
    }

    pub fn validate(&self) -> Result<()> {
        for (group, p) in [(1, self.p1), (2, self.p2)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(FarringtonManningError::InvalidInput(format!(
                    "success rate of group {group} must lie in [0, 1], got {p}"
                )));
            }
        }
        Ok(())
    }

    pub fn from_samples(group1: &Sample, group2: &Sample) -> Self {
        ProportionPair {
            p1: group1.proportion(),
            p2: group2.proportion(),
        }
    }

    /// Observed rate difference `p1 - p2`.
    pub fn difference(&self) -> f64 {
        self.p1 - self.p2
    }
}
