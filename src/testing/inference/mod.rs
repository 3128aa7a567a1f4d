use crate::testing::utils::{BinaryOutcome, Sample};
use crate::testing::{Hypothesis, Result, TestResult};

pub mod discrete;

/// Rate-difference tests run directly on a slice of binary outcomes.
pub trait RateDifferenceTests<V>
where
    V: BinaryOutcome,
{
    /// Compare the success rate of `self` (group 1) with that of `other` (group 2).
    fn farrington_manning(&self, other: &[V], hypothesis: &Hypothesis) -> Result<TestResult>;
}

impl<V> RateDifferenceTests<V> for [V]
where
    V: BinaryOutcome,
{
    fn farrington_manning(&self, other: &[V], hypothesis: &Hypothesis) -> Result<TestResult> {
        hypothesis.validate()?;
        let group1 = Sample::from_outcomes(self)?;
        let group2 = Sample::from_outcomes(other)?;
        discrete::run_validated(&group1, &group2, hypothesis)
    }
}
