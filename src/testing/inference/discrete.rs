//! Farrington-Manning test for the difference of two binomial success rates.
//!
//! The test compares `p1 - p2` against a margin `delta`. Its standard error is evaluated under
//! the null hypothesis, at the maximum-likelihood estimates restricted to `p1 - p2 = delta`,
//! which have a closed form as the root of a cubic. The confidence interval is obtained by
//! inverting the two-sided test, re-solving the restricted estimate at every candidate margin.

use std::f64::consts::PI;

use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

use crate::testing::error::{Bound, FarringtonManningError, Result};
use crate::testing::roots::{BrentOptions, RootFindingError, brentq};
use crate::testing::utils::{BinaryOutcome, ProportionPair, Sample};
use crate::testing::{Alternative, Hypothesis, TestResult};

/// Padding that keeps the interval search strictly inside (-1, 1).
const BRACKET_EPSILON: f64 = 1e-6;

/// Maximum-likelihood estimates under the restriction `p1 - p2 = delta`, together with the
/// standard error of the rate difference they imply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NullRestrictedEstimate {
    pub p1: f64,
    pub p2: f64,
    pub sd: f64,
}

/// Solve for the restricted maximum-likelihood estimates at `delta`.
///
/// The score equations reduce to a cubic in the restricted `p1`; the root in [0, 1] is taken
/// in closed form through the trigonometric solution of the depressed cubic.
///
/// # Arguments
///
/// * `n1`, `n2` - Number of trials in each group
/// * `proportions` - Unrestricted success rates
/// * `delta` - Rate difference under the null hypothesis
///
/// # Returns
///
/// The restricted estimates, or `NumericDomainError` when the closed form has no valid
/// solution (typically rates of 0 or 1 combined with an extreme `delta`).
pub fn restricted_estimate(
    n1: usize,
    n2: usize,
    proportions: &ProportionPair,
    delta: f64,
) -> Result<NullRestrictedEstimate> {
    if n1 == 0 || n2 == 0 {
        return Err(FarringtonManningError::InvalidInput(
            "both groups need at least one trial".to_string(),
        ));
    }

    proportions.validate()?;

    let n1 = n1 as f64;
    let n2 = n2 as f64;
    let ProportionPair { p1, p2 } = *proportions;

    let theta = n2 / n1;
    let a = 1.0 + theta;
    let b = -(1.0 + theta + p1 + theta * p2 + delta * (theta + 2.0));
    let c = delta.powi(2) + delta * (2.0 * p1 + theta + 1.0) + p1 + theta * p2;
    let d = -p1 * delta * (1.0 + delta);

    let v = b.powi(3) / (27.0 * a.powi(3)) - b * c / (6.0 * a.powi(2)) + d / (2.0 * a);
    let discriminant = b.powi(2) / (9.0 * a.powi(2)) - c / (3.0 * a);
    if !(discriminant > 0.0) || !v.is_finite() {
        return Err(FarringtonManningError::NumericDomainError(format!(
            "cubic for delta = {delta} has no distinct real roots"
        )));
    }

    // v = 0 takes the positive branch; either sign gives the same root there
    let u = discriminant.sqrt().copysign(v);
    let cosine = v / u.powi(3);
    if !(-1.0..=1.0).contains(&cosine) {
        return Err(FarringtonManningError::NumericDomainError(format!(
            "arccosine argument {cosine} outside [-1, 1] for delta = {delta}"
        )));
    }

    let w = (PI + cosine.acos()) / 3.0;
    let p1_null = 2.0 * u * w.cos() - b / (3.0 * a);
    let p2_null = p1_null - delta;
    let sd = (p1_null * (1.0 - p1_null) / n1 + p2_null * (1.0 - p2_null) / n2).sqrt();

    if !(sd.is_finite() && sd > 0.0) {
        return Err(FarringtonManningError::NumericDomainError(format!(
            "null standard error {sd} is not positive for delta = {delta}"
        )));
    }

    Ok(NullRestrictedEstimate {
        p1: p1_null,
        p2: p2_null,
        sd,
    })
}

/// z-statistic of the observed difference against `delta`.
pub fn z_statistic(rate_difference: f64, delta: f64, sd: f64) -> f64 {
    (rate_difference - delta) / sd
}

/// Upper and lower standard-normal tail probabilities at `z`.
fn normal_tails(z: f64) -> Result<(f64, f64)> {
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| FarringtonManningError::NumericDomainError(e.to_string()))?;
    Ok((normal.sf(z), normal.cdf(z)))
}

/// p-value of `z` under the given alternative.
pub fn p_value(z: f64, alternative: Alternative) -> Result<f64> {
    let (upper, lower) = normal_tails(z)?;
    let p = match alternative {
        Alternative::TwoSided => 2.0 * upper.min(lower),
        Alternative::Greater => upper,
        Alternative::Less => lower,
    };
    Ok(p)
}

enum SearchError {
    Root(RootFindingError),
    Model(FarringtonManningError),
}

impl From<RootFindingError> for SearchError {
    fn from(e: RootFindingError) -> Self {
        SearchError::Root(e)
    }
}

impl From<FarringtonManningError> for SearchError {
    fn from(e: FarringtonManningError) -> Self {
        SearchError::Model(e)
    }
}

impl SearchError {
    fn at(self, bound: Bound) -> FarringtonManningError {
        match self {
            SearchError::Root(source) => FarringtonManningError::NoRootFound { bound, source },
            SearchError::Model(e) => e,
        }
    }
}

/// Confidence interval for `p1 - p2` by inverting the two-sided test.
///
/// The bounds are the margins at which the two-sided p-value equals `alpha_mod`, searched in
/// `[-1 + 1e-6, diff]` and `[diff, 1 - 1e-6]`. The null standard error is recomputed at every
/// candidate margin.
///
/// # Arguments
///
/// * `n1`, `n2` - Number of trials in each group
/// * `proportions` - Unrestricted success rates
/// * `alpha_mod` - Two-sided level to invert at, see [`Hypothesis::alpha_mod`]
/// * `options` - Root-finder tolerances
///
/// # Returns
///
/// `(lower, upper)`, or `NoRootFound` naming the bound whose bracket is empty or had no
/// sign change.
pub fn confidence_interval(
    n1: usize,
    n2: usize,
    proportions: &ProportionPair,
    alpha_mod: f64,
    options: &BrentOptions,
) -> Result<(f64, f64)> {
    proportions.validate()?;
    let rate_difference = proportions.difference();

    let lower_bracket = (-1.0 + BRACKET_EPSILON, rate_difference);
    let upper_bracket = (rate_difference, 1.0 - BRACKET_EPSILON);

    // an observed difference of -1 or 1 leaves one side with nothing to search
    let brackets = [(Bound::Lower, lower_bracket), (Bound::Upper, upper_bracket)];
    for (bound, (lower, upper)) in brackets {
        if !(lower < upper) {
            return Err(FarringtonManningError::NoRootFound {
                bound,
                source: RootFindingError::EmptyBracket { lower, upper },
            });
        }
    }

    let objective = |delta: f64| -> std::result::Result<f64, SearchError> {
        let estimate = restricted_estimate(n1, n2, proportions, delta)?;
        let z = z_statistic(rate_difference, delta, estimate.sd);
        Ok(p_value(z, Alternative::TwoSided)? - alpha_mod)
    };

    let lower = brentq(objective, lower_bracket.0, lower_bracket.1, options)
        .map_err(|e| e.at(Bound::Lower))?;
    let upper = brentq(objective, upper_bracket.0, upper_bracket.1, options)
        .map_err(|e| e.at(Bound::Upper))?;

    Ok((lower, upper))
}

/// Run the Farrington-Manning test on two reduced samples.
///
/// # Arguments
///
/// * `group1`, `group2` - Success and trial counts of each group
/// * `hypothesis` - Margin, alternative and significance level
///
/// # Returns
///
/// `TestResult` with the observed rate difference, z-statistic, p-value and the confidence
/// interval at level `1 - hypothesis.alpha_mod()`.
pub fn farrington_manning_test(
    group1: &Sample,
    group2: &Sample,
    hypothesis: &Hypothesis,
) -> Result<TestResult> {
    hypothesis.validate()?;
    run_validated(group1, group2, hypothesis)
}

/// Test body shared by the public entry points, each of which validates `hypothesis` once.
pub(crate) fn run_validated(
    group1: &Sample,
    group2: &Sample,
    hypothesis: &Hypothesis,
) -> Result<TestResult> {
    let (n1, n2) = (group1.trials(), group2.trials());
    let proportions = ProportionPair::from_samples(group1, group2);
    let rate_difference = proportions.difference();

    let null_estimate = restricted_estimate(n1, n2, &proportions, hypothesis.delta)?;
    let z = z_statistic(rate_difference, hypothesis.delta, null_estimate.sd);
    let p = p_value(z, hypothesis.alternative)?;

    let ci = confidence_interval(
        n1,
        n2,
        &proportions,
        hypothesis.alpha_mod(),
        &BrentOptions::default(),
    )?;

    debug!(
        n1,
        n2,
        delta = hypothesis.delta,
        alternative = %hypothesis.alternative,
        rate_difference,
        z,
        p_value = p,
        ci_lower = ci.0,
        ci_upper = ci.1,
        "farrington-manning test"
    );

    Ok(TestResult {
        rate_difference,
        z_statistic: z,
        p_value: p,
        ci,
        null_estimate,
    })
}

/// Run the Farrington-Manning test on two sequences of binary outcomes.
///
/// `alternative` is one of `"two-sided"`, `"greater"` or `"less"` (case-insensitive) and is
/// checked before anything else. The confidence interval is always two-sided, with level
/// `1 - 2 * alpha` for one-sided alternatives so that its relevant bound is a valid one-sided
/// bound at level `alpha`.
///
/// # Example
///
/// ```
/// use rate_difference::farrington_manning;
///
/// let group1: Vec<bool> = [vec![true; 20], vec![false; 15]].concat();
/// let group2: Vec<bool> = [vec![true; 30], vec![false; 25]].concat();
///
/// let result = farrington_manning(&group1, &group2, -0.3, "greater", 0.05).unwrap();
/// assert!(result.p_value < 0.001);
/// assert!(result.ci.0 <= result.rate_difference && result.rate_difference <= result.ci.1);
/// ```
pub fn farrington_manning<I1, I2>(
    group1: I1,
    group2: I2,
    delta: f64,
    alternative: &str,
    alpha: f64,
) -> Result<TestResult>
where
    I1: IntoIterator,
    I1::Item: BinaryOutcome,
    I2: IntoIterator,
    I2::Item: BinaryOutcome,
{
    let alternative: Alternative = alternative.parse()?;
    let hypothesis = Hypothesis::new(delta, alternative, alpha);
    hypothesis.validate()?;

    let group1 = Sample::from_outcomes(group1)?;
    let group2 = Sample::from_outcomes(group2)?;

    run_validated(&group1, &group2, &hypothesis)
}
