//! Bracketed scalar root finding.
//!
//! Brent's method combines bisection, the secant rule and inverse quadratic interpolation.
//! It keeps a bracket with a sign change at every step, so it converges whenever the target
//! function is continuous on the initial interval, and usually much faster than bisection.

use thiserror::Error;
use tracing::trace;

/// Reasons a bracketed search can fail.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RootFindingError {
    #[error("empty bracket [{lower}, {upper}]")]
    EmptyBracket { lower: f64, upper: f64 },

    #[error("f({lower}) = {f_lower} and f({upper}) = {f_upper} have the same sign")]
    NoSignChange {
        lower: f64,
        upper: f64,
        f_lower: f64,
        f_upper: f64,
    },

    #[error("objective is not finite at x = {x}")]
    NonFinite { x: f64 },

    #[error("no convergence after {iterations} iterations")]
    MaxIterations { iterations: usize },
}

/// Convergence settings for [`brentq`].
///
/// The search stops once the bracket half-width drops below `(xtol + rtol * |x|) / 2`.
#[derive(Debug, Clone, Copy)]
pub struct BrentOptions {
    pub xtol: f64,
    pub rtol: f64,
    pub max_iterations: usize,
}

impl Default for BrentOptions {
    fn default() -> Self {
        BrentOptions {
            xtol: 2e-12,
            rtol: 4.0 * f64::EPSILON,
            max_iterations: 100,
        }
    }
}

impl BrentOptions {
    pub fn with_xtol(mut self, xtol: f64) -> Self {
        self.xtol = xtol;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Find a root of `f` inside `[lower, upper]` with Brent's method.
///
/// The objective is fallible so that domain errors raised while evaluating it reach the
/// caller unchanged; failures of the search itself are converted through
/// `E: From<RootFindingError>`.
///
/// # Arguments
///
/// * `f` - Objective, must change sign between `lower` and `upper`
/// * `lower`, `upper` - The bracket, `lower < upper`
/// * `options` - Tolerances and iteration cap
///
/// # Returns
///
/// The abscissa of the root, accurate to the requested tolerance.
pub fn brentq<F, E>(mut f: F, lower: f64, upper: f64, options: &BrentOptions) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<RootFindingError>,
{
    if !(lower < upper) {
        return Err(RootFindingError::EmptyBracket { lower, upper }.into());
    }

    let mut evaluate = |x: f64| -> Result<f64, E> {
        let fx = f(x)?;
        if fx.is_finite() {
            Ok(fx)
        } else {
            Err(RootFindingError::NonFinite { x }.into())
        }
    };

    let mut x_pre = lower;
    let mut x_cur = upper;
    let mut f_pre = evaluate(x_pre)?;
    let mut f_cur = evaluate(x_cur)?;

    if f_pre == 0.0 {
        return Ok(x_pre);
    }
    if f_cur == 0.0 {
        return Ok(x_cur);
    }
    if f_pre.signum() == f_cur.signum() {
        return Err(RootFindingError::NoSignChange {
            lower,
            upper,
            f_lower: f_pre,
            f_upper: f_cur,
        }
        .into());
    }

    // x_blk is the contrapoint: f(x_blk) and f(x_cur) always have opposite signs
    let mut x_blk = 0.0;
    let mut f_blk = 0.0;
    let mut s_pre = 0.0;
    let mut s_cur = 0.0;

    for iteration in 0..options.max_iterations {
        if f_pre != 0.0 && f_cur != 0.0 && f_pre.signum() != f_cur.signum() {
            x_blk = x_pre;
            f_blk = f_pre;
            s_pre = x_cur - x_pre;
            s_cur = s_pre;
        }
        if f_blk.abs() < f_cur.abs() {
            x_pre = x_cur;
            x_cur = x_blk;
            x_blk = x_pre;

            f_pre = f_cur;
            f_cur = f_blk;
            f_blk = f_pre;
        }

        let tolerance = (options.xtol + options.rtol * x_cur.abs()) / 2.0;
        let s_bisect = (x_blk - x_cur) / 2.0;

        trace!(iteration, x = x_cur, fx = f_cur, half_width = s_bisect.abs(), "brent step");

        if f_cur == 0.0 || s_bisect.abs() < tolerance {
            return Ok(x_cur);
        }

        if s_pre.abs() > tolerance && f_cur.abs() < f_pre.abs() {
            let s_try = if x_pre == x_blk {
                // secant
                -f_cur * (x_cur - x_pre) / (f_cur - f_pre)
            } else {
                // inverse quadratic interpolation
                let d_pre = (f_pre - f_cur) / (x_pre - x_cur);
                let d_blk = (f_blk - f_cur) / (x_blk - x_cur);
                -f_cur * (f_blk * d_blk - f_pre * d_pre) / (d_blk * d_pre * (f_blk - f_pre))
            };

            if 2.0 * s_try.abs() < s_pre.abs().min(3.0 * s_bisect.abs() - tolerance) {
                s_pre = s_cur;
                s_cur = s_try;
            } else {
                s_pre = s_bisect;
                s_cur = s_bisect;
            }
        } else {
            s_pre = s_bisect;
            s_cur = s_bisect;
        }

        x_pre = x_cur;
        f_pre = f_cur;
        if s_cur.abs() > tolerance {
            x_cur += s_cur;
        } else {
            x_cur += if s_bisect > 0.0 { tolerance } else { -tolerance };
        }

        f_cur = evaluate(x_cur)?;
    }

    Err(RootFindingError::MaxIterations {
        iterations: options.max_iterations,
    }
    .into())
}
