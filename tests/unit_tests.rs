use approx::{assert_abs_diff_eq, assert_relative_eq};
use rate_difference::testing::inference::discrete::{
    confidence_interval, p_value, restricted_estimate, z_statistic,
};
use rate_difference::testing::roots::{BrentOptions, RootFindingError, brentq};
use rate_difference::{
    Alternative, Bound, FarringtonManningError, Hypothesis, ProportionPair, Sample,
};

#[cfg(test)]
mod restricted_estimate_tests {
    use super::*;

    #[test]
    fn check_constraint_holds_across_margins() {
        let pair = ProportionPair { p1: 0.3, p2: 0.625 };
        for step in -9..=9 {
            let delta = step as f64 / 10.0;
            let estimate = restricted_estimate(40, 40, &pair, delta).unwrap();
            assert_abs_diff_eq!(estimate.p1 - estimate.p2, delta, epsilon = 1e-12);
            assert!(estimate.sd > 0.0 && estimate.sd.is_finite());
        }
    }

    #[test]
    fn check_unbalanced_groups() {
        // group sizes only enter through their ratio and the variance terms
        let pair = ProportionPair { p1: 0.06, p2: 0.18 };
        let estimate = restricted_estimate(50, 50, &pair, 0.0).unwrap();
        assert_abs_diff_eq!(estimate.p1, 0.12, epsilon = 1e-12);

        let unbalanced = restricted_estimate(50, 150, &pair, 0.0).unwrap();
        // pooled rate (3 + 27) / 200
        assert_abs_diff_eq!(unbalanced.p1, 0.15, epsilon = 1e-12);
        assert!(unbalanced.sd < estimate.sd);
    }
}

#[cfg(test)]
mod statistic_tests {
    use super::*;

    #[test]
    fn check_z_statistic() {
        assert_relative_eq!(z_statistic(0.1, -0.2, 0.1), 3.0, epsilon = 1e-12);
        assert_relative_eq!(z_statistic(-0.1, 0.0, 0.05), -2.0, epsilon = 1e-12);
    }

    #[test]
    fn check_two_sided_is_twice_smaller_tail() {
        for z in [-3.0, -1.2, -0.1, 0.0, 0.4, 2.5] {
            let two_sided = p_value(z, Alternative::TwoSided).unwrap();
            let greater = p_value(z, Alternative::Greater).unwrap();
            let less = p_value(z, Alternative::Less).unwrap();
            assert_abs_diff_eq!(two_sided, 2.0 * greater.min(less), epsilon = 1e-15);
            assert_abs_diff_eq!(greater + less, 1.0, epsilon = 1e-12);
            assert!((0.0..=1.0).contains(&two_sided));
        }
    }

    #[test]
    fn check_one_sided_monotonic_in_z() {
        let zs = [-4.0, -2.0, -0.5, 0.0, 0.5, 2.0, 4.0];
        let greater: Vec<f64> = zs
            .iter()
            .map(|&z| p_value(z, Alternative::Greater).unwrap())
            .collect();
        let less: Vec<f64> = zs
            .iter()
            .map(|&z| p_value(z, Alternative::Less).unwrap())
            .collect();

        assert!(greater.windows(2).all(|w| w[0] > w[1]));
        assert!(less.windows(2).all(|w| w[0] < w[1]));
    }
}

#[cfg(test)]
mod interval_tests {
    use super::*;

    #[test]
    fn check_wider_interval_at_higher_confidence() {
        let pair = ProportionPair {
            p1: 12.0 / 40.0,
            p2: 25.0 / 40.0,
        };
        let options = BrentOptions::default();
        let (lower_90, upper_90) = confidence_interval(40, 40, &pair, 0.1, &options).unwrap();
        let (lower_95, upper_95) = confidence_interval(40, 40, &pair, 0.05, &options).unwrap();

        assert_abs_diff_eq!(lower_90, -0.485_376_771_6, epsilon = 1e-6);
        assert_abs_diff_eq!(upper_90, -0.143_589_851_8, epsilon = 1e-6);
        assert_abs_diff_eq!(lower_95, -0.512_688_944_2, epsilon = 1e-6);
        assert_abs_diff_eq!(upper_95, -0.107_831_712_7, epsilon = 1e-6);
        assert!(lower_95 < lower_90 && upper_90 < upper_95);
    }

    #[test]
    fn check_all_successes_in_one_group() {
        let pair = ProportionPair {
            p1: 1.0,
            p2: 30.0 / 55.0,
        };
        let (lower, upper) =
            confidence_interval(35, 55, &pair, 0.05, &BrentOptions::default()).unwrap();
        assert_abs_diff_eq!(lower, 0.330_252_802_5, epsilon = 1e-6);
        assert_abs_diff_eq!(upper, 0.584_773_097_6, epsilon = 1e-6);
    }

    #[test]
    fn check_upper_bound_failure_is_reported() {
        // observed difference of 1 leaves nothing to search above it
        let pair = ProportionPair { p1: 1.0, p2: 0.0 };
        let err = confidence_interval(10, 10, &pair, 0.05, &BrentOptions::default()).unwrap_err();
        match err {
            FarringtonManningError::NoRootFound { bound, source } => {
                assert_eq!(bound, Bound::Upper);
                assert!(matches!(source, RootFindingError::EmptyBracket { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn check_bound_failures_mirror_each_other() {
        let options = BrentOptions::default();
        let all_first = ProportionPair::new(1.0, 0.0).unwrap();
        let all_second = ProportionPair::new(0.0, 1.0).unwrap();
        let high = confidence_interval(10, 10, &all_first, 0.05, &options);
        let low = confidence_interval(10, 10, &all_second, 0.05, &options);
        assert!(matches!(
            high,
            Err(FarringtonManningError::NoRootFound { bound: Bound::Upper, .. })
        ));
        assert!(matches!(
            low,
            Err(FarringtonManningError::NoRootFound { bound: Bound::Lower, .. })
        ));
    }
}

#[cfg(test)]
mod configuration_tests {
    use super::*;

    #[test]
    fn check_builder_chain() {
        let hypothesis = Hypothesis::default()
            .with_delta(-0.15)
            .with_alternative(Alternative::Greater)
            .with_alpha(0.025);
        assert_eq!(hypothesis, Hypothesis::new(-0.15, Alternative::Greater, 0.025));
        assert_abs_diff_eq!(hypothesis.alpha_mod(), 0.05);
    }

    #[test]
    fn check_sample_counts() {
        let sample = Sample::from_outcomes([true, true, false]).unwrap();
        assert_eq!((sample.successes(), sample.trials()), (2, 3));
    }

    #[test]
    fn check_brent_reports_missing_sign_change() {
        let result: Result<f64, RootFindingError> =
            brentq(|x| Ok(x * x + 0.5), -1.0, 1.0, &BrentOptions::default());
        assert!(matches!(result, Err(RootFindingError::NoSignChange { .. })));
    }
}
