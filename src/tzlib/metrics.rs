/// Checks if a value is a finite whole number.
/// Counts may arrive in floating point containers, so integer-ness is judged
/// by value rather than by type.
pub fn is_whole(value: f64) -> bool {
    value.is_finite() && value.trunc() == value
}

/// Cumulative distribution function of the standard normal (mean 0, variance 1).
///
/// # Parameters
/// - `x`: The point at which to evaluate the CDF.
///
/// # Returns
/// The probability that a standard normal variate is at most `x`.
/// - NaN input returns NaN.
/// - -inf returns 0.0 and +inf returns 1.0.
pub fn std_normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    0.5 * libm::erfc(-x / std::f64::consts::SQRT_2)
}

/// Two-sided tail probability of a standard normal score, 2 * Phi(-|z|).
/// Only the magnitude of `z` matters. A NaN score gives a NaN probability.
pub fn two_sided_pvalue(z: f64) -> f64 {
    2.0 * std_normal_cdf(-z.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_whole() {
        assert!(is_whole(0.0));
        assert!(is_whole(30.0));
        assert!(is_whole(-2.0));
        assert!(!is_whole(10.5));
        assert!(!is_whole(f64::NAN));
        assert!(!is_whole(f64::INFINITY));
    }

    #[test]
    fn test_cdf_reference_points() {
        assert_relative_eq!(std_normal_cdf(0.0), 0.5, epsilon = 1e-15);
        assert_relative_eq!(
            std_normal_cdf(1.96),
            0.975_002_104_851_779_5,
            max_relative = 1e-14
        );
        assert_relative_eq!(
            std_normal_cdf(-1.0),
            0.158_655_253_931_457_05,
            max_relative = 1e-14
        );
        assert_eq!(std_normal_cdf(f64::NEG_INFINITY), 0.0);
        assert_eq!(std_normal_cdf(f64::INFINITY), 1.0);
        assert!(std_normal_cdf(f64::NAN).is_nan());
    }

    #[test]
    fn test_cdf_far_tail() {
        // erfc keeps precision where 1 - erf would round to zero
        let tail = std_normal_cdf(-10.0);
        assert!(tail > 0.0);
        assert_relative_eq!(tail, 7.619_853_024_160_527e-24, max_relative = 1e-13);
    }

    #[test]
    fn test_two_sided() {
        assert_relative_eq!(two_sided_pvalue(0.0), 1.0, epsilon = 1e-15);
        assert_relative_eq!(
            two_sided_pvalue(1.96),
            0.049_995_790_296_440_87,
            max_relative = 1e-14
        );
        assert_eq!(two_sided_pvalue(2.5), two_sided_pvalue(-2.5));
        assert_eq!(two_sided_pvalue(f64::INFINITY), 0.0);
        assert!(two_sided_pvalue(f64::NAN).is_nan());
    }
}
