/// Cumulative standard normal distribution Φ(x).
///
/// Zelen & Severo rational approximation (Abramowitz & Stegun 26.2.17), absolute
/// error below 7.5e-8. Prices and greeks are defined in terms of this
/// approximation, so it must not be swapped for a more accurate one.
pub fn cdf(x: f64) -> f64 {
    let neg = if x < 0.0 { 1.0 } else { 0.0 };
    let x = if x < 0.0 { -x } else { x };

    let k = 1.0 / (1.0 + 0.2316419 * x);
    let poly = ((((1.330274429 * k - 1.821255978) * k + 1.781477937) * k - 0.356563782) * k
        + 0.319381530)
        * k;
    let y = 1.0 - 0.398942280401 * (-0.5 * x * x).exp() * poly;

    (1.0 - neg) * y + neg * (1.0 - y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use probability::distribution::{Distribution, Gaussian};

    const TOLERANCE: f64 = 1e-7;

    #[test]
    fn center_value() {
        // the approximation is off by ~5e-10 at the symmetry point
        assert_approx_eq!(cdf(0.0), 0.5, 1e-9);
    }

    #[test]
    fn table_values() {
        assert_approx_eq!(cdf(1.0), 0.8413447, TOLERANCE);
        assert_approx_eq!(cdf(2.5), 0.9937903, TOLERANCE);
        assert_approx_eq!(cdf(-1.0), 0.1586553, TOLERANCE);
    }

    #[test]
    fn symmetry() {
        for x in [1.0, 2.5, -1.0] {
            assert_eq!(cdf(-x), 1.0 - cdf(x));
        }
    }

    #[test]
    fn close_to_exact_normal() {
        let normal = Gaussian::new(0.0, 1.0);
        for i in -800..=800 {
            let x = i as f64 / 100.0;
            assert_approx_eq!(cdf(x), normal.distribution(x), TOLERANCE);
        }
    }

    #[test]
    fn monotone() {
        let mut previous = cdf(-10.0);
        for i in -999..=1000 {
            let current = cdf(i as f64 / 100.0);
            assert!(current >= previous, "cdf decreases at {}", i as f64 / 100.0);
            previous = current;
        }
    }

    #[test]
    fn saturates_at_infinity() {
        assert_eq!(cdf(f64::INFINITY), 1.0);
        assert_eq!(cdf(f64::NEG_INFINITY), 0.0);
        assert!(cdf(f64::NAN).is_nan());
    }
}
