use serde::{Deserialize, Serialize};

use crate::analytic::black_scholes::OptionPricer;
use crate::common::models::DerivativeParameter;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Volatilities `lower + i * step` for `i = 0..=n`, with `n = round((upper - lower) / step)`.
///
/// Points are derived from the index rather than accumulated, so the last point
/// is `upper` up to rounding. A non-finite or non-positive span scans `lower` only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityGrid {
    pub lower: f64,
    pub upper: f64,
    pub step: f64,
}

impl Default for VolatilityGrid {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 1.0,
            step: 0.000001,
        }
    }
}

impl VolatilityGrid {
    pub fn new(lower: f64, upper: f64, step: f64) -> Self {
        Self { lower, upper, step }
    }

    /// Index of the last grid point.
    pub fn last_index(&self) -> usize {
        let span = (self.upper - self.lower) / self.step;
        if span.is_finite() && span > 0.0 {
            span.round() as usize
        } else {
            0
        }
    }

    pub fn point(&self, index: usize) -> f64 {
        self.lower + index as f64 * self.step
    }

    /// The grid volatility whose model call price is closest to `observed_call_price`.
    ///
    /// Every grid point builds a fresh [`OptionPricer`]; with the default grid
    /// that is about a million constructions per call. Ties go to the lowest
    /// volatility. Points whose price difference is NaN are skipped, and if all
    /// of them are, `lower` is returned.
    pub fn scan(
        &self,
        stock_price: f64,
        strike_price: f64,
        time_to_expiration: f64,
        risk_free_rate: f64,
        observed_call_price: f64,
    ) -> f64 {
        let params = DerivativeParameter::new(
            stock_price,
            strike_price,
            time_to_expiration,
            self.lower,
            risk_free_rate,
        );
        let last_index = self.last_index();
        tracing::debug!(
            lower = self.lower,
            upper = self.upper,
            step = self.step,
            points = last_index.saturating_add(1),
            observed_call_price,
            "implied volatility grid scan started"
        );

        let diff_at = |index: usize| {
            let pricer = OptionPricer::from(params.with_vola(self.point(index)));
            (observed_call_price - pricer.price_call()).abs()
        };
        let best = best_point(last_index, diff_at);

        match best {
            Some((index, diff)) => {
                let vola = self.point(index);
                tracing::debug!(vola, diff, "implied volatility grid scan finished");
                vola
            }
            None => {
                tracing::debug!(
                    vola = self.lower,
                    "no comparable model price on the grid, returning lower bound"
                );
                self.lower
            }
        }
    }
}

/// Linear scan, strict improvement only.
#[cfg(not(feature = "parallel"))]
fn best_point(last_index: usize, diff_at: impl Fn(usize) -> f64) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for index in 0..=last_index {
        let diff = diff_at(index);
        if diff.is_nan() {
            continue;
        }
        match best {
            Some((_, min_diff)) if min_diff <= diff => {}
            _ => best = Some((index, diff)),
        }
    }
    best
}

/// Same result as the linear scan: the reduction keeps the lower index on ties.
#[cfg(feature = "parallel")]
fn best_point(
    last_index: usize,
    diff_at: impl Fn(usize) -> f64 + Sync + Send,
) -> Option<(usize, f64)> {
    (0..=last_index)
        .into_par_iter()
        .map(|index| (index, diff_at(index)))
        .filter(|(_, diff)| !diff.is_nan())
        .reduce_with(|a, b| {
            if b.1 < a.1 || (b.1 == a.1 && b.0 < a.0) {
                b
            } else {
                a
            }
        })
}

/// Implied volatility in [0, 1] by scanning the default [`VolatilityGrid`].
///
/// Accuracy is bounded by the 0.000001 grid step. This never fails: degenerate
/// inputs still return a grid point.
pub fn implied_volatility_from_call_price(
    stock_price: f64,
    strike_price: f64,
    time_to_expiration: f64,
    risk_free_rate: f64,
    observed_call_price: f64,
) -> f64 {
    VolatilityGrid::default().scan(
        stock_price,
        strike_price,
        time_to_expiration,
        risk_free_rate,
        observed_call_price,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const TOLERANCE: f64 = 2e-6;

    #[test]
    fn default_grid() {
        let grid = VolatilityGrid::default();
        assert_eq!(grid.last_index(), 1_000_000);
        assert_eq!(grid.point(0), 0.0);
        assert_approx_eq!(grid.point(grid.last_index()), 1.0, 1e-12);
    }

    #[test]
    fn degenerate_grid_scans_lower_only() {
        assert_eq!(VolatilityGrid::new(0.3, 0.1, 0.01).last_index(), 0);
        assert_eq!(VolatilityGrid::new(0.1, 0.3, 0.0).last_index(), 0);
        assert_eq!(VolatilityGrid::new(0.1, f64::NAN, 0.01).last_index(), 0);
        let vola = VolatilityGrid::new(0.3, 0.1, 0.01).scan(100.0, 100.0, 1.0, 0.05, 10.0);
        assert_eq!(vola, 0.3);
    }

    #[test]
    fn recovers_volatility_from_call_price() {
        for (s, k, t, r, vola) in [(100.0, 100.0, 1.0, 0.05, 0.2), (105.0, 95.0, 0.5, 0.01, 0.45)] {
            let price = OptionPricer::new(s, k, t, vola, r).price_call();
            let implied = implied_volatility_from_call_price(s, k, t, r, price);
            assert_approx_eq!(implied, vola, TOLERANCE);
        }
    }

    #[test]
    fn coarse_grid_picks_nearest_point() {
        let price = OptionPricer::new(100.0, 100.0, 1.0, 0.234, 0.05).price_call();
        let vola = VolatilityGrid::new(0.0, 1.0, 0.01).scan(100.0, 100.0, 1.0, 0.05, price);
        assert_approx_eq!(vola, 0.23, 1e-12);
    }

    #[test]
    fn ties_go_to_the_lowest_volatility() {
        // deep out of the money: model price is exactly zero for small volatilities
        let grid = VolatilityGrid::new(0.01, 1.0, 0.01);
        assert_eq!(grid.scan(50.0, 100.0, 0.1, 0.0, 0.0), 0.01);
        assert_eq!(implied_volatility_from_call_price(50.0, 100.0, 0.1, 0.0, 0.0), 0.0);
    }

    #[test]
    fn unreachable_price_ends_on_the_boundary() {
        let grid = VolatilityGrid::new(0.0, 1.0, 0.001);
        // above the upper no-arbitrage bound: the call can never be worth more than S
        assert_approx_eq!(grid.scan(100.0, 100.0, 1.0, 0.05, 150.0), 1.0, 1e-12);
    }

    #[test]
    fn nan_prices_return_lower_bound() {
        let grid = VolatilityGrid::new(0.05, 1.0, 0.01);
        assert_eq!(grid.scan(-100.0, 100.0, 1.0, 0.05, 10.0), 0.05);
        assert_eq!(grid.scan(100.0, 100.0, 1.0, 0.05, f64::NAN), 0.05);
    }

    #[test]
    fn grid_deserializes_from_json() {
        let grid: VolatilityGrid =
            serde_json::from_str(r#"{"lower": 0.1, "upper": 0.5, "step": 0.001}"#).unwrap();
        assert_eq!(grid, VolatilityGrid::new(0.1, 0.5, 0.001));
        assert_eq!(grid.last_index(), 400);
    }
}
