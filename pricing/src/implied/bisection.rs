use serde::{Deserialize, Serialize};

use crate::analytic::black_scholes::OptionPricer;
use crate::common::error::{finite, positive, PricingError, Result};
use crate::common::models::DerivativeParameter;

/// Bisection on the call price as a function of volatility.
///
/// The call price is increasing in volatility for volatility > 0, so a price
/// between the model prices at `lower` and `upper` has exactly one root in the
/// bracket. Unlike the grid scan this is not limited to a fixed resolution, and
/// it does not reproduce the grid's tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BisectionSolver {
    pub lower: f64,
    pub upper: f64,
    /// absolute tolerance on the call price
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for BisectionSolver {
    fn default() -> Self {
        Self {
            lower: 1e-6,
            upper: 5.0,
            tolerance: 1e-10,
            max_iterations: 200,
        }
    }
}

impl BisectionSolver {
    pub fn solve(
        &self,
        stock_price: f64,
        strike_price: f64,
        time_to_expiration: f64,
        risk_free_rate: f64,
        observed_call_price: f64,
    ) -> Result<f64> {
        let params = DerivativeParameter::new(
            positive("stock_price", stock_price)?,
            positive("strike_price", strike_price)?,
            positive("time_to_expiration", time_to_expiration)?,
            positive("lower", self.lower)?,
            finite("risk_free_rate", risk_free_rate)?,
        );
        let target = finite("observed_call_price", observed_call_price)?;
        positive("upper", self.upper)?;
        let call_at = |vola: f64| OptionPricer::from(params.with_vola(vola)).price_call();

        let (mut low, mut high) = (self.lower, self.upper);
        let (low_price, high_price) = (call_at(low), call_at(high));
        if !(low_price <= target && target <= high_price) {
            return Err(PricingError::NotBracketed {
                price: target,
                low: low_price,
                high: high_price,
            });
        }

        for iteration in 0..self.max_iterations {
            let mid = 0.5 * (low + high);
            let diff = call_at(mid) - target;
            tracing::trace!(iteration, vola = mid, diff, "bisection step");

            if diff.abs() < self.tolerance || high - low <= f64::EPSILON * mid {
                tracing::debug!(iterations = iteration + 1, vola = mid, "bisection converged");
                return Ok(mid);
            }
            if diff < 0.0 {
                low = mid;
            } else {
                high = mid;
            }
        }

        Err(PricingError::NoConvergence {
            iterations: self.max_iterations,
        })
    }
}

/// Implied volatility by bisection with the default [`BisectionSolver`].
pub fn implied_volatility_bisection(
    stock_price: f64,
    strike_price: f64,
    time_to_expiration: f64,
    risk_free_rate: f64,
    observed_call_price: f64,
) -> Result<f64> {
    BisectionSolver::default().solve(
        stock_price,
        strike_price,
        time_to_expiration,
        risk_free_rate,
        observed_call_price,
    )
}
