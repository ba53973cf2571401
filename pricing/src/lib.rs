//! Black-Scholes prices, greeks and implied volatility for European options.
//!
//! The [`OptionPricer`] caches the d1 / d2 terms of an option once and answers
//! price and greek queries from them. Implied volatility is recovered either by
//! the exhaustive grid scan in [`implied_volatility_from_call_price`] or, opt-in,
//! by bisection in [`implied_volatility_bisection`].

pub mod analytic;
pub mod common;
pub mod implied;

pub use analytic::black_scholes::OptionPricer;
pub use analytic::normal::cdf;
pub use common::error::{PricingError, Result};
pub use common::models::{DerivativeParameter, ExerciseType, Greek};
pub use implied::bisection::{implied_volatility_bisection, BisectionSolver};
pub use implied::grid::{implied_volatility_from_call_price, VolatilityGrid};
