//! Implied volatility from observed call prices.
//!
//! - [`grid`] scans a fixed volatility grid and keeps the closest model price.
//! - [`bisection`] brackets the volatility and halves the interval until the
//!   model price matches.

pub mod bisection;
pub mod grid;
