use thiserror::Error;

pub type Result<T> = std::result::Result<T, PricingError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("invalid input: {name} = {value}")]
    InvalidInput { name: &'static str, value: f64 },

    /// The observed price cannot be reached inside the volatility bracket.
    #[error("price {price} not bracketed by model prices [{low}, {high}]")]
    NotBracketed { price: f64, low: f64, high: f64 },

    #[error("no convergence after {iterations} iterations")]
    NoConvergence { iterations: usize },
}

/// Reject NaN, infinities and anything not strictly positive.
pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PricingError::InvalidInput { name, value });
    }
    Ok(value)
}

pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(PricingError::InvalidInput { name, value });
    }
    Ok(value)
}
