use serde::{Deserialize, Serialize};

/// The market and contract inputs of a European option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivativeParameter {
    /// the asset's price at time t
    pub asset_price: f64,
    /// the strike or exercise price of the asset
    pub strike: f64,
    /// (T - t) in years, where T is the time of the option's expiration and t is the current time
    pub time_to_expiration: f64,
    /// the annualized standard deviation of the stock's returns
    pub vola: f64,
    /// the annualized, continuously compounded risk-free interest rate
    pub rfr: f64,
}

impl DerivativeParameter {
    pub fn new(
        asset_price: f64,
        strike: f64,
        time_to_expiration: f64,
        vola: f64,
        rfr: f64,
    ) -> Self {
        Self {
            asset_price,
            strike,
            time_to_expiration,
            vola,
            rfr,
        }
    }

    /// Same contract and market, different volatility.
    pub fn with_vola(&self, vola: f64) -> Self {
        Self { vola, ..*self }
    }

    /// e^(-r T)
    pub fn discount_factor(&self) -> f64 {
        (-self.rfr * self.time_to_expiration).exp()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseType {
    Call,
    Put,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Greek {
    Delta,
    Gamma,
    Theta,
    Vega,
    Rho,
}

impl Greek {
    pub const ALL: [Greek; 5] = [
        Greek::Delta,
        Greek::Gamma,
        Greek::Theta,
        Greek::Vega,
        Greek::Rho,
    ];
}
