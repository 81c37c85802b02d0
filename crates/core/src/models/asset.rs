use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// The class of a tracked asset.
/// Inferred from the ticker at lookup time, never entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    /// Shares of a listed company (PETR4, VALE3, ...)
    Equity,
    /// Listed real-estate investment funds (MXRF11, HGLG11, ...)
    RealEstateFund,
}

impl AssetClass {
    /// Classify a ticker: anything containing `"11"` or `"FII"` is a
    /// real-estate fund, everything else an equity.
    pub fn from_ticker(ticker: &str) -> Self {
        if ticker.contains("11") || ticker.contains("FII") {
            AssetClass::RealEstateFund
        } else {
            AssetClass::Equity
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetClass::Equity => write!(f, "Equity"),
            AssetClass::RealEstateFund => write!(f, "RealEstateFund"),
        }
    }
}

impl FromStr for AssetClass {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Equity" => Ok(AssetClass::Equity),
            "RealEstateFund" => Ok(AssetClass::RealEstateFund),
            other => Err(CoreError::ValidationError(format!(
                "Unknown asset class '{other}': expected Equity or RealEstateFund"
            ))),
        }
    }
}
