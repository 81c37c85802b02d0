use serde::{Deserialize, Serialize};

use super::asset::AssetClass;

/// Sector shown when the quote source does not classify the asset.
pub const UNCLASSIFIED_SECTOR: &str = "Unclassified";

/// A single normalized quote-lookup result, the candidate a user confirms
/// with a unit count before it becomes a holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Ticker symbol as reported by the quote source (e.g., "PETR4")
    pub ticker: String,

    /// Long-form issuer/fund name, falling back to the short name
    pub display_name: String,

    /// Heuristic class inferred from the ticker
    pub asset_class: AssetClass,

    /// Sector, or [`UNCLASSIFIED_SECTOR`] when absent
    pub sector: String,

    /// Last traded price; 0 when the source omits it
    pub current_price: f64,
}

impl QuoteResult {
    /// Normalize the loosely-typed fields of a quote record.
    ///
    /// Empty strings count as missing, so a blank `long_name` falls through
    /// to `short_name` and then to the ticker itself.
    pub fn normalize(
        ticker: impl Into<String>,
        long_name: Option<&str>,
        short_name: Option<&str>,
        sector: Option<&str>,
        price: Option<f64>,
    ) -> Self {
        let ticker = ticker.into();
        let display_name = non_blank(long_name)
            .or_else(|| non_blank(short_name))
            .unwrap_or(ticker.as_str())
            .to_string();
        let sector = non_blank(sector).unwrap_or(UNCLASSIFIED_SECTOR).to_string();
        let current_price = price.filter(|p| p.is_finite()).unwrap_or(0.0);

        Self {
            asset_class: AssetClass::from_ticker(&ticker),
            ticker,
            display_name,
            sector,
            current_price,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
