use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

use super::asset::AssetClass;
use super::quote::QuoteResult;

/// Share of the unit price paid out per month. A synthetic approximation,
/// not a real dividend figure.
pub const MONTHLY_PAYMENT_RATE: f64 = 0.006;

/// Yield reported for every holding. Kept as a constant rather than derived
/// from `monthly_payment_per_unit / unit_price`.
pub const FIXED_YIELD_PERCENT: f64 = 0.6;

/// Day of the month on which projected payments fall.
pub const PAYMENT_DAY_OF_MONTH: u32 = 15;

/// A tracked asset position with its projected income.
///
/// **Immutable after creation**: the price, payment and payment date are
/// fixed when the holding is added and never refreshed. Once the payment
/// date passes the holding simply reads as paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Unique identifier, used only for removal
    pub id: Uuid,

    /// Ticker symbol (duplicates across holdings are allowed)
    pub ticker: String,

    /// Issuer/fund name
    pub display_name: String,

    pub asset_class: AssetClass,

    pub sector: String,

    /// Quote price at the moment the holding was created
    pub unit_price: f64,

    /// `unit_price × MONTHLY_PAYMENT_RATE`, rounded to cents
    pub monthly_payment_per_unit: f64,

    pub yield_percent: f64,

    /// The 15th of the month following creation
    pub next_payment_date: NaiveDate,

    /// Number of units held (always > 0)
    pub unit_count: u32,
}

impl Holding {
    /// Build a holding from a confirmed lookup result.
    pub fn from_quote(
        quote: &QuoteResult,
        unit_count: u32,
        created_on: NaiveDate,
    ) -> Result<Self, CoreError> {
        if unit_count == 0 {
            return Err(CoreError::ValidationError(
                "Unit count must be a positive integer".into(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            ticker: quote.ticker.clone(),
            display_name: quote.display_name.clone(),
            asset_class: quote.asset_class,
            sector: quote.sector.clone(),
            unit_price: quote.current_price,
            monthly_payment_per_unit: round_cents(quote.current_price * MONTHLY_PAYMENT_RATE),
            yield_percent: FIXED_YIELD_PERCENT,
            next_payment_date: next_payment_date(created_on)?,
            unit_count,
        })
    }

    /// Projected payment for the whole position.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.monthly_payment_per_unit * f64::from(self.unit_count)
    }
}

/// The payment day in the calendar month after `from`.
pub fn next_payment_date(from: NaiveDate) -> Result<NaiveDate, CoreError> {
    let (year, month) = if from.month() == 12 {
        (from.year() + 1, 1)
    } else {
        (from.year(), from.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, PAYMENT_DAY_OF_MONTH).ok_or_else(|| {
        CoreError::ValidationError(format!("No payment date exists after {from}"))
    })
}

/// Round to two decimal places (half away from zero).
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
