use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::portfolio::Portfolio;
use crate::models::quote::QuoteResult;

/// Manages the holdings list: append and remove.
///
/// Pure business logic — no I/O, no API calls. Easy to test.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Create a holding from a confirmed quote and append it.
    ///
    /// `unit_count` comes straight from user input, so zero and negative
    /// values are rejected here without touching the portfolio.
    pub fn append(
        &self,
        portfolio: &mut Portfolio,
        quote: &QuoteResult,
        unit_count: i64,
        created_on: NaiveDate,
    ) -> Result<Uuid, CoreError> {
        let units = u32::try_from(unit_count)
            .ok()
            .filter(|u| *u > 0)
            .ok_or_else(|| {
                CoreError::ValidationError(format!(
                    "Unit count must be a positive integer, got {unit_count}"
                ))
            })?;

        let holding = Holding::from_quote(quote, units, created_on)?;
        let id = holding.id;
        log::debug!("Adding {} × {} as holding {id}", units, holding.ticker);
        portfolio.holdings.push(holding);
        Ok(id)
    }

    /// Remove the holding with `id`. Returns `false` (and changes nothing)
    /// when there is no such holding.
    pub fn remove(&self, portfolio: &mut Portfolio, id: Uuid) -> bool {
        match portfolio.holdings.iter().position(|h| h.id == id) {
            Some(idx) => {
                let removed = portfolio.holdings.remove(idx);
                log::debug!("Removed holding {id} ({})", removed.ticker);
                true
            }
            None => false,
        }
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the unit-count text field of the add dialog.
pub fn parse_unit_count(input: &str) -> Result<i64, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ValidationError("Unit count is required".into()));
    }
    let units: i64 = trimmed.parse().map_err(|_| {
        CoreError::ValidationError(format!("Unit count '{trimmed}' is not a whole number"))
    })?;
    if units <= 0 {
        return Err(CoreError::ValidationError(format!(
            "Unit count must be a positive integer, got {units}"
        )));
    }
    Ok(units)
}
