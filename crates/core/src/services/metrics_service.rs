use chrono::NaiveDate;

use crate::models::holding::Holding;
use crate::models::metrics::{HoldingRow, PaymentStatus, PortfolioMetrics};

/// Derives payment countdowns and dashboard totals from holdings.
///
/// Nothing is cached: every call recomputes from the list it is given,
/// relative to the `today` it is given.
pub struct MetricsService;

impl MetricsService {
    pub fn new() -> Self {
        Self
    }

    /// Whole calendar days from `today` to `payment_date`. Negative once
    /// the date has passed.
    #[must_use]
    pub fn days_until_payment(&self, payment_date: NaiveDate, today: NaiveDate) -> i64 {
        (payment_date - today).num_days()
    }

    #[must_use]
    pub fn payment_status(&self, days: i64) -> PaymentStatus {
        PaymentStatus::from_days(days)
    }

    /// Totals over holdings whose payment is today or later.
    pub fn summarize(&self, holdings: &[Holding], today: NaiveDate) -> PortfolioMetrics {
        let upcoming: Vec<&Holding> = holdings
            .iter()
            .filter(|h| self.days_until_payment(h.next_payment_date, today) >= 0)
            .collect();

        let total_to_receive = upcoming.iter().map(|h| h.total_value()).sum::<f64>();
        let average_yield = if upcoming.is_empty() {
            0.0
        } else {
            upcoming.iter().map(|h| h.yield_percent).sum::<f64>() / upcoming.len() as f64
        };

        PortfolioMetrics {
            total_to_receive,
            average_yield,
            upcoming_count: upcoming.len(),
        }
    }

    /// Attach countdown and status to each holding, keeping the given order.
    pub fn rows<'a>(&self, holdings: &[&'a Holding], today: NaiveDate) -> Vec<HoldingRow<'a>> {
        holdings
            .iter()
            .map(|&holding| {
                let days = self.days_until_payment(holding.next_payment_date, today);
                HoldingRow {
                    holding,
                    days_until_payment: days,
                    status: self.payment_status(days),
                    total_value: holding.total_value(),
                }
            })
            .collect()
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new()
    }
}
