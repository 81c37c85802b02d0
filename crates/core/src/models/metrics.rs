use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// Payments this many days out or fewer are flagged as coming soon.
pub const SOON_THRESHOLD_DAYS: i64 = 7;

/// Dashboard totals over the holdings whose payment is still ahead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Sum of `monthly_payment_per_unit × unit_count` over upcoming holdings
    pub total_to_receive: f64,

    /// Mean `yield_percent` over upcoming holdings, 0 when there are none
    pub average_yield: f64,

    /// Number of upcoming holdings
    pub upcoming_count: usize,
}

/// Styling tier of a payment status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusTier {
    Neutral,
    Urgent,
    Warning,
    Informational,
}

/// Where a holding's payment date sits relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Date already passed
    Paid,
    /// Pays today
    Today,
    /// 1..=7 days out
    Soon(i64),
    /// More than 7 days out
    Upcoming(i64),
}

impl PaymentStatus {
    /// Classify a signed day count. Total over all integers.
    pub fn from_days(days: i64) -> Self {
        if days < 0 {
            PaymentStatus::Paid
        } else if days == 0 {
            PaymentStatus::Today
        } else if days <= SOON_THRESHOLD_DAYS {
            PaymentStatus::Soon(days)
        } else {
            PaymentStatus::Upcoming(days)
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        match self {
            PaymentStatus::Paid => "Paid".to_string(),
            PaymentStatus::Today => "Today".to_string(),
            PaymentStatus::Soon(days) | PaymentStatus::Upcoming(days) => format!("{days}d"),
        }
    }

    #[must_use]
    pub fn tier(&self) -> StatusTier {
        match self {
            PaymentStatus::Paid => StatusTier::Neutral,
            PaymentStatus::Today => StatusTier::Urgent,
            PaymentStatus::Soon(_) => StatusTier::Warning,
            PaymentStatus::Upcoming(_) => StatusTier::Informational,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One line of the holdings table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingRow<'a> {
    pub holding: &'a Holding,
    pub days_until_payment: i64,
    pub status: PaymentStatus,
    /// `monthly_payment_per_unit × unit_count`
    pub total_value: f64,
}
