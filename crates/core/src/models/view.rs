use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

use super::asset::AssetClass;

/// Asset-class filter of the holdings table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetClassFilter {
    /// Wildcard, shows every class
    #[default]
    All,
    Only(AssetClass),
}

impl AssetClassFilter {
    #[must_use]
    pub fn matches(&self, class: AssetClass) -> bool {
        match self {
            AssetClassFilter::All => true,
            AssetClassFilter::Only(wanted) => *wanted == class,
        }
    }
}

impl std::fmt::Display for AssetClassFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetClassFilter::All => write!(f, "all"),
            AssetClassFilter::Only(class) => write!(f, "{class}"),
        }
    }
}

impl FromStr for AssetClassFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "all" {
            return Ok(AssetClassFilter::All);
        }
        s.parse().map(AssetClassFilter::Only)
    }
}

/// Column the holdings table is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    /// Next payment date (default)
    #[default]
    Date,
    Ticker,
    Yield,
    /// Projected payment for the whole position
    Value,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Date => write!(f, "date"),
            SortKey::Ticker => write!(f, "ticker"),
            SortKey::Yield => write!(f, "yield"),
            SortKey::Value => write!(f, "value"),
        }
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "date" => Ok(SortKey::Date),
            "ticker" => Ok(SortKey::Ticker),
            "yield" => Ok(SortKey::Yield),
            "value" => Ok(SortKey::Value),
            other => Err(CoreError::ValidationError(format!(
                "Unknown sort key '{other}': expected date, ticker, yield or value"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            other => Err(CoreError::ValidationError(format!(
                "Unknown sort direction '{other}': expected asc or desc"
            ))),
        }
    }
}

/// Everything the user selected to shape the holdings table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOptions {
    /// Case-insensitive substring matched against ticker or name
    pub search_text: String,
    pub asset_class: AssetClassFilter,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}
