use serde::{Deserialize, Serialize};

/// A message the dashboard must show to the user (the blocking alert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Notice {
    /// Add was attempted without a positive unit count
    InvalidUnitCount,
    /// The quote source returned no result for the ticker
    TickerNotFound,
    /// The lookup failed in transport or parsing
    LookupFailed,
}

impl Notice {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Notice::InvalidUnitCount => "Enter the number of units",
            Notice::TickerNotFound => "Ticker not found",
            Notice::LookupFailed => "Could not look up the ticker. Please try again.",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
