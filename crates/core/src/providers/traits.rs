use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::quote::QuoteResult;

/// Trait abstraction for the market-data source behind ticker lookups.
///
/// The dashboard only ever talks to this trait, so the HTTP source can be
/// swapped out (or mocked in tests) without touching the lookup flow.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the quote for one ticker.
    ///
    /// Returns `Ok(None)` when the source has no matching record, and
    /// `Err` only for transport or parse failures.
    async fn fetch_quote(&self, ticker: &str) -> Result<Option<QuoteResult>, CoreError>;
}
