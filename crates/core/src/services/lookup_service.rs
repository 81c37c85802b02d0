use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::errors::CoreError;
use crate::models::quote::QuoteResult;
use crate::providers::traits::QuoteProvider;

/// Shorter inputs are ignored without issuing a request.
pub const MIN_TICKER_LEN: usize = 4;

/// Trim and uppercase user input. `None` when it is too short to look up.
pub fn normalize_ticker(input: &str) -> Option<String> {
    let ticker = input.trim().to_uppercase();
    (ticker.chars().count() >= MIN_TICKER_LEN).then_some(ticker)
}

/// How a single lookup ended.
#[derive(Debug)]
pub enum LookupOutcome {
    /// Input too short; nothing was requested
    Skipped,
    Found(QuoteResult),
    NotFound,
    /// Transport or parse failure (already logged)
    Failed(CoreError),
    /// The token fired before the provider answered
    Cancelled,
}

/// Cooperative cancellation signal shared between a lookup and its owner.
///
/// Cloning yields a handle to the same signal. Once cancelled it stays
/// cancelled.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`CancelToken::cancel`] has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts lookups in flight. The dashboard shows a spinner and disables the
/// search button while it reads as loading.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Mark one lookup as started. Loading clears when the guard drops,
    /// whichever way the lookup ends.
    pub fn acquire(&self) -> LoadingGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

#[derive(Debug)]
pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Runs ticker lookups against a [`QuoteProvider`].
///
/// Never propagates a failure: every error is logged and reported as
/// [`LookupOutcome::Failed`]. No retries.
#[derive(Clone)]
pub struct QuoteLookupService {
    provider: Arc<dyn QuoteProvider>,
    loading: LoadingFlag,
}

impl std::fmt::Debug for QuoteLookupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteLookupService")
            .field("provider", &self.provider.name())
            .field("loading", &self.loading.is_loading())
            .finish()
    }
}

impl QuoteLookupService {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            provider,
            loading: LoadingFlag::new(),
        }
    }

    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// The flag raised by every lookup this service (or a clone) runs.
    #[must_use]
    pub fn loading(&self) -> &LoadingFlag {
        &self.loading
    }

    /// Look up one ticker, racing the provider against `cancel`.
    pub async fn lookup(&self, input: &str, cancel: &CancelToken) -> LookupOutcome {
        let Some(ticker) = normalize_ticker(input) else {
            return LookupOutcome::Skipped;
        };
        if cancel.is_cancelled() {
            return LookupOutcome::Cancelled;
        }

        let _loading = self.loading.acquire();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            res = self.provider.fetch_quote(&ticker) => Some(res),
        };

        match result {
            None => {
                log::debug!("Lookup for {ticker} cancelled");
                LookupOutcome::Cancelled
            }
            Some(Ok(Some(quote))) => {
                log::debug!("Lookup for {ticker} found {}", quote.display_name);
                LookupOutcome::Found(quote)
            }
            Some(Ok(None)) => {
                log::info!("Ticker {ticker} not found via {}", self.provider.name());
                LookupOutcome::NotFound
            }
            Some(Err(e)) => {
                log::error!("Lookup for {ticker} via {} failed: {e}", self.provider.name());
                LookupOutcome::Failed(e)
            }
        }
    }
}
