pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::NaiveDate;
use models::{
    holding::Holding,
    metrics::{HoldingRow, PortfolioMetrics},
    notice::Notice,
    portfolio::Portfolio,
    quote::QuoteResult,
    settings::Settings,
    view::{AssetClassFilter, SortDirection, SortKey, ViewOptions},
};
use providers::{brapi::BrapiProvider, traits::QuoteProvider};
use services::{
    lookup_service::{normalize_ticker, CancelToken, LoadingGuard, LookupOutcome, QuoteLookupService},
    metrics_service::MetricsService,
    portfolio_service::{parse_unit_count, PortfolioService},
    view_service::ViewService,
};
use std::sync::Arc;
use uuid::Uuid;

use errors::CoreError;

/// Everything the dashboard renders from, as one value.
///
/// Cloning is cheap: the holdings sit behind an `Arc` and are copied only
/// when a clone is mutated. Metrics and the table view are never stored
/// here; they are recomputed from it on every read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    portfolio: Arc<Portfolio>,
    view: ViewOptions,
    search_results: Vec<QuoteResult>,
    add_dialog_open: bool,
}

impl DashboardState {
    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.portfolio.holdings
    }

    #[must_use]
    pub fn view(&self) -> &ViewOptions {
        &self.view
    }

    #[must_use]
    pub fn search_results(&self) -> &[QuoteResult] {
        &self.search_results
    }

    #[must_use]
    pub fn is_add_dialog_open(&self) -> bool {
        self.add_dialog_open
    }
}

/// A lookup started by [`DividendTracker::begin_lookup`].
///
/// `run` does not borrow the tracker, so the UI can spawn it and hand the
/// resulting [`LookupCompletion`] back through
/// [`DividendTracker::complete_lookup`]. The loading flag stays raised
/// until the task finishes or is dropped.
#[must_use]
pub struct LookupTask {
    ticket: u64,
    ticker: String,
    token: CancelToken,
    service: QuoteLookupService,
    _loading: LoadingGuard,
}

impl LookupTask {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub async fn run(self) -> LookupCompletion {
        let outcome = self.service.lookup(&self.ticker, &self.token).await;
        LookupCompletion {
            ticket: self.ticket,
            ticker: self.ticker,
            outcome,
        }
    }
}

/// Result of a finished [`LookupTask`].
#[derive(Debug)]
pub struct LookupCompletion {
    ticket: u64,
    pub ticker: String,
    pub outcome: LookupOutcome,
}

impl LookupCompletion {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

struct PendingLookup {
    ticket: u64,
    token: CancelToken,
}

/// Main entry point for the Dividend Tracker core library.
/// Owns the dashboard state and all services needed to operate on it.
#[must_use]
pub struct DividendTracker {
    state: DashboardState,
    portfolio_service: PortfolioService,
    metrics_service: MetricsService,
    view_service: ViewService,
    lookup_service: QuoteLookupService,
    notices: Vec<Notice>,
    pending_lookup: Option<PendingLookup>,
    next_ticket: u64,
}

impl std::fmt::Debug for DividendTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DividendTracker")
            .field("holdings", &self.state.portfolio.len())
            .field("view", &self.state.view)
            .field("provider", &self.lookup_service.provider_name())
            .field("loading", &self.is_loading())
            .field("pending_notices", &self.notices.len())
            .finish()
    }
}

impl DividendTracker {
    /// Create an empty dashboard backed by brapi with the given settings.
    pub fn new(settings: &Settings) -> Self {
        Self::with_provider(Arc::new(BrapiProvider::new(settings)))
    }

    /// Create an empty dashboard configured from the environment.
    pub fn from_env() -> Result<Self, CoreError> {
        let settings = Settings::from_env()?;
        Ok(Self::new(&settings))
    }

    /// Create an empty dashboard backed by any quote provider.
    pub fn with_provider(provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            state: DashboardState::default(),
            portfolio_service: PortfolioService::new(),
            metrics_service: MetricsService::new(),
            view_service: ViewService::new(),
            lookup_service: QuoteLookupService::new(provider),
            notices: Vec::new(),
            pending_lookup: None,
            next_ticket: 0,
        }
    }

    /// A cheap copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> DashboardState {
        self.state.clone()
    }

    // ── Ticker Lookup ───────────────────────────────────────────────

    /// Start looking up a ticker. Input is trimmed and uppercased.
    ///
    /// Returns `None`, without issuing any request, when the input is
    /// shorter than four characters. Any lookup still in flight is
    /// cancelled; only the newest one can change the state.
    pub fn begin_lookup(&mut self, input: &str) -> Option<LookupTask> {
        let ticker = normalize_ticker(input)?;
        self.cancel_lookup();

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let token = CancelToken::new();
        self.pending_lookup = Some(PendingLookup {
            ticket,
            token: token.clone(),
        });

        Some(LookupTask {
            ticket,
            ticker,
            token,
            service: self.lookup_service.clone(),
            _loading: self.lookup_service.loading().acquire(),
        })
    }

    /// Apply a finished lookup. Returns `false` when it was superseded or
    /// cancelled and therefore ignored.
    pub fn complete_lookup(&mut self, completion: LookupCompletion) -> bool {
        match &self.pending_lookup {
            Some(pending) if pending.ticket == completion.ticket => {}
            _ => {
                log::debug!(
                    "Discarding stale lookup #{} for {}",
                    completion.ticket,
                    completion.ticker
                );
                return false;
            }
        }
        self.pending_lookup = None;

        match completion.outcome {
            LookupOutcome::Found(quote) => {
                self.state.search_results = vec![quote];
            }
            LookupOutcome::NotFound => {
                self.state.search_results.clear();
                self.notices.push(Notice::TickerNotFound);
            }
            LookupOutcome::Failed(_) => {
                self.notices.push(Notice::LookupFailed);
            }
            LookupOutcome::Cancelled | LookupOutcome::Skipped => {}
        }
        true
    }

    /// Look up a ticker and apply the result in one go.
    pub async fn search_ticker(&mut self, input: &str) -> bool {
        let Some(task) = self.begin_lookup(input) else {
            return false;
        };
        let completion = task.run().await;
        self.complete_lookup(completion)
    }

    /// Cancel the lookup in flight, if any. Its completion will be ignored.
    pub fn cancel_lookup(&mut self) {
        if let Some(pending) = self.pending_lookup.take() {
            log::debug!("Cancelling lookup #{}", pending.ticket);
            pending.token.cancel();
        }
    }

    /// `true` while any lookup is running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lookup_service.is_loading()
    }

    #[must_use]
    pub fn search_results(&self) -> &[QuoteResult] {
        &self.state.search_results
    }

    // ── Holdings ────────────────────────────────────────────────────

    /// Add a holding created today from a lookup result.
    pub fn add_holding(&mut self, quote: &QuoteResult, unit_count: i64) -> Result<Uuid, CoreError> {
        self.add_holding_on(quote, unit_count, today())
    }

    /// Add a holding as if created on `created_on`.
    ///
    /// On success the add dialog closes and the search results clear. On
    /// failure an [`Notice::InvalidUnitCount`] is queued and nothing changes.
    pub fn add_holding_on(
        &mut self,
        quote: &QuoteResult,
        unit_count: i64,
        created_on: NaiveDate,
    ) -> Result<Uuid, CoreError> {
        let portfolio = Arc::make_mut(&mut self.state.portfolio);
        match self
            .portfolio_service
            .append(portfolio, quote, unit_count, created_on)
        {
            Ok(id) => {
                self.state.add_dialog_open = false;
                self.state.search_results.clear();
                Ok(id)
            }
            Err(e) => {
                self.notices.push(Notice::InvalidUnitCount);
                Err(e)
            }
        }
    }

    /// Add a holding from the raw text of the unit-count field.
    pub fn add_holding_from_input(
        &mut self,
        quote: &QuoteResult,
        unit_count: &str,
    ) -> Result<Uuid, CoreError> {
        match parse_unit_count(unit_count) {
            Ok(units) => self.add_holding(quote, units),
            Err(e) => {
                self.notices.push(Notice::InvalidUnitCount);
                Err(e)
            }
        }
    }

    /// Remove a holding after the user confirms.
    ///
    /// `confirm` is asked only when the holding exists; nothing is removed
    /// unless it returns `true`. Returns whether a holding was removed.
    pub fn remove_holding<F>(&mut self, id: Uuid, confirm: F) -> bool
    where
        F: FnOnce(&Holding) -> bool,
    {
        let Some(holding) = self.state.portfolio.get(id) else {
            return false;
        };
        if !confirm(holding) {
            return false;
        }
        let portfolio = Arc::make_mut(&mut self.state.portfolio);
        self.portfolio_service.remove(portfolio, id)
    }

    #[must_use]
    pub fn holding(&self, id: Uuid) -> Option<&Holding> {
        self.state.portfolio.get(id)
    }

    /// All holdings in insertion order.
    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.state.portfolio.holdings
    }

    #[must_use]
    pub fn holding_count(&self) -> usize {
        self.state.portfolio.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.portfolio.is_empty()
    }

    // ── Metrics ─────────────────────────────────────────────────────

    #[must_use]
    pub fn metrics(&self) -> PortfolioMetrics {
        self.metrics_on(today())
    }

    #[must_use]
    pub fn metrics_on(&self, today: NaiveDate) -> PortfolioMetrics {
        self.metrics_service.summarize(self.holdings(), today)
    }

    // ── Table View ──────────────────────────────────────────────────

    /// Holdings after the active filters, in the active sort order.
    #[must_use]
    pub fn visible_holdings(&self) -> Vec<&Holding> {
        self.view_service.apply(self.holdings(), &self.state.view)
    }

    /// Table rows for the visible holdings.
    #[must_use]
    pub fn rows(&self) -> Vec<HoldingRow<'_>> {
        self.rows_on(today())
    }

    #[must_use]
    pub fn rows_on(&self, today: NaiveDate) -> Vec<HoldingRow<'_>> {
        self.metrics_service.rows(&self.visible_holdings(), today)
    }

    #[must_use]
    pub fn view_options(&self) -> &ViewOptions {
        &self.state.view
    }

    pub fn set_view_options(&mut self, options: ViewOptions) {
        self.state.view = options;
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.state.view.search_text = text.into();
    }

    pub fn set_asset_class_filter(&mut self, filter: AssetClassFilter) {
        self.state.view.asset_class = filter;
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.state.view.sort_key = key;
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.state.view.direction = direction;
    }

    pub fn toggle_sort_direction(&mut self) {
        self.state.view.direction = self.state.view.direction.toggled();
    }

    // ── Add Dialog ──────────────────────────────────────────────────

    pub fn open_add_dialog(&mut self) {
        self.state.add_dialog_open = true;
    }

    /// Close the dialog, dropping its search results and any lookup in flight.
    pub fn close_add_dialog(&mut self) {
        self.cancel_lookup();
        self.state.add_dialog_open = false;
        self.state.search_results.clear();
    }

    #[must_use]
    pub fn is_add_dialog_open(&self) -> bool {
        self.state.add_dialog_open
    }

    // ── Notices ─────────────────────────────────────────────────────

    /// Notices queued since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Pretty JSON of the holdings (debugging/display only; nothing is saved).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self.state.portfolio.as_ref()).map_err(|e| {
            CoreError::Serialization(format!("Failed to serialize holdings to JSON: {e}"))
        })
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
