use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::quote::QuoteResult;
use crate::models::settings::Settings;
use super::traits::QuoteProvider;

const PROVIDER_NAME: &str = "brapi";

/// brapi.dev quote provider for Brazilian equities and real-estate funds.
///
/// - **Endpoint**: `GET {base}/quote/{ticker}?token={token}`
/// - **Free tier**: the `demo` token covers a handful of tickers.
/// - **Response**: `{ "results": [ { "symbol", "longName", ... } ] }`; only
///   the first record is read.
///
/// The HTTP status is not trusted on its own: brapi answers unknown tickers
/// with an error body, which parses as "not found" like any other body
/// without results.
pub struct BrapiProvider {
    client: Client,
    base_url: String,
    token: String,
}

impl BrapiProvider {
    pub fn new(settings: &Settings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: settings.quote_base_url.clone(),
            token: settings.quote_token.clone(),
        }
    }

    /// Build the quote URL, encoding the ticker as a single path segment.
    pub fn quote_url(&self, ticker: &str) -> Result<Url, CoreError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            CoreError::InvalidConfig(format!("Invalid quote base URL '{}': {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                CoreError::InvalidConfig(format!(
                    "Quote base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("quote")
            .push(ticker);
        url.query_pairs_mut().append_pair("token", &self.token);
        Ok(url)
    }

    /// Interpret a response body.
    ///
    /// Anything that is not JSON is an error. Valid JSON without a usable
    /// first `results` record is "not found".
    pub fn parse_quote_body(body: &str) -> Result<Option<QuoteResult>, CoreError> {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            CoreError::Deserialization(format!("{PROVIDER_NAME} returned a non-JSON body: {e}"))
        })?;

        let first = match value
            .get("results")
            .and_then(Value::as_array)
            .and_then(|results| results.first())
        {
            Some(first) => first.clone(),
            None => return Ok(None),
        };

        let raw: RawQuote = match serde_json::from_value(first) {
            Ok(raw) => raw,
            Err(e) => {
                log::debug!("{PROVIDER_NAME}: ignoring malformed quote record: {e}");
                return Ok(None);
            }
        };

        Ok(raw.into_quote())
    }
}

// ── brapi response types ────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuote {
    symbol: Option<String>,
    long_name: Option<String>,
    short_name: Option<String>,
    sector: Option<String>,
    regular_market_price: Option<f64>,
}

impl RawQuote {
    fn into_quote(self) -> Option<QuoteResult> {
        let symbol = self.symbol.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())?;
        Some(QuoteResult::normalize(
            symbol,
            self.long_name.as_deref(),
            self.short_name.as_deref(),
            self.sector.as_deref(),
            self.regular_market_price,
        ))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for BrapiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_quote(&self, ticker: &str) -> Result<Option<QuoteResult>, CoreError> {
        let url = self.quote_url(ticker)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Self::parse_quote_body(&body);
        }

        log::debug!("{PROVIDER_NAME}: HTTP {status} for {ticker}");
        match Self::parse_quote_body(&body) {
            Err(CoreError::Deserialization(_)) => Err(CoreError::Api {
                provider: PROVIDER_NAME.to_string(),
                message: format!("HTTP {status}"),
            }),
            other => other,
        }
    }
}
