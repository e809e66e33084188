//! # market::yahoo — Yahoo Finance provider
//!
//! ## Endpoints
//!
//! | Data          | Endpoint                                            | Auth          |
//! |---------------|-----------------------------------------------------|---------------|
//! | Daily closes  | `/v8/finance/chart/{symbol}?range=2y&interval=1d`   | none          |
//! | Fundamentals  | `/v10/finance/quoteSummary/{symbol}?modules=...`    | cookie + crumb |
//!
//! The crumb is fetched once per run (after visiting `fc.yahoo.com` for the
//! session cookie) and cached; a `401` from quoteSummary drops the cache so
//! the next symbol re-handshakes.
//!
//! Every request carries the configured timeout.

use std::{fmt, time::Duration};

use anyhow::Context;
use chrono::DateTime;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ScreenError;
use crate::market::MarketDataProvider;
use crate::models::{Fundamentals, PriceHistory};

pub const COOKIE_URL: &str = "https://fc.yahoo.com";

const HISTORY_RANGE: &str = "2y";
const SUMMARY_MODULES: &str = "price,summaryDetail,defaultKeyStatistics";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

// ─── Provider ─────────────────────────────────────────────────────────────────

pub struct YahooProvider {
    client:     reqwest::Client,
    base_url:   String,
    cookie_url: String,
    timeout:    Duration,
    crumb:      Mutex<Option<String>>,
}

impl YahooProvider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Self::with_endpoints(&config.yahoo_base_url, COOKIE_URL, config.fetch_timeout)
    }

    pub fn with_endpoints(
        base_url: &str,
        cookie_url: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build Yahoo HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie_url: cookie_url.to_string(),
            timeout,
            crumb: Mutex::new(None),
        })
    }

    async fn send(
        &self,
        symbol: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, String), ScreenError> {
        let resp = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ScreenError::fetch(symbol, format!("Yahoo unreachable: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ScreenError::fetch(symbol, format!("Failed to read Yahoo response: {e}")))?;

        Ok((status, body))
    }

    async fn crumb(&self, symbol: &str) -> Result<String, ScreenError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // Answers 404, but sets the session cookie the crumb is tied to.
        if let Err(e) = self.client.get(&self.cookie_url).timeout(self.timeout).send().await {
            warn!(error = %e, "Yahoo cookie endpoint unreachable");
        }

        let url = format!("{}/v1/test/getcrumb", self.base_url);
        let (status, body) = self.send(symbol, self.client.get(&url)).await?;
        let crumb = body.trim();

        if !status.is_success() || !is_valid_crumb(crumb) {
            return Err(ScreenError::fetch(
                symbol,
                format!("Yahoo crumb unavailable: HTTP {status}"),
            ));
        }

        debug!("Yahoo crumb refreshed");
        *cached = Some(crumb.to_string());
        Ok(crumb.to_string())
    }
}

impl MarketDataProvider for YahooProvider {
    async fn fetch_history(&self, symbol: &str) -> Result<PriceHistory, ScreenError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let request = self
            .client
            .get(&url)
            .query(&[("range", HISTORY_RANGE), ("interval", "1d")]);

        let (status, body) = self.send(symbol, request).await?;

        // Unknown symbols come back as 404 with a JSON error envelope.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(ScreenError::fetch(symbol, format!("Yahoo chart HTTP {status}")));
        }

        let history = parse_chart(symbol, &body)?;
        debug!(symbol, points = history.len(), "History fetched");
        Ok(history)
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, ScreenError> {
        let crumb = self.crumb(symbol).await?;
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);
        let request = self
            .client
            .get(&url)
            .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb.as_str())]);

        let (status, body) = self.send(symbol, request).await?;

        if status == StatusCode::UNAUTHORIZED {
            *self.crumb.lock().await = None;
            return Err(ScreenError::fetch(symbol, "Yahoo rejected crumb (HTTP 401)"));
        }
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(ScreenError::fetch(symbol, format!("Yahoo quoteSummary HTTP {status}")));
        }

        parse_quote_summary(symbol, &body)
    }
}

fn is_valid_crumb(crumb: &str) -> bool {
    !crumb.is_empty()
        && crumb.len() < 100
        && !crumb.contains(char::is_whitespace)
        && !crumb.contains('<')
}

// ─── Parsing ──────────────────────────────────────────────────────────────────

/// `{ "code": "Not Found", "description": "No data found, symbol may be delisted" }`
#[derive(Debug, Deserialize)]
struct ApiError {
    code:        String,
    #[serde(default)]
    description: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(d) => write!(f, "Yahoo error {}: {d}", self.code),
            None => write!(f, "Yahoo error {}", self.code),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error:  Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta:       Option<ChartMeta>,
    #[serde(default)]
    timestamp:  Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange UTC offset in seconds; timestamps are session opens in UTC.
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Turn a chart payload into a history dated in the exchange's local calendar.
pub(crate) fn parse_chart(symbol: &str, body: &str) -> Result<PriceHistory, ScreenError> {
    let resp: ChartResponse = serde_json::from_str(body)
        .map_err(|e| ScreenError::fetch(symbol, format!("Failed to parse Yahoo chart: {e}")))?;

    if let Some(err) = resp.chart.error {
        return Err(ScreenError::fetch(symbol, err));
    }

    let Some(result) = resp.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceHistory::new());
    };

    let offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let mut history = PriceHistory::new();
    for (ts, close) in timestamps.iter().zip(closes) {
        let (Some(close), Some(at)) = (close, DateTime::from_timestamp(ts + offset, 0)) else {
            continue;
        };
        history.push(at.date_naive(), close);
    }

    Ok(history)
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    error:  Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail", default)]
    summary_detail: Option<ValuationModule>,
    #[serde(rename = "defaultKeyStatistics", default)]
    default_key_statistics: Option<ValuationModule>,
}

#[derive(Debug, Deserialize)]
struct PriceModule {
    #[serde(rename = "shortName", default)]
    short_name: Option<String>,
    #[serde(rename = "longName", default)]
    long_name:  Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValuationModule {
    #[serde(rename = "forwardPE", default)]
    forward_pe: Option<RawValue>,
}

/// Yahoo wraps numbers as `{ "raw": 21.3, "fmt": "21.30" }`, or `{}` when absent.
#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

impl ValuationModule {
    fn forward_pe(&self) -> Option<f64> {
        self.forward_pe
            .as_ref()
            .and_then(|v| v.raw)
            .filter(|v| v.is_finite())
    }
}

pub(crate) fn parse_quote_summary(symbol: &str, body: &str) -> Result<Fundamentals, ScreenError> {
    let resp: QuoteSummaryResponse = serde_json::from_str(body).map_err(|e| {
        ScreenError::fetch(symbol, format!("Failed to parse Yahoo quoteSummary: {e}"))
    })?;

    if let Some(err) = resp.quote_summary.error {
        return Err(ScreenError::fetch(symbol, err));
    }

    let Some(result) = resp.quote_summary.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Fundamentals::default());
    };

    let name = result
        .price
        .and_then(|p| p.short_name.or(p.long_name))
        .filter(|n| !n.trim().is_empty());

    let forward_pe = result
        .summary_detail
        .as_ref()
        .and_then(ValuationModule::forward_pe)
        .or_else(|| {
            result
                .default_key_statistics
                .as_ref()
                .and_then(ValuationModule::forward_pe)
        });

    Ok(Fundamentals { name, forward_pe })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
