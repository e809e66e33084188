//! Shared fixtures and in-memory doubles for unit tests.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
    time::Duration,
};

use axum::Router;
use chrono::{Days, NaiveDate};

use crate::config::Config;
use crate::error::{PublishError, ScreenError};
use crate::market::MarketDataProvider;
use crate::models::{Fundamentals, PriceHistory};
use crate::publisher::ReportPublisher;

/// One close per calendar day starting 2024-01-01.
pub fn make_history(closes: &[f64]) -> PriceHistory {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut history = PriceHistory::new();
    for (i, close) in closes.iter().enumerate() {
        history.push(start.checked_add_days(Days::new(i as u64)).unwrap(), *close);
    }
    history
}

/// Strictly rising closes: SMA50 stays above SMA200.
pub fn rising(n: usize) -> Vec<f64> {
    (1..=n).map(|i| 50.0 + i as f64).collect()
}

pub fn watchlist(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

pub fn make_config(symbols: &[&str]) -> Config {
    Config {
        watchlist:      watchlist(symbols),
        topic_url:      None,
        topic_token:    None,
        fetch_timeout:  Duration::from_secs(5),
        yahoo_base_url: "http://127.0.0.1:9".to_string(),
        bind_addr:      None,
    }
}

/// Serve `app` on an ephemeral localhost port; returns `http://host:port`.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

// ─── FakeProvider ─────────────────────────────────────────────────────────────

/// Symbols with no series and no failure configured return an empty history.
#[derive(Default)]
pub struct FakeProvider {
    series:              HashMap<String, Vec<f64>>,
    fundamentals:        HashMap<String, Fundamentals>,
    failing:             HashSet<String>,
    failing_fundamentals: HashSet<String>,
    calls:               Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        self.series.insert(symbol.to_string(), closes);
        self
    }

    pub fn with_fundamentals(mut self, symbol: &str, name: &str, forward_pe: Option<f64>) -> Self {
        self.fundamentals.insert(
            symbol.to_string(),
            Fundamentals { name: Some(name.to_string()), forward_pe },
        );
        self
    }

    pub fn failing(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_string());
        self
    }

    pub fn failing_fundamentals(mut self, symbol: &str) -> Self {
        self.failing_fundamentals.insert(symbol.to_string());
        self
    }

    /// Symbols whose history was requested, in call order.
    pub fn history_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl MarketDataProvider for FakeProvider {
    async fn fetch_history(&self, symbol: &str) -> Result<PriceHistory, ScreenError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        if self.failing.contains(symbol) {
            return Err(ScreenError::fetch(symbol, "connection refused"));
        }
        Ok(self
            .series
            .get(symbol)
            .map(|closes| make_history(closes))
            .unwrap_or_default())
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, ScreenError> {
        if self.failing_fundamentals.contains(symbol) {
            return Err(ScreenError::fetch(symbol, "crumb rejected"));
        }
        Ok(self.fundamentals.get(symbol).cloned().unwrap_or_default())
    }
}

// ─── RecordingPublisher ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingPublisher {
    fail: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl ReportPublisher for RecordingPublisher {
    async fn publish(&self, subject: &str, body: &str) -> Result<(), PublishError> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        if self.fail {
            return Err(PublishError::Rejected {
                status: 403,
                body:   "AuthorizationError".to_string(),
            });
        }
        Ok(())
    }
}
