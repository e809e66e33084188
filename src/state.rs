//! # state
//!
//! What a run needs, built once at start-up and shared by every invocation:
//! the watchlist, the market data provider and the report publisher.
//!
//! In serve mode the state sits behind an `Arc` and is handed to the Axum
//! router; concurrent `POST /invoke` calls each get their own sequential run.
//! The provider's crumb cache is the only mutable part and lives behind its
//! own `tokio::sync::Mutex`.

use std::sync::Arc;

use crate::config::Config;
use crate::market::YahooProvider;
use crate::publisher::Publisher;

// ─── AppState ─────────────────────────────────────────────────────────────────

pub struct AppState<P, R> {
    pub watchlist: Vec<String>,
    pub provider:  P,
    pub publisher: R,
}

impl<P, R> AppState<P, R> {
    pub fn new(watchlist: Vec<String>, provider: P, publisher: R) -> Self {
        Self { watchlist, provider, publisher }
    }
}

pub type SharedState<P, R> = Arc<AppState<P, R>>;

/// Production wiring: Yahoo for data, topic or stdout for delivery.
pub fn build_state(config: &Config) -> anyhow::Result<SharedState<YahooProvider, Publisher>> {
    let provider = YahooProvider::new(config)?;
    let publisher = Publisher::from_config(config);

    Ok(Arc::new(AppState::new(config.watchlist.clone(), provider, publisher)))
}
