//! # config — Runtime configuration from environment variables
//!
//! | Variable             | Default                              | Description                               |
//! |----------------------|--------------------------------------|-------------------------------------------|
//! | `WATCHLIST`          | [`DEFAULT_WATCHLIST`]                | Comma-separated ticker symbols            |
//! | `REPORT_TOPIC_URL`   | *(unset → print to stdout)*          | Notification topic the report is POSTed to |
//! | `REPORT_TOPIC_TOKEN` | *(unset)*                            | Bearer token for the topic                |
//! | `FETCH_TIMEOUT_SECS` | `30`                                 | Per-request timeout for every HTTP call   |
//! | `YAHOO_BASE_URL`     | `https://query1.finance.yahoo.com`   | Market data API root                      |
//! | `BIND_ADDR`          | *(unset → run once and exit)*        | Serve the HTTP trigger on this address    |

use std::{net::SocketAddr, time::Duration};

use anyhow::{bail, Context};

/// Watchlist used when `WATCHLIST` is not set.
pub const DEFAULT_WATCHLIST: &[&str] = &[
    "ASTS", "RKLB", "GOOG", "AMZN", "NBIS", "RDDT", "MU", "IREN", "TSLA", "PLTR", "AVAV",
    "D05.SI", "O39.SI",
];

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Everything a screen run needs from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Symbols in processing order.
    pub watchlist:      Vec<String>,
    /// Where the rendered report goes.  `None` → standard output.
    pub topic_url:      Option<String>,
    pub topic_token:    Option<String>,
    /// Applied to every outbound request so a hung provider cannot stall the run.
    pub fetch_timeout:  Duration,
    pub yahoo_base_url: String,
    /// `Some` → serve `POST /invoke` instead of running once.
    pub bind_addr:      Option<SocketAddr>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let watchlist = match std::env::var("WATCHLIST") {
            Ok(raw) => parse_watchlist(&raw),
            Err(_) => DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect(),
        };

        if watchlist.is_empty() {
            bail!("WATCHLIST is set but contains no symbols");
        }

        let timeout_secs: u64 = std::env::var("FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("FETCH_TIMEOUT_SECS must be a number")?;

        let bind_addr = match std::env::var("BIND_ADDR") {
            Ok(raw) => Some(
                raw.parse::<SocketAddr>()
                    .with_context(|| format!("BIND_ADDR is not a socket address: '{raw}'"))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            watchlist,
            topic_url:      non_empty_var("REPORT_TOPIC_URL"),
            topic_token:    non_empty_var("REPORT_TOPIC_TOKEN"),
            fetch_timeout:  Duration::from_secs(timeout_secs),
            yahoo_base_url: std::env::var("YAHOO_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_YAHOO_BASE_URL.to_string()),
            bind_addr,
        })
    }
}

/// Split a comma-separated symbol list, keeping order and dropping blanks.
pub fn parse_watchlist(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
