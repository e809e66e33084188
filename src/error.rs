//! # error
//!
//! Error types for the screener.
//!
//! Two families, matching the two places a run can go wrong:
//!
//! * [`ScreenError`] — anything that fails *one symbol*.  The pipeline catches
//!   these at the symbol boundary, logs them and drops the symbol from the
//!   report.  They never abort the run.
//! * [`PublishError`] — the final delivery of the report failed.  This is the
//!   only run-level failure and maps to a `500` handler response.

use thiserror::Error;

// ─── Per-Symbol Errors ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ScreenError {
    /// Provider unreachable, unknown symbol, bad payload.
    #[error("Fetch failed for {symbol}: {reason}")]
    Fetch { symbol: String, reason: String },

    /// The provider answered but returned no usable closing prices.
    #[error("No price history returned for {0}")]
    EmptyHistory(String),

    /// Not enough points to define SMA200 for both today and yesterday.
    #[error("Insufficient history: have {have} points, need {need}")]
    InsufficientHistory { have: usize, need: usize },
}

impl ScreenError {
    pub fn fetch(symbol: &str, reason: impl std::fmt::Display) -> Self {
        ScreenError::Fetch {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        }
    }
}

// ─── Run-Level Errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PublishError {
    /// Transport failure talking to the notification topic.
    #[error("Report topic unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The topic answered with a non-2xx status.
    #[error("Report topic rejected message: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The destination itself is unusable (e.g. malformed URL).
    #[error("Report destination misconfigured: {0}")]
    Misconfigured(String),

    /// Writing the report to standard output failed.
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
