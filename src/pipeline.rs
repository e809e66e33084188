//! # pipeline — one screen run over the watchlist
//!
//! ```text
//! for symbol in watchlist (in order, one at a time):
//!   1. fetch history          ── error / empty      → log + skip
//!   2. compute SMA crossover  ── < 201 points       → log + skip
//!   3. fetch fundamentals     ── error              → log + skip
//!   4. build ReportRow
//! assemble → Report (stable-sorted by valuation)
//! ```
//!
//! Nothing that goes wrong for one symbol reaches the next one.

use tracing::{debug, error, info, warn};

use crate::engine::compute_signal;
use crate::error::ScreenError;
use crate::market::MarketDataProvider;
use crate::models::ReportRow;
use crate::report::Report;

/// Fetch, analyse and classify one symbol.
pub async fn screen_symbol<P: MarketDataProvider>(
    provider: &P,
    symbol: &str,
) -> Result<ReportRow, ScreenError> {
    let history = provider.fetch_history(symbol).await?;
    if history.is_empty() {
        return Err(ScreenError::EmptyHistory(symbol.to_string()));
    }

    let reading = compute_signal(&history)?;

    let fundamentals = provider.fetch_fundamentals(symbol).await?;

    Ok(ReportRow::build(symbol, &reading, &fundamentals))
}

/// Screen every symbol in order and assemble the report from the successes.
pub async fn run_screen<P: MarketDataProvider>(provider: &P, watchlist: &[String]) -> Report {
    let mut rows = Vec::with_capacity(watchlist.len());

    for symbol in watchlist {
        match screen_symbol(provider, symbol).await {
            Ok(row) => {
                debug!(
                    symbol    = %symbol,
                    signal    = %row.signal,
                    valuation = %row.valuation,
                    "Symbol screened"
                );
                rows.push(row);
            }
            Err(e @ ScreenError::EmptyHistory(_)) => {
                warn!(symbol = %symbol, "{e} — skipping");
            }
            Err(e) => {
                error!(symbol = %symbol, error = %e, "Symbol failed — skipping");
            }
        }
    }

    let report = Report::assemble(rows);
    let summary = report.summary();
    info!(
        screened    = report.len(),
        skipped     = watchlist.len() - report.len(),
        value       = summary.value,
        fair        = summary.fair,
        expensive   = summary.expensive,
        loss_making = summary.loss_making,
        crosses     = summary.crosses,
        "Screen complete"
    );

    report
}

// ─── Tests ────────────────────────────────────────────────────────────────────
