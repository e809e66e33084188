//! # Crossover Screener — Scheduled Watchlist Report
//!
//! ## Flow
//!
//! ```text
//!  watchlist ──▶ Yahoo (2y daily closes + quoteSummary)
//!                   │
//!                   ▼
//!        SMA50 / SMA200 crossover  +  forward P/E bucket     (per symbol)
//!                   │
//!                   ▼
//!        Report (sorted by valuation) ──▶ render table ──▶ topic / stdout
//! ```
//!
//! ## Modes
//!
//! * **One-shot** (default) — run once, log the `{statusCode, body}` result and
//!   exit non-zero if delivery failed.  Suits cron / container schedulers.
//! * **Serve** (`BIND_ADDR` set) — an Axum server whose `POST /invoke` runs the
//!   job, for schedulers that trigger over HTTP.
//!
//! See [`config`] for the environment variables; `RUST_LOG` controls tracing
//! (default `crossover_screener=info`).

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod engine;
mod error;
mod handler;
mod market;
mod models;
mod pipeline;
mod publisher;
mod report;
mod routes;
mod state;

#[cfg(test)]
mod testing;

use config::Config;
use state::build_state;

// ─── Entry Point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env (optional — schedulers can inject real env vars) ────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging on stderr; stdout is reserved for the report ───
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env()
            .add_directive("crossover_screener=info".parse()?)
            .add_directive("reqwest=warn".parse()?))
        .init();

    info!(
        r#"

  ╔═══════════════════════════════════════════╗
  ║   CROSSOVER SCREENER                      ║
  ║   SMA50 / SMA200  ·  Forward P/E          ║
  ╚═══════════════════════════════════════════╝"#
    );

    let config = Config::from_env().context("Failed to load config")?;
    let state = build_state(&config).context("Failed to build runtime state")?;

    info!(
        symbols   = config.watchlist.len(),
        publisher = state.publisher.kind(),
        timeout   = ?config.fetch_timeout,
        "Screener configured"
    );

    // ── 3. Serve the HTTP trigger, or run once ───────────────────────────────
    if let Some(addr) = config.bind_addr {
        let app = routes::build_router(state);
        info!(?addr, "🚀 Trigger server starting");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;
        return Ok(());
    }

    let response = handler::handle(
        serde_json::Value::Null,
        serde_json::Value::Null,
        &state.watchlist,
        &state.provider,
        &state.publisher,
        chrono::Utc::now().date_naive(),
    )
    .await;

    info!(status = response.status_code, body = %response.body, "Run finished");

    if !response.is_success() {
        bail!("{} (status {})", response.body, response.status_code);
    }

    Ok(())
}
