//! # handler — scheduler entry point
//!
//! `handle(event, context, ...)` is what a scheduler invokes.  The event and
//! context are opaque and ignored; the result is the `{statusCode, body}` pair
//! the invoker expects.
//!
//! | Outcome            | statusCode | body                        |
//! |--------------------|------------|-----------------------------|
//! | report published   | `200`      | `Report Sent Successfully`  |
//! | publish failed     | `500`      | `Failed to send report`     |
//!
//! Per-symbol failures never change the status; they only shrink the report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::market::MarketDataProvider;
use crate::pipeline::run_screen;
use crate::publisher::ReportPublisher;
use crate::report::{render_table, report_subject};

pub const SENT_BODY: &str = "Report Sent Successfully";
pub const FAILED_BODY: &str = "Failed to send report";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body:        String,
}

impl HandlerResponse {
    pub fn sent() -> Self {
        Self { status_code: 200, body: SENT_BODY.to_string() }
    }

    pub fn failed() -> Self {
        Self { status_code: 500, body: FAILED_BODY.to_string() }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Run one screen over `watchlist` and publish the rendered report once.
pub async fn handle<P, R>(
    _event: serde_json::Value,
    _context: serde_json::Value,
    watchlist: &[String],
    provider: &P,
    publisher: &R,
    today: NaiveDate,
) -> HandlerResponse
where
    P: MarketDataProvider,
    R: ReportPublisher,
{
    let run_id = Uuid::new_v4();
    let span = info_span!("screen_run", %run_id);

    async move {
        info!(symbols = watchlist.len(), %today, "📈 Screen run starting");

        let report = run_screen(provider, watchlist).await;
        let body = render_table(&report);
        let subject = report_subject(today);

        match publisher.publish(&subject, &body).await {
            Ok(()) => {
                info!(subject = %subject, rows = report.len(), "✅ Report sent");
                HandlerResponse::sent()
            }
            Err(e) => {
                error!(error = %e, "❌ Failed to send report");
                HandlerResponse::failed()
            }
        }
    }
    .instrument(span)
    .await
}

// ─── Tests ────────────────────────────────────────────────────────────────────
