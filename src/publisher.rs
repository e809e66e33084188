//! # publisher — Report delivery
//!
//! Called exactly once per run with the rendered table.  No retries: a failed
//! delivery becomes a `500` handler response and the next scheduled run
//! starts from scratch.
//!
//! * [`TopicPublisher`] — POSTs `{ "subject", "message" }` JSON to the
//!   notification topic in `REPORT_TOPIC_URL`.
//! * [`StdoutPublisher`] — local runs without a topic; prints the table.

use std::{future::Future, io::Write, time::Duration};

use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::error::PublishError;

pub trait ReportPublisher {
    fn publish(
        &self,
        subject: &str,
        body: &str,
    ) -> impl Future<Output = Result<(), PublishError>> + Send;
}

// ─── Topic ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct TopicMessage<'a> {
    subject: &'a str,
    message: &'a str,
}

pub struct TopicPublisher {
    client:  reqwest::Client,
    url:     String,
    token:   Option<String>,
    timeout: Duration,
}

impl TopicPublisher {
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            token,
            timeout,
        }
    }
}

impl ReportPublisher for TopicPublisher {
    async fn publish(&self, subject: &str, body: &str) -> Result<(), PublishError> {
        let url = reqwest::Url::parse(&self.url).map_err(|e| {
            PublishError::Misconfigured(format!("invalid REPORT_TOPIC_URL '{}': {e}", self.url))
        })?;

        info!(url = %url, subject, bytes = body.len(), "Publishing report...");

        let mut request = self
            .client
            .post(url)
            .json(&TopicMessage { subject, message: body })
            .timeout(self.timeout);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(PublishError::Rejected { status, body });
        }

        info!("Report accepted by topic ✅");
        Ok(())
    }
}

// ─── Stdout ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct StdoutPublisher;

impl ReportPublisher for StdoutPublisher {
    async fn publish(&self, subject: &str, body: &str) -> Result<(), PublishError> {
        write_report(&mut std::io::stdout().lock(), subject, body)?;
        Ok(())
    }
}

/// Subject line, a blank line, then the table as rendered.
fn write_report<W: Write>(out: &mut W, subject: &str, body: &str) -> std::io::Result<()> {
    writeln!(out, "{subject}\n")?;
    write!(out, "{body}")?;
    out.flush()
}

// ─── Runtime Selection ────────────────────────────────────────────────────────

/// The publisher chosen from config: topic when a URL is set, stdout otherwise.
pub enum Publisher {
    Topic(TopicPublisher),
    Stdout(StdoutPublisher),
}

impl Publisher {
    pub fn from_config(config: &Config) -> Self {
        match &config.topic_url {
            Some(url) => Publisher::Topic(TopicPublisher::new(
                url.clone(),
                config.topic_token.clone(),
                config.fetch_timeout,
            )),
            None => {
                tracing::warn!("REPORT_TOPIC_URL not set — report will be printed to stdout");
                Publisher::Stdout(StdoutPublisher)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Publisher::Topic(_) => "topic",
            Publisher::Stdout(_) => "stdout",
        }
    }
}

impl ReportPublisher for Publisher {
    async fn publish(&self, subject: &str, body: &str) -> Result<(), PublishError> {
        match self {
            Publisher::Topic(p) => p.publish(subject, body).await,
            Publisher::Stdout(p) => p.publish(subject, body).await,
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
