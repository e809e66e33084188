//! # report
//!
//! **Report Assembler** — orders rows by valuation bucket and renders the
//! fixed-width plain-text table that gets published.
//!
//! Rendering is a pure `&Report -> String` so it can be checked without any
//! provider or publisher in the loop.

use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::ValuationBucket;
use crate::models::ReportRow;

// ─── Report ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    rows: Vec<ReportRow>,
}

/// Per-bucket counts for the run log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub value:       usize,
    pub fair:        usize,
    pub expensive:   usize,
    pub loss_making: usize,
    /// Golden + death crosses today.
    pub crosses:     usize,
}

impl Report {
    /// Stable sort by bucket rank: rows inside a bucket keep fetch order.
    pub fn assemble(mut rows: Vec<ReportRow>) -> Self {
        rows.sort_by_key(|r| r.valuation.rank());
        Self { rows }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        let mut s = ReportSummary::default();
        for row in &self.rows {
            match row.valuation {
                ValuationBucket::Value => s.value += 1,
                ValuationBucket::Fair => s.fair += 1,
                ValuationBucket::Expensive => s.expensive += 1,
                ValuationBucket::LossMaking => s.loss_making += 1,
            }
            if row.signal.is_cross() {
                s.crosses += 1;
            }
        }
        s
    }
}

// ─── Rendering ────────────────────────────────────────────────────────────────

/// (header, minimum width, right-aligned)
const COLUMNS: [(&str, usize, bool); 8] = [
    ("Ticker", 8, false),
    ("Name", 25, false),
    ("Date", 10, false),
    ("Price", 10, true),
    ("Status", 7, false),
    ("Golden Cross Signal", 31, false),
    ("Fwd P/E", 8, true),
    ("Valuation", 18, false),
];

const GAP: &str = "  ";

/// Header, a rule, then one line per row.  An empty report is header-only.
pub fn render_table(report: &Report) -> String {
    let widths = column_widths(report);
    let mut out = String::new();

    let header: Vec<String> = COLUMNS.iter().map(|(h, _, _)| h.to_string()).collect();
    push_line(&mut out, &widths, &header);

    let rule_width = widths.iter().sum::<usize>() + GAP.len() * (widths.len() - 1);
    out.push_str(&"-".repeat(rule_width));
    out.push('\n');

    for row in report.rows() {
        let cells = vec![
            row.ticker.clone(),
            row.name.clone(),
            row.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", row.price),
            row.trend.to_string(),
            row.signal.to_string(),
            row.forward_pe_text(),
            row.valuation.to_string(),
        ];
        push_line(&mut out, &widths, &cells);
    }

    out
}

/// Ticker is the only unbounded cell; its column grows to the longest symbol.
fn column_widths(report: &Report) -> [usize; 8] {
    let mut widths = COLUMNS.map(|(_, w, _)| w);
    let longest_ticker = report
        .rows()
        .iter()
        .map(|r| r.ticker.chars().count())
        .max()
        .unwrap_or(0);
    widths[0] = widths[0].max(longest_ticker);
    widths
}

fn push_line(out: &mut String, widths: &[usize; 8], cells: &[String]) {
    let line = COLUMNS
        .iter()
        .zip(widths)
        .zip(cells)
        .map(|((&(_, _, right), &width), cell)| {
            if right {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect::<Vec<_>>()
        .join(GAP);
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Notification subject for a run on `today`.
pub fn report_subject(today: NaiveDate) -> String {
    format!("Stock Report: {}", today.format("%Y-%m-%d"))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
