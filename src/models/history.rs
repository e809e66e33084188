//! # models::history
//!
//! Daily closing prices for one symbol, oldest first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day's close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date:  NaiveDate,
    pub close: f64,
}

/// Chronologically ascending sequence of [`PricePoint`]s, one per trading day.
///
/// Only finite closes are admitted; a provider gap (`null` close) simply does
/// not produce a point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    points: Vec<PricePoint>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a close.  Non-finite values are ignored and a second close for
    /// the most recent date replaces the first (intraday refresh of "today").
    pub fn push(&mut self, date: NaiveDate, close: f64) {
        if !close.is_finite() {
            return;
        }
        match self.points.last_mut() {
            Some(last) if last.date == date => last.close = close,
            Some(last) if last.date > date => {}
            _ => self.points.push(PricePoint { date, close }),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}
