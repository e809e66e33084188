//! # models::row
//!
//! [`ReportRow`] — one line of the screen report, built from a symbol's
//! signal reading and fundamentals.

use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::{classify_valuation, CrossoverSignal, SignalReading, Trend, ValuationBucket};
use crate::models::Fundamentals;

/// Names longer than this are cut and suffixed with [`ELLIPSIS`].
pub const NAME_KEEP: usize = 23;
pub const ELLIPSIS: &str = "..";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub ticker:     String,
    /// At most `NAME_KEEP + 2` characters.
    pub name:       String,
    pub date:       NaiveDate,
    /// Last close, rounded to cents.
    pub price:      f64,
    pub trend:      Trend,
    pub signal:     CrossoverSignal,
    /// Rounded to 2 dp; `None` renders as "N/A".
    pub forward_pe: Option<f64>,
    pub valuation:  ValuationBucket,
}

impl ReportRow {
    pub fn build(ticker: &str, reading: &SignalReading, fundamentals: &Fundamentals) -> Self {
        Self {
            ticker:     ticker.to_string(),
            name:       short_name(fundamentals.display_name()),
            date:       reading.as_of,
            price:      round2(reading.last_close),
            trend:      reading.trend(),
            signal:     reading.signal,
            forward_pe: fundamentals.forward_pe.filter(|pe| pe.is_finite()).map(round2),
            valuation:  classify_valuation(fundamentals.forward_pe),
        }
    }

    pub fn forward_pe_text(&self) -> String {
        match self.forward_pe {
            Some(pe) => format!("{pe:.2}"),
            None => "N/A".to_string(),
        }
    }
}

/// Truncate a display name to 23 characters plus "..".
pub fn short_name(name: &str) -> String {
    if name.chars().count() > NAME_KEEP {
        let mut short: String = name.chars().take(NAME_KEEP).collect();
        short.push_str(ELLIPSIS);
        short
    } else {
        name.to_string()
    }
}

#[inline]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MovingAverages;

    fn make_reading(signal: CrossoverSignal) -> SignalReading {
        let avg = MovingAverages { sma50: 1.0, sma200: 1.0 };
        SignalReading {
            as_of:      NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
            last_close: 123.456,
            today:      avg,
            yesterday:  avg,
            signal,
        }
    }

    #[test]
    fn test_thirty_char_name_truncated() {
        let name = "ABCDEFGHIJKLMNOPQRSTUVWXYZ1234";
        assert_eq!(name.len(), 30);
        let short = short_name(name);
        assert_eq!(short, "ABCDEFGHIJKLMNOPQRSTUVW..");
        assert_eq!(short.chars().count(), 25);
    }

    #[test]
    fn test_short_names_untouched() {
        assert_eq!(short_name("Rocket Lab USA, Inc."), "Rocket Lab USA, Inc.");
        let exactly = "A".repeat(NAME_KEEP);
        assert_eq!(short_name(&exactly), exactly);
        assert_eq!(short_name(&"B".repeat(24)), format!("{}..", "B".repeat(23)));
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let name = "é".repeat(30);
        assert_eq!(short_name(&name).chars().count(), 25);
    }

    #[test]
    fn test_build_rounds_and_classifies() {
        let f = Fundamentals { name: None, forward_pe: Some(22.4567) };
        let row = ReportRow::build("GOOG", &make_reading(CrossoverSignal::GoldenCross), &f);

        assert_eq!(row.name, "Unknown");
        assert_eq!(row.price, 123.46);
        assert_eq!(row.forward_pe, Some(22.46));
        assert_eq!(row.forward_pe_text(), "22.46");
        assert_eq!(row.valuation, ValuationBucket::Fair);
        assert_eq!(row.trend, Trend::Bullish);
    }

    #[test]
    fn test_missing_pe_renders_na() {
        let row = ReportRow::build(
            "NBIS",
            &make_reading(CrossoverSignal::NoChange(Trend::Bearish)),
            &Fundamentals::default(),
        );
        assert_eq!(row.forward_pe_text(), "N/A");
        assert_eq!(row.valuation, ValuationBucket::LossMaking);
        assert_eq!(row.trend, Trend::Bearish);
    }
}
