//! # engine::signal
//!
//! **Signal Engine** — SMA50 / SMA200 crossover detection.
//!
//! ```text
//!              yesterday            today
//!  golden?  sma50 > sma200  →  sma50 > sma200
//!  ───────────────────────────────────────────────
//!              false       →       true      BUY  (Golden Cross)
//!              true        →       false     SELL (Death Cross)
//!              same        →       same      No Change (Bullish | Bearish)
//! ```
//!
//! The comparison is strict: `sma50 == sma200` counts as *not* golden on
//! either day.  Only the two most recent days are ever looked at.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::ScreenError;
use crate::models::PriceHistory;

pub const SHORT_WINDOW: usize = 50;
pub const LONG_WINDOW: usize = 200;

/// SMA200 for *yesterday* needs one point before today's window starts.
pub const MIN_HISTORY: usize = LONG_WINDOW + 1;

// ─── Types ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Bullish,
    Bearish,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Bullish => "Bullish",
            Trend::Bearish => "Bearish",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrossoverSignal {
    /// SMA50 moved strictly above SMA200 today.
    GoldenCross,
    /// SMA50 fell to or below SMA200 today.
    DeathCross,
    /// Same side as yesterday.
    NoChange(Trend),
}

impl CrossoverSignal {
    /// Today's side of the crossover, whatever happened yesterday.
    pub fn trend(&self) -> Trend {
        match self {
            CrossoverSignal::GoldenCross => Trend::Bullish,
            CrossoverSignal::DeathCross => Trend::Bearish,
            CrossoverSignal::NoChange(trend) => *trend,
        }
    }

    pub fn is_cross(&self) -> bool {
        !matches!(self, CrossoverSignal::NoChange(_))
    }
}

impl fmt::Display for CrossoverSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossoverSignal::GoldenCross => f.write_str("BUY SIGNAL (Golden Cross Today)"),
            CrossoverSignal::DeathCross => f.write_str("SELL SIGNAL (Death Cross Today)"),
            CrossoverSignal::NoChange(trend) => write!(f, "No Change ({trend})"),
        }
    }
}

/// The two averages for one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MovingAverages {
    pub sma50:  f64,
    pub sma200: f64,
}

impl MovingAverages {
    #[inline]
    pub fn is_golden(&self) -> bool {
        self.sma50 > self.sma200
    }
}

/// Everything the report needs from the price series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalReading {
    pub as_of:      NaiveDate,
    pub last_close: f64,
    pub today:      MovingAverages,
    pub yesterday:  MovingAverages,
    pub signal:     CrossoverSignal,
}

impl SignalReading {
    pub fn trend(&self) -> Trend {
        self.signal.trend()
    }
}

// ─── Core ─────────────────────────────────────────────────────────────────────

/// Compute today's and yesterday's SMAs and classify the crossover.
pub fn compute_signal(history: &PriceHistory) -> Result<SignalReading, ScreenError> {
    let closes = history.closes();
    let last = match history.last() {
        Some(p) if closes.len() >= MIN_HISTORY => *p,
        _ => {
            return Err(ScreenError::InsufficientHistory {
                have: closes.len(),
                need: MIN_HISTORY,
            })
        }
    };

    let today_idx = closes.len() - 1;
    let today = averages_at(&closes, today_idx)?;
    let yesterday = averages_at(&closes, today_idx - 1)?;
    let signal = classify_signal(today, yesterday);

    debug!(
        sma50 = today.sma50,
        sma200 = today.sma200,
        signal = %signal,
        "Signal computed"
    );

    Ok(SignalReading {
        as_of: last.date,
        last_close: last.close,
        today,
        yesterday,
        signal,
    })
}

/// First match wins: golden cross, death cross, otherwise steady trend.
pub fn classify_signal(today: MovingAverages, yesterday: MovingAverages) -> CrossoverSignal {
    match (today.is_golden(), yesterday.is_golden()) {
        (true, false) => CrossoverSignal::GoldenCross,
        (false, true) => CrossoverSignal::DeathCross,
        (true, true) => CrossoverSignal::NoChange(Trend::Bullish),
        (false, false) => CrossoverSignal::NoChange(Trend::Bearish),
    }
}

fn averages_at(closes: &[f64], end: usize) -> Result<MovingAverages, ScreenError> {
    let insufficient = || ScreenError::InsufficientHistory {
        have: closes.len(),
        need: MIN_HISTORY,
    };
    Ok(MovingAverages {
        sma50:  sma(closes, SHORT_WINDOW, end).ok_or_else(insufficient)?,
        sma200: sma(closes, LONG_WINDOW, end).ok_or_else(insufficient)?,
    })
}

/// Unweighted mean of the `window` closes ending at index `end` (inclusive).
fn sma(closes: &[f64], window: usize, end: usize) -> Option<f64> {
    if window == 0 || end >= closes.len() || end + 1 < window {
        return None;
    }
    let slice = &closes[end + 1 - window..=end];
    Some(slice.iter().sum::<f64>() / window as f64)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::make_history;

    fn ma(sma50: f64, sma200: f64) -> MovingAverages {
        MovingAverages { sma50, sma200 }
    }

    /// 201 closes at 100 with today's close replaced.
    fn flat_then(today: f64) -> Vec<f64> {
        let mut closes = vec![100.0; MIN_HISTORY];
        closes[MIN_HISTORY - 1] = today;
        closes
    }

    #[test]
    fn test_sma_window() {
        let closes = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(sma(&closes, 2, 3), Some(3.5));
        assert_eq!(sma(&closes, 4, 3), Some(2.5));
        assert_eq!(sma(&closes, 5, 3), None);
        assert_eq!(sma(&closes, 2, 4), None);
    }

    #[test]
    fn test_classify_golden_cross() {
        assert_eq!(classify_signal(ma(101.0, 100.0), ma(99.0, 100.0)), CrossoverSignal::GoldenCross);
    }

    #[test]
    fn test_classify_death_cross() {
        assert_eq!(classify_signal(ma(99.0, 100.0), ma(101.0, 100.0)), CrossoverSignal::DeathCross);
    }

    #[test]
    fn test_classify_no_change() {
        assert_eq!(
            classify_signal(ma(105.0, 100.0), ma(104.0, 100.0)),
            CrossoverSignal::NoChange(Trend::Bullish)
        );
        assert_eq!(
            classify_signal(ma(95.0, 100.0), ma(96.0, 100.0)),
            CrossoverSignal::NoChange(Trend::Bearish)
        );
    }

    #[test]
    fn test_equality_is_not_golden() {
        // equal → above: counts as a golden cross
        assert_eq!(classify_signal(ma(100.5, 100.0), ma(100.0, 100.0)), CrossoverSignal::GoldenCross);
        // above → equal: counts as a death cross
        assert_eq!(classify_signal(ma(100.0, 100.0), ma(100.5, 100.0)), CrossoverSignal::DeathCross);
        // below → equal: still bearish, never a golden cross
        assert_eq!(
            classify_signal(ma(100.0, 100.0), ma(99.5, 100.0)),
            CrossoverSignal::NoChange(Trend::Bearish)
        );
        // equal → below: still bearish, never a death cross
        assert_eq!(
            classify_signal(ma(99.5, 100.0), ma(100.0, 100.0)),
            CrossoverSignal::NoChange(Trend::Bearish)
        );
    }

    #[test]
    fn test_compute_golden_cross_from_flat_series() {
        // yesterday: both averages exactly 100 (not golden)
        // today: sma50 = 102.0, sma200 = 100.5
        let reading = compute_signal(&make_history(&flat_then(200.0))).unwrap();
        assert_eq!(reading.yesterday, ma(100.0, 100.0));
        assert_eq!(reading.today, ma(102.0, 100.5));
        assert_eq!(reading.signal, CrossoverSignal::GoldenCross);
        assert_eq!(reading.trend(), Trend::Bullish);
        assert_eq!(reading.last_close, 200.0);
    }

    #[test]
    fn test_compute_drop_from_equality_is_not_death_cross() {
        let reading = compute_signal(&make_history(&flat_then(50.0))).unwrap();
        assert_eq!(reading.signal, CrossoverSignal::NoChange(Trend::Bearish));
    }

    #[test]
    fn test_compute_death_cross() {
        // 150 closes at 100, then 50 at 101: yesterday sma50 = 101 > sma200 = 100.25
        // today's close 50: sma50 = 99.98 < sma200 = 100.0
        let mut closes = vec![100.0; 150];
        closes.extend(std::iter::repeat(101.0).take(50));
        closes.push(50.0);

        let reading = compute_signal(&make_history(&closes)).unwrap();
        assert!(reading.yesterday.is_golden());
        assert!(!reading.today.is_golden());
        assert_eq!(reading.signal, CrossoverSignal::DeathCross);
        assert_eq!(reading.trend(), Trend::Bearish);
    }

    #[test]
    fn test_compute_steady_trends() {
        let rising: Vec<f64> = (1..=260).map(f64::from).collect();
        let reading = compute_signal(&make_history(&rising)).unwrap();
        assert_eq!(reading.signal, CrossoverSignal::NoChange(Trend::Bullish));

        let falling: Vec<f64> = (1..=260).rev().map(f64::from).collect();
        let reading = compute_signal(&make_history(&falling)).unwrap();
        assert_eq!(reading.signal, CrossoverSignal::NoChange(Trend::Bearish));
    }

    #[test]
    fn test_flat_series_is_bearish() {
        let reading = compute_signal(&make_history(&[42.0; 300])).unwrap();
        assert_eq!(reading.signal, CrossoverSignal::NoChange(Trend::Bearish));
    }

    #[test]
    fn test_insufficient_history() {
        let err = compute_signal(&make_history(&[100.0; LONG_WINDOW])).unwrap_err();
        assert!(matches!(
            err,
            ScreenError::InsufficientHistory { have: 200, need: 201 }
        ));

        let err = compute_signal(&PriceHistory::new()).unwrap_err();
        assert!(matches!(err, ScreenError::InsufficientHistory { have: 0, .. }));
    }

    #[test]
    fn test_signal_text() {
        assert_eq!(CrossoverSignal::GoldenCross.to_string(), "BUY SIGNAL (Golden Cross Today)");
        assert_eq!(CrossoverSignal::DeathCross.to_string(), "SELL SIGNAL (Death Cross Today)");
        assert_eq!(CrossoverSignal::NoChange(Trend::Bullish).to_string(), "No Change (Bullish)");
    }
}
