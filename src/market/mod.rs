//! # market — Market Data Fetcher
//!
//! The screener only needs two things per symbol: a two-year daily close
//! history and a fundamentals snapshot.  [`MarketDataProvider`] is the seam;
//! [`yahoo::YahooProvider`] is the production implementation and tests plug
//! in an in-memory one.

use std::future::Future;

use crate::error::ScreenError;
use crate::models::{Fundamentals, PriceHistory};

pub mod yahoo;

pub use yahoo::YahooProvider;

pub trait MarketDataProvider {
    /// Trailing two years of daily closes.  An unknown symbol may come back
    /// as an error *or* as an empty history; callers treat both as a skip.
    fn fetch_history(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<PriceHistory, ScreenError>> + Send;

    fn fetch_fundamentals(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<Fundamentals, ScreenError>> + Send;
}
