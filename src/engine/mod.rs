//! Per-symbol analysis: trend crossover and valuation bucket.

pub mod signal;
pub mod valuation;

pub use signal::{compute_signal, CrossoverSignal, MovingAverages, SignalReading, Trend};
pub use valuation::{classify_valuation, ValuationBucket};
