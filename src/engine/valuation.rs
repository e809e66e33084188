//! # engine::valuation
//!
//! **Valuation Classifier** — buckets forward P/E into four categories.
//!
//! | Forward P/E        | Bucket               |
//! |--------------------|----------------------|
//! | absent, ≤ 0, NaN   | N/A (Loss Making)    |
//! | 0 < pe < 15        | Value (Cheap)        |
//! | 15 ≤ pe ≤ 30       | Fair                 |
//! | pe > 30            | Expensive (Growth)   |

use std::fmt;

use serde::Serialize;

pub const CHEAP_BELOW: f64 = 15.0;
pub const EXPENSIVE_ABOVE: f64 = 30.0;

/// Variants are declared in report display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ValuationBucket {
    Value,
    Fair,
    Expensive,
    LossMaking,
}

impl ValuationBucket {
    pub fn label(&self) -> &'static str {
        match self {
            ValuationBucket::Value => "Value (Cheap)",
            ValuationBucket::Fair => "Fair",
            ValuationBucket::Expensive => "Expensive (Growth)",
            ValuationBucket::LossMaking => "N/A (Loss Making)",
        }
    }

    /// Position in the report; lower sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            ValuationBucket::Value => 0,
            ValuationBucket::Fair => 1,
            ValuationBucket::Expensive => 2,
            ValuationBucket::LossMaking => 3,
        }
    }
}

impl fmt::Display for ValuationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify_valuation(forward_pe: Option<f64>) -> ValuationBucket {
    match forward_pe {
        Some(pe) if pe > 0.0 && pe < CHEAP_BELOW => ValuationBucket::Value,
        Some(pe) if (CHEAP_BELOW..=EXPENSIVE_ABOVE).contains(&pe) => ValuationBucket::Fair,
        Some(pe) if pe > EXPENSIVE_ABOVE => ValuationBucket::Expensive,
        _ => ValuationBucket::LossMaking,
    }
}
