//! # models::fundamentals
//!
//! Snapshot of the provider's descriptive and valuation fields for a symbol.

use serde::{Deserialize, Serialize};

/// Shown when the provider has no name for a symbol.
pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    /// Display name.  `None` renders as [`UNKNOWN_NAME`].
    pub name:       Option<String>,
    /// Analyst forward P/E.  `None` when the provider has no estimate; may be
    /// negative for loss-making companies.
    pub forward_pe: Option<f64>,
}

impl Fundamentals {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_NAME)
    }
}
