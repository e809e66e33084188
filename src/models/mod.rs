//! Domain models shared across the screener.

pub mod fundamentals;
pub mod history;
pub mod row;

pub use fundamentals::Fundamentals;
pub use history::{PriceHistory, PricePoint};
pub use row::ReportRow;
