//! colparity - value-count parity checks between two table columns
//!
//! Pulls one column from a source table and one from a target table, counts
//! how often each distinct value occurs on both sides, and reports per value
//! whether the counts match.

pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod output;
pub mod reconcile;
pub mod runner;

pub use config::Config;
pub use error::{ParityError, Result};
pub use model::{CellValue, ColumnSample};
pub use reconcile::{reconcile, ComparisonRow, ComparisonTable, ParityReport};
pub use runner::run;
