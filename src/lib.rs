//! Complaint status dashboard: derives category, status and department
//! columns from an uploaded complaint table and tabulates Open/Resolved
//! counts with closure percentages for every drill-down view.

pub mod classify;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod reports;
pub mod session;
pub mod tabulate;
pub mod types;
pub mod util;

pub use error::{DashboardError, Result};
pub use session::{OfficerQuery, Session, SummaryQuery};
pub use tabulate::{tabulate, Dimension, GroupBy, RecordFilter, SummaryTable};
