pub mod filter_report;
pub mod summary;

pub use filter_report::FilterReport;
pub use summary::{format_summary, group_thousands, percentage, Summary};
