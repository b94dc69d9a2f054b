pub mod line_filter;
pub mod output;
pub mod record;

pub use line_filter::{filter_file, FilterOutcome, FilterProgress, LineFilter};
pub use output::{filtered_output_path, OutputFile, OUTPUT_SUFFIX};
