pub mod output;
pub mod progress;
pub mod signals;

pub use output::{display_file_name, OutputFormatter, OutputMode};
pub use progress::ProgressManager;
pub use signals::GracefulShutdown;
