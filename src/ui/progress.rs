use crate::filter::FilterProgress;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        pb.set_message(message.to_string());
        pb
    }

    /// Byte-based bar for the filter pass; falls back to a spinner when the size is unknown.
    pub fn create_bytes_progress(&self, total_bytes: u64, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        if total_bytes == 0 {
            return self.create_spinner(message);
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_bytes));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes:>7}/{total_bytes:7} {msg}"
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn clear(&self) {
        if self.enabled {
            self.multi_progress.clear().ok();
        }
    }
}

pub fn update_filter_progress(pb: &ProgressBar, progress: &FilterProgress) {
    pb.set_position(progress.bytes_read);

    let eta = progress.estimated_remaining();
    let eta = if eta.as_secs() > 0 {
        format!(" (ETA: {})", format_duration(eta))
    } else {
        String::new()
    };

    pb.set_message(format!(
        "{} lines read, {} matched{}",
        progress.lines_read, progress.lines_matched, eta
    ));
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_duration(duration));
    pb.finish_with_message(final_message);
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_progress_bars() {
        let manager = ProgressManager::new(false);

        assert!(manager.create_bytes_progress(100, "filtering").is_hidden());
        assert!(manager.create_spinner("loading").is_hidden());
    }

    #[test]
    fn test_unknown_size_uses_spinner() {
        let manager = ProgressManager::new(true);
        let pb = manager.create_bytes_progress(0, "filtering");
        assert!(pb.length().is_none());
        assert_eq!(pb.message(), "filtering");
    }

    #[test]
    fn test_update_filter_progress_message() {
        let pb = ProgressBar::hidden();
        let mut progress = FilterProgress::new(1000);
        progress.lines_read = 12;
        progress.lines_matched = 3;
        progress.bytes_read = 1000;

        update_filter_progress(&pb, &progress);

        assert_eq!(pb.position(), 1000);
        assert_eq!(pb.message(), "12 lines read, 3 matched");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "61m 1s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }
}
