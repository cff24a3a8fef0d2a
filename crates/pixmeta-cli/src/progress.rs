use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Progress reporter for CLI operations
pub struct ProgressReporter {
    multi: MultiProgress,
    show_progress: bool,
}

impl ProgressReporter {
    pub fn new(show_progress: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            show_progress,
        }
    }

    /// Create progress bar for a batch
    pub fn create_bar(&self, total: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = self.multi.add(ProgressBar::new(total));
        let bar_style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(bar_style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Some(pb)
    }

    /// Create spinner for indeterminate operations
    pub fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = self.multi.add(ProgressBar::new_spinner());
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(spinner_style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));

        Some(pb)
    }

    /// Print around the bar without tearing it
    pub fn suspend<F: FnOnce()>(pb: &Option<ProgressBar>, f: F) {
        match pb {
            Some(pb) => pb.suspend(f),
            None => f(),
        }
    }

    pub fn set_position(pb: &Option<ProgressBar>, position: u64) {
        if let Some(pb) = pb {
            pb.set_position(position);
        }
    }

    /// Finish progress bar with success message
    pub fn finish_bar(pb: &Option<ProgressBar>, message: &str) {
        if let Some(pb) = pb {
            pb.finish_with_message(format!("{} {}", style("✓").green(), message));
        }
    }

    /// Finish progress bar with error message
    pub fn finish_bar_error(pb: &Option<ProgressBar>, message: &str) {
        if let Some(pb) = pb {
            pb.finish_with_message(format!("{} {}", style("✗").red(), message));
        }
    }
}
