use engine_core::progress::{ProgressReporter, ProgressStage};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A terminal progress bar on stderr. Starts as a spinner and becomes a bar
/// once the row count is known.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        BarProgress { bar }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarProgress {
    fn stage(&self, table: &str, stage: ProgressStage) {
        match stage {
            ProgressStage::Done => {}
            ProgressStage::Failed => self.bar.abandon_with_message(format!("{table}: failed")),
            other => self.bar.set_message(format!("{table}: {}", other.as_str().to_lowercase())),
        }
    }

    fn start(&self, table: &str, total_rows: u64) {
        self.bar.set_length(total_rows);
        self.bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} rows ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        self.bar.set_message(table.to_string());
    }

    fn advance(&self, rows: usize) {
        self.bar.inc(rows as u64);
    }

    fn finish(&self, _rows_fetched: usize) {
        self.bar.finish_and_clear();
    }
}
