use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::task::InstanceIdentity;

/// Visual progress for a suite run: one overall bar plus a spinner for the
/// instance currently running.
pub struct ProgressMonitor {
    multi: MultiProgress,
    overall: ProgressBar,
    current: Option<ProgressBar>,
    enabled: bool,
}

impl ProgressMonitor {
    /// `enabled` should be false for machine-readable output.
    pub fn new(total_instances: usize, enabled: bool) -> Self {
        if !enabled {
            return Self {
                multi: MultiProgress::new(),
                overall: ProgressBar::hidden(),
                current: None,
                enabled: false,
            };
        }

        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(total_instances as u64));
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} instances ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░  ");
        overall.set_style(style);
        overall.set_message("Starting...");

        Self {
            multi,
            overall,
            current: None,
            enabled: true,
        }
    }

    pub fn start_instance(&mut self, identity: &InstanceIdentity) {
        if !self.enabled {
            return;
        }

        let bar = self.multi.add(ProgressBar::new_spinner());
        let style = ProgressStyle::default_spinner()
            .template("  {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        bar.set_style(style);
        bar.set_message(format!("⏳ {identity}"));
        bar.enable_steady_tick(Duration::from_millis(100));
        self.current = Some(bar);
    }

    /// `success` is `None` for a failure record.
    pub fn complete_instance(&mut self, identity: &InstanceIdentity, success: Option<f64>, run_time: f64) {
        if !self.enabled {
            return;
        }

        if let Some(bar) = self.current.take() {
            let icon = match success {
                Some(s) if s > 0.0 => "✅",
                Some(_) => "➖",
                None => "❌",
            };
            bar.finish_with_message(format!("{icon} {identity} ({run_time:.1}s)"));
        }
        self.overall.inc(1);
    }

    pub fn skip_instance(&mut self) {
        if self.enabled {
            self.overall.inc(1);
        }
    }

    pub fn set_message(&self, msg: &str) {
        if self.enabled {
            self.overall.set_message(msg.to_string());
        }
    }

    pub fn finish(&self, correct: f64, total: usize) {
        if self.enabled {
            self.overall
                .finish_with_message(format!("done: {correct}/{total} successful"));
        }
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        if let Some(bar) = self.current.take() {
            bar.finish_and_clear();
        }
    }
}
