use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(120);

/// Spinners and bars for the load, analyze and render stages
pub struct ProgressReporter {
    multi_progress: Arc<MultiProgress>,
    stage: Option<ProgressBar>,
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: Arc::new(MultiProgress::new()),
            stage: None,
            enabled,
        }
    }

    pub fn start_loading(&mut self, path: &Path) {
        self.stage = self.create_spinner(&format!("Loading {}", path.display()));
    }

    pub fn start_analysis(&mut self, total_stages: usize) {
        if !self.enabled {
            return;
        }

        let pb = self
            .multi_progress
            .add(ProgressBar::new(total_stages as u64));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message("Analyzing");
        pb.enable_steady_tick(TICK);
        self.stage = Some(pb);
    }

    /// Mark the start of one analysis stage
    pub fn advance_analysis(&self, stage: &str) {
        if let Some(ref pb) = self.stage {
            pb.inc(1);
            pb.set_message(stage.replace('_', " "));
        }
    }

    pub fn start_rendering(&mut self, chart_count: usize) {
        self.stage = self.create_spinner(&format!("Rendering {chart_count} charts"));
    }

    pub fn finish_stage(&mut self, message: &str) {
        if let Some(pb) = self.stage.take() {
            pb.finish_with_message(format!("✓ {message}"));
        }
    }

    pub fn finish_and_clear(&mut self) {
        self.stage = None;
        if self.enabled {
            self.multi_progress.clear().unwrap_or(());
        }
    }

    /// Create a simple spinner for indeterminate progress
    pub fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(TICK);
        Some(pb)
    }
}
