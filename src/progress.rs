//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while the two sides are being streamed
#[derive(Debug)]
pub struct ProgressReporter {
    rows_pb: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Create the spinner for a comparison run
    pub fn new_for_check() -> Self {
        Self {
            rows_pb: Some(create_spinner("Comparing rows...")),
        }
    }

    /// Create a reporter that draws nothing
    pub fn new_minimal() -> Self {
        Self { rows_pb: None }
    }

    /// Update the number of rows walked so far
    pub fn update_rows(&self, compared: u64) {
        if let Some(pb) = &self.rows_pb {
            pb.set_message(format!("Comparing rows... {} compared", compared));
        }
    }

    /// Finish with a closing message
    pub fn finish(&mut self, message: &str) {
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        // Clean up silently if the run ended before finish
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
