//! Progress bar utilities for CSV processing.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for processing the survey CSVs.
pub fn create_csv_progress(total_csvs: usize, enabled: bool) -> Option<ProgressBar> {
    if !enabled || total_csvs == 0 {
        return None;
    }

    let pb = ProgressBar::new(total_csvs as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} CSVs ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    Some(pb)
}

/// Finish a progress bar with a message.
pub fn finish_progress(pb: Option<ProgressBar>, message: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(message.to_string());
    }
}

/// Increment a progress bar.
pub fn inc_progress(pb: Option<&ProgressBar>) {
    if let Some(pb) = pb {
        pb.inc(1);
    }
}
