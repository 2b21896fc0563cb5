//! Processing pipeline components.

mod progress;
mod run;

pub use progress::{create_csv_progress, finish_progress, inc_progress};
pub use run::{RunOptions, RunSummary, run_pipeline};
