//! Release assembly: upstream intake, category normalization, output.

mod assemble;
mod types;
mod writer;

pub use assemble::assemble;
pub use types::{Category, DatasetInfo, OutputDataset, UpstreamDataset};
pub use writer::{read_upstream, write_dataset, write_sequences};
