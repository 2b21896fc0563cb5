//! File enumeration and input selection.

mod enumerate;
mod select;

pub use enumerate::enumerate_files;
pub use select::{Selection, select_inputs};
