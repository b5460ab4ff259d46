pub mod memory;

pub use memory::{IndexHandle, ProjectIndex};
