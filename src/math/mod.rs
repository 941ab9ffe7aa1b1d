pub mod matrix;
pub mod memory;

pub use matrix::Matrix;
pub use memory::{memory, MemoryUsage};
