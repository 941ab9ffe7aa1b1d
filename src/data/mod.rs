pub mod dataset;
pub mod normalize;

pub use dataset::{shuffle_combo, Dataset};
pub use normalize::{normalize, MinMax, Normalized};
