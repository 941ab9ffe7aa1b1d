pub mod dense;

pub use dense::{Gradients, Layer};
