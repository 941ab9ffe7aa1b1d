pub mod network;
pub mod spec;
pub mod summary;

pub use network::Network;
pub use spec::{LayerSpec, NetworkSpec};
pub use summary::{ModelSummary, SummaryRow};
