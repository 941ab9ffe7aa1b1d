pub mod panel;
pub mod pipeline;

pub use panel::{PanelSink, WriterSink};
pub use pipeline::{evaluate, prepare, report_memory, rng_for, run, train, Prepared, RunOutcome};
