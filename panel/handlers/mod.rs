pub mod index;
pub mod run_sse;
