pub mod schedule;
pub mod sgd;

pub use schedule::LearningRateSchedule;
pub use sgd::Sgd;
