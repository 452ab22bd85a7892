//! Utilities
//!
//! Logging setup and timing helpers.

mod gelf;
mod logger;
mod timer;

pub use gelf::GelfLayer;
pub use logger::{init_logger, LogLevel};
pub use timer::Timer;
