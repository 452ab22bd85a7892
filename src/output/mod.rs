//! Output module
//!
//! Writes the result array.

mod writer;

pub use writer::ResultWriter;
