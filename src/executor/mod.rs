//! Test execution module
//!
//! Request building, response normalization and the sequential runner.

mod normalize;
mod request;
mod runner;

pub use runner::TestRunner;
