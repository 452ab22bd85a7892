//! HTTP module for planner calls
//!
//! Provides the transport used to reach the planning endpoint.

mod client;

pub use client::{HttpClient, HttpError, HttpResponse, PlanTransport};
