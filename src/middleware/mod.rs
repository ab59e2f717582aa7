//! Middleware for observability.
//!
//! Request logging with latency and caller tracking.

pub mod logging;

pub use logging::request_logging;
