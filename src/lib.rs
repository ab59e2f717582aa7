//! Recipe Book Backend Library
//!
//! Recipe management API with user registration and JWT authentication.
//! The binary in `main.rs` only wires configuration, logging and the listener;
//! everything routable lives here so integration tests can drive the router.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod recipes;

pub use api::{create_router, AppState};
pub use config::Config;
pub use db::Database;
pub use error::{ApiError, ApiResult};
