//! Authentication Module
//! Mission: Secure API access with hashed credentials and JWT tokens

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod user_store;

pub use jwt::JwtHandler;
pub use middleware::{require_auth, require_owner};
pub use password::CredentialHasher;
pub use user_store::UserStore;
