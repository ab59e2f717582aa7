pub mod routes;

pub use routes::{create_router, AppState};

use crate::error::{ApiError, ApiResult};
use uuid::Uuid;

/// Parse a path id into the store identity. An id that is not a UUID names no record.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(not_found.to_string()))
}
