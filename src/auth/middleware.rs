//! Authentication Middleware
//! Mission: Protect API endpoints with JWT validation and ownership checks

use crate::auth::{jwt::JwtHandler, models::Claims};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Auth middleware that requires any valid token.
pub async fn require_auth(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = authenticate(&jwt_handler, req.headers())?;

    // Add claims to request extensions so handlers can access them
    req.extensions_mut().insert(claims.clone());

    Ok(with_caller(next.run(req).await, claims))
}

/// Auth middleware that additionally requires the caller to be the `:id` in the path.
pub async fn require_owner(
    State(jwt_handler): State<Arc<JwtHandler>>,
    Path(params): Path<HashMap<String, String>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = authenticate(&jwt_handler, req.headers())?;

    let target = params.get("id").map(String::as_str).unwrap_or_default();
    authorize_owner(&claims, target)?;

    req.extensions_mut().insert(claims.clone());

    Ok(with_caller(next.run(req).await, claims))
}

/// Expose the caller on the response for the request logger.
fn with_caller(mut response: Response, claims: Claims) -> Response {
    response.extensions_mut().insert(claims);
    response
}

/// Resolve the caller's claims from the `Authorization` header.
pub fn authenticate(jwt_handler: &JwtHandler, headers: &HeaderMap) -> Result<Claims, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat)?;

    let token = bearer_token(value)?;

    jwt_handler.validate_token(token).map_err(|e| {
        warn!("Rejected token: {}", e);
        AuthError::InvalidToken
    })
}

/// Pull the token out of `Bearer <token>`.
///
/// The value is split on whitespace; the scheme must be `Bearer` and the
/// second part is the token. Anything after it is ignored.
pub fn bearer_token(header_value: &str) -> Result<&str, AuthError> {
    let mut parts = header_value.split_whitespace();

    let scheme = parts.next().ok_or(AuthError::MissingToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidFormat);
    }

    parts.next().ok_or(AuthError::InvalidFormat)
}

/// Both ids are compared as canonical UUIDs; anything unparseable cannot match.
pub fn authorize_owner(claims: &Claims, target_id: &str) -> Result<(), AuthError> {
    let caller = Uuid::parse_str(&claims.id).map_err(|_| AuthError::Forbidden)?;
    let target = Uuid::parse_str(target_id).map_err(|_| AuthError::Forbidden)?;

    if caller != target {
        warn!(caller = %caller, target = %target, "Ownership check failed");
        return Err(AuthError::Forbidden);
    }

    Ok(())
}

/// Extractor for the claims attached by `require_auth` / `require_owner`.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or(AuthError::MissingToken)
    }
}

/// Auth error types
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidFormat,
    InvalidToken,
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "No token provided"),
            AuthError::InvalidFormat => (
                StatusCode::UNAUTHORIZED,
                "Invalid authorization format. Use: Bearer {token}",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "You are not allowed"),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn handler() -> JwtHandler {
        JwtHandler::new("test-secret-key-12345".to_string(), 24)
    }

    fn claims_for(id: &str) -> Claims {
        Claims {
            id: id.to_string(),
            name: "test".to_string(),
            email: "test@example.com".to_string(),
            iat: 0,
            exp: 0,
        }
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_auth_error_responses() {
        let missing = AuthError::MissingToken.into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let invalid_format = AuthError::InvalidFormat.into_response();
        assert_eq!(invalid_format.status(), StatusCode::UNAUTHORIZED);

        let invalid_token = AuthError::InvalidToken.into_response();
        assert_eq!(invalid_token.status(), StatusCode::UNAUTHORIZED);

        let forbidden = AuthError::Forbidden.into_response();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Ok("abc.def.ghi"));
        assert_eq!(bearer_token("bearer   abc"), Ok("abc"));
        assert_eq!(bearer_token(""), Err(AuthError::MissingToken));
        assert_eq!(bearer_token("   "), Err(AuthError::MissingToken));
        assert_eq!(bearer_token("Bearer"), Err(AuthError::InvalidFormat));
        assert_eq!(bearer_token("abc.def.ghi"), Err(AuthError::InvalidFormat));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), Err(AuthError::InvalidFormat));
        assert_eq!(bearer_token("Bearer a b"), Ok("a"));
    }

    #[test]
    fn test_authenticate_rejects_bad_headers() {
        let jwt = handler();

        assert_eq!(
            authenticate(&jwt, &HeaderMap::new()),
            Err(AuthError::MissingToken)
        );
        assert_eq!(
            authenticate(&jwt, &headers_with("")),
            Err(AuthError::MissingToken)
        );
        assert_eq!(
            authenticate(&jwt, &headers_with("Token abc")),
            Err(AuthError::InvalidFormat)
        );
        assert_eq!(
            authenticate(&jwt, &headers_with("Bearer not.a.jwt")),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_authenticate_accepts_valid_token() {
        let jwt = handler();
        let id = Uuid::new_v4().to_string();
        let token = jwt.issue(&id, "Ada", "ada@example.com").unwrap();

        let claims = authenticate(&jwt, &headers_with(&format!("Bearer {}", token))).unwrap();
        assert_eq!(claims.id, id);
    }

    #[test]
    fn test_owner_check_normalizes_ids() {
        let id = Uuid::new_v4();
        let claims = claims_for(&id.to_string());

        assert_eq!(authorize_owner(&claims, &id.to_string()), Ok(()));
        // Same UUID in another textual form still matches.
        assert_eq!(
            authorize_owner(&claims, &id.simple().to_string().to_uppercase()),
            Ok(())
        );
    }

    #[test]
    fn test_owner_check_rejects_other_ids() {
        let claims = claims_for(&Uuid::new_v4().to_string());

        assert_eq!(
            authorize_owner(&claims, &Uuid::new_v4().to_string()),
            Err(AuthError::Forbidden)
        );
        assert_eq!(
            authorize_owner(&claims, "not-a-uuid"),
            Err(AuthError::Forbidden)
        );
        assert_eq!(
            authorize_owner(&claims_for("not-a-uuid"), "not-a-uuid"),
            Err(AuthError::Forbidden)
        );
    }
}
