//! Authentication API Endpoints
//! Mission: Provide registration, login and account update endpoints

use crate::{
    api::{parse_id, AppState},
    auth::models::{
        LoginRequest, LoginResponse, NewUser, RegisterRequest, UpdateUserRequest, User,
        UserChanges,
    },
    db::StoreError,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

const BAD_CREDENTIALS: &str = "Username or Password is not correct!";

/// Register endpoint - POST /register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(payload) = payload?;
    let registration = payload.validate().map_err(ApiError::BadRequest)?;

    if state
        .users
        .find_by_email(&registration.email)
        .await?
        .is_some()
    {
        warn!("Registration rejected, email taken: {}", registration.email);
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password = state.hasher.hash(&registration.password)?;

    let user = state
        .users
        .insert(NewUser {
            name: registration.name,
            email: registration.email,
            phone: registration.phone,
            password,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => ApiError::Conflict("User already exists".to_string()),
            other => other.into(),
        })?;

    info!("User registered: {} ({})", user.email, user.id);

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login endpoint - POST /login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(payload) = payload?;
    let (email, password) = payload.validate().map_err(ApiError::BadRequest)?;

    info!("Login attempt: {}", email);

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!("Failed login attempt, unknown email: {}", email);
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    };

    if !state.hasher.verify(&password, &user.password) {
        warn!("Failed login attempt, bad password: {}", email);
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let token = state.jwt_handler.generate_token(&user)?;

    info!("Login successful: {} ({})", user.email, user.id);

    Ok(Json(LoginResponse { token }))
}

/// Update own account - PUT /user/:id (owner only)
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let id = parse_id(&id, "User not found")?;
    let Json(payload) = payload?;
    let update = payload.validate().map_err(ApiError::BadRequest)?;

    let password = update
        .password
        .map(|plain| state.hasher.hash(&plain))
        .transpose()?;

    let changes = UserChanges {
        name: update.name,
        email: update.email,
        phone: update.phone,
        password,
    };

    let user = state
        .users
        .update_by_id(&id, changes)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => ApiError::Conflict("Email already in use".to_string()),
            other => other.into(),
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}
