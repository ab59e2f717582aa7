use axum::{
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::{
    auth::{self, require_auth, require_owner, CredentialHasher, JwtHandler, UserStore},
    config::Config,
    db::Database,
    middleware::request_logging,
    recipes::{self, RecipeStore},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub recipes: RecipeStore,
    pub jwt_handler: Arc<JwtHandler>,
    pub hasher: CredentialHasher,
}

impl AppState {
    pub fn new(config: &Config, db: Database) -> Self {
        Self {
            users: UserStore::new(db.clone()),
            recipes: RecipeStore::new(db),
            jwt_handler: Arc::new(JwtHandler::new(
                config.secret_key.clone(),
                config.token_ttl_hours,
            )),
            hasher: CredentialHasher::new(config.bcrypt_cost),
        }
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let jwt_handler = state.jwt_handler.clone();
    let authenticated = middleware::from_fn_with_state(jwt_handler.clone(), require_auth);
    let owner_only = middleware::from_fn_with_state(jwt_handler, require_owner);

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/register", post(auth::api::register))
        .route("/login", post(auth::api::login));

    // Recipe collection needs any valid token; updates go through the owner gate
    let protected_routes = Router::new()
        .route(
            "/recipes",
            get(recipes::api::list_recipes)
                .post(recipes::api::create_recipe)
                .route_layer(authenticated.clone()),
        )
        .route(
            "/recipes/:id",
            delete(recipes::api::delete_recipe)
                .route_layer(authenticated)
                .merge(put(recipes::api::update_recipe).route_layer(owner_only.clone())),
        )
        .route("/user/:id", put(auth::api::update_user).route_layer(owner_only));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ===== Route Handlers =====

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}
