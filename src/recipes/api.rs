//! Recipe API Endpoints
//! Mission: List, create, update and delete recipes for authenticated callers

use crate::{
    api::{parse_id, AppState},
    auth::middleware::AuthUser,
    db::StoreError,
    error::{ApiError, ApiResult},
    recipes::models::{CreateRecipeRequest, Recipe, UpdateRecipeRequest},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

const RECIPE_EXISTS: &str = "Recipe already exists";
const RECIPE_NOT_FOUND: &str = "Recipe not found";

/// GET /recipes
pub async fn list_recipes(State(state): State<AppState>) -> ApiResult<Json<Vec<Recipe>>> {
    let recipes = state.recipes.list().await?;
    Ok(Json(recipes))
}

/// POST /recipes
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    payload: Result<Json<CreateRecipeRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Recipe>)> {
    let Json(payload) = payload?;
    let new_recipe = payload.validate().map_err(ApiError::BadRequest)?;

    if state
        .recipes
        .find_by_name(&new_recipe.name)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest(RECIPE_EXISTS.to_string()));
    }

    let recipe = state
        .recipes
        .insert(new_recipe)
        .await
        .map_err(duplicate_name)?;

    info!("Recipe {} created by {}", recipe.id, claims.email);

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// DELETE /recipes/:id
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, RECIPE_NOT_FOUND)?;

    if !state.recipes.delete_by_id(&id).await? {
        return Err(ApiError::NotFound(RECIPE_NOT_FOUND.to_string()));
    }

    Ok(Json(json!({ "message": "Recipe deleted" })))
}

/// PUT /recipes/:id
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateRecipeRequest>, JsonRejection>,
) -> ApiResult<Json<Recipe>> {
    let id = parse_id(&id, RECIPE_NOT_FOUND)?;
    let Json(payload) = payload?;
    let changes = payload.validate().map_err(ApiError::BadRequest)?;

    if state.recipes.find_by_id(&id).await?.is_none() {
        return Err(ApiError::NotFound(RECIPE_NOT_FOUND.to_string()));
    }

    if let Some(name) = &changes.name {
        if let Some(existing) = state.recipes.find_by_name(name).await? {
            if existing.id != id {
                return Err(ApiError::BadRequest(RECIPE_EXISTS.to_string()));
            }
        }
    }

    let recipe = state
        .recipes
        .update_by_id(&id, changes)
        .await
        .map_err(duplicate_name)?
        .ok_or_else(|| ApiError::NotFound(RECIPE_NOT_FOUND.to_string()))?;

    Ok(Json(recipe))
}

fn duplicate_name(err: StoreError) -> ApiError {
    match err {
        StoreError::Duplicate(_) => ApiError::BadRequest(RECIPE_EXISTS.to_string()),
        other => other.into(),
    }
}
