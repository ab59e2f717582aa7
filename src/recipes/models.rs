//! Recipe Models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored recipe document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    pub id: Uuid,
    pub category: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

/// Fields required to insert a recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub category: String,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeChanges {
    pub category: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
}

/// Body of `POST /recipes`
#[derive(Debug, Default, Deserialize)]
pub struct CreateRecipeRequest {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl CreateRecipeRequest {
    pub fn validate(self) -> Result<NewRecipe, String> {
        Ok(NewRecipe {
            category: required_text("category", self.category)?,
            name: required_text("name", self.name)?,
            description: required_text("description", self.description)?,
            ingredients: self.ingredients,
            instructions: self.instructions,
        })
    }
}

/// Body of `PUT /recipes/:id`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRecipeRequest {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub instructions: Option<Vec<String>>,
}

impl UpdateRecipeRequest {
    pub fn validate(self) -> Result<RecipeChanges, String> {
        Ok(RecipeChanges {
            category: self
                .category
                .map(|v| required_text("category", Some(v)))
                .transpose()?,
            name: self.name.map(|v| required_text("name", Some(v))).transpose()?,
            description: self
                .description
                .map(|v| required_text("description", Some(v)))
                .transpose()?,
            ingredients: self.ingredients,
            instructions: self.instructions,
        })
    }
}

fn required_text(field: &str, value: Option<String>) -> Result<String, String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(format!("\"{}\" is not allowed to be empty", field)),
        None => Err(format!("\"{}\" is required", field)),
    }
}
