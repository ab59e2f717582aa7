//! Recipes Module
//! Mission: The recipe collection and its HTTP endpoints

pub mod api;
pub mod models;
pub mod store;

pub use models::Recipe;
pub use store::RecipeStore;
