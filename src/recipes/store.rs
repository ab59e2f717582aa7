//! Recipe Storage
//! Mission: Persist recipe documents; list fields are kept as JSON arrays

use crate::db::{Database, StoreError};
use crate::recipes::models::{NewRecipe, Recipe, RecipeChanges};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

const RECIPE_COLUMNS: &str = "id, category, name, description, ingredients, instructions";

/// Recipe collection backed by the `recipes` table
#[derive(Clone)]
pub struct RecipeStore {
    db: Database,
}

impl RecipeStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All recipes in insertion order
    pub async fn list(&self) -> Result<Vec<Recipe>, StoreError> {
        let conn = self.db.conn().lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY rowid ASC"
        ))?;

        let rows = stmt.query_map([], |row| Ok(read_row(row)))?;

        let mut recipes = Vec::new();
        for row in rows {
            recipes.push(row??);
        }
        Ok(recipes)
    }

    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<Recipe>, StoreError> {
        let conn = self.db.conn().lock().await;
        find_by_id(&conn, id)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Recipe>, StoreError> {
        let conn = self.db.conn().lock().await;
        conn.query_row(
            &format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE name = ?1"),
            params![name],
            |row| Ok(read_row(row)),
        )
        .optional()?
        .transpose()
    }

    /// Insert a recipe. Fails with `StoreError::Duplicate("name")` if the name is taken.
    pub async fn insert(&self, new_recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let recipe = Recipe {
            id: Uuid::new_v4(),
            category: new_recipe.category,
            name: new_recipe.name,
            description: new_recipe.description,
            ingredients: new_recipe.ingredients,
            instructions: new_recipe.instructions,
        };

        let conn = self.db.conn().lock().await;
        conn.execute(
            "INSERT INTO recipes (id, category, name, description, ingredients, instructions)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                recipe.id.to_string(),
                recipe.category,
                recipe.name,
                recipe.description,
                serde_json::to_string(&recipe.ingredients)?,
                serde_json::to_string(&recipe.instructions)?,
            ],
        )
        .map_err(|e| StoreError::from_write(e, "name"))?;

        info!("Created recipe: {} ({})", recipe.name, recipe.id);

        Ok(recipe)
    }

    /// Apply `changes` to the recipe with `id`. Returns `None` when no such recipe exists.
    pub async fn update_by_id(
        &self,
        id: &Uuid,
        changes: RecipeChanges,
    ) -> Result<Option<Recipe>, StoreError> {
        let conn = self.db.conn().lock().await;

        let Some(mut recipe) = find_by_id(&conn, id)? else {
            return Ok(None);
        };

        if let Some(category) = changes.category {
            recipe.category = category;
        }
        if let Some(name) = changes.name {
            recipe.name = name;
        }
        if let Some(description) = changes.description {
            recipe.description = description;
        }
        if let Some(ingredients) = changes.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(instructions) = changes.instructions {
            recipe.instructions = instructions;
        }

        conn.execute(
            "UPDATE recipes
             SET category = ?2, name = ?3, description = ?4, ingredients = ?5, instructions = ?6
             WHERE id = ?1",
            params![
                recipe.id.to_string(),
                recipe.category,
                recipe.name,
                recipe.description,
                serde_json::to_string(&recipe.ingredients)?,
                serde_json::to_string(&recipe.instructions)?,
            ],
        )
        .map_err(|e| StoreError::from_write(e, "name"))?;

        info!("Updated recipe: {}", recipe.id);

        Ok(Some(recipe))
    }

    /// Delete by id. Returns whether a recipe was removed.
    pub async fn delete_by_id(&self, id: &Uuid) -> Result<bool, StoreError> {
        let conn = self.db.conn().lock().await;
        let rows_affected =
            conn.execute("DELETE FROM recipes WHERE id = ?1", params![id.to_string()])?;

        if rows_affected > 0 {
            info!("Deleted recipe: {}", id);
        }

        Ok(rows_affected > 0)
    }
}

fn find_by_id(conn: &Connection, id: &Uuid) -> Result<Option<Recipe>, StoreError> {
    conn.query_row(
        &format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?1"),
        params![id.to_string()],
        |row| Ok(read_row(row)),
    )
    .optional()?
    .transpose()
}

fn read_row(row: &Row<'_>) -> Result<Recipe, StoreError> {
    let raw_id: String = row.get(0)?;
    let id = Uuid::parse_str(&raw_id)
        .map_err(|e| StoreError::Corrupt(format!("recipe id {raw_id:?}: {e}")))?;
    let ingredients: String = row.get(4)?;
    let instructions: String = row.get(5)?;

    Ok(Recipe {
        id,
        category: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        ingredients: serde_json::from_str(&ingredients)?,
        instructions: serde_json::from_str(&instructions)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (RecipeStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db = Database::connect(temp_file.path().to_str().unwrap()).unwrap();
        (RecipeStore::new(db), temp_file)
    }

    fn pancakes() -> NewRecipe {
        NewRecipe {
            category: "Breakfast".to_string(),
            name: "Pancakes".to_string(),
            description: "Fluffy".to_string(),
            ingredients: vec!["Flour".to_string(), "Milk".to_string(), "Eggs".to_string()],
            instructions: vec!["Mix".to_string(), "Fry".to_string()],
        }
    }

    #[tokio::test]
    async fn test_insert_preserves_list_order() {
        let (store, _temp) = create_test_store();

        let created = store.insert(pancakes()).await.unwrap();
        let loaded = store.find_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(loaded, created);
        assert_eq!(loaded.ingredients, vec!["Flour", "Milk", "Eggs"]);
        assert_eq!(loaded.instructions, vec!["Mix", "Fry"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected_without_state_change() {
        let (store, _temp) = create_test_store();

        store.insert(pancakes()).await.unwrap();
        let result = store.insert(pancakes()).await;

        assert!(matches!(result, Err(StoreError::Duplicate("name"))));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_and_find_by_name() {
        let (store, _temp) = create_test_store();
        assert!(store.list().await.unwrap().is_empty());

        let first = store.insert(pancakes()).await.unwrap();
        let second = store
            .insert(NewRecipe {
                name: "Waffles".to_string(),
                ..pancakes()
            })
            .await
            .unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all, vec![first.clone(), second]);

        let found = store.find_by_name("Pancakes").await.unwrap();
        assert_eq!(found, Some(first));
        assert!(store.find_by_name("Crepes").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_by_id() {
        let (store, _temp) = create_test_store();
        let created = store.insert(pancakes()).await.unwrap();

        let updated = store
            .update_by_id(
                &created.id,
                RecipeChanges {
                    description: Some("Extra fluffy".to_string()),
                    instructions: Some(vec!["Whisk".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.description, "Extra fluffy");
        assert_eq!(updated.instructions, vec!["Whisk"]);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.ingredients, created.ingredients);

        let missing = store
            .update_by_id(&Uuid::new_v4(), RecipeChanges::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let (store, _temp) = create_test_store();
        let created = store.insert(pancakes()).await.unwrap();

        assert!(!store.delete_by_id(&Uuid::new_v4()).await.unwrap());
        assert_eq!(store.list().await.unwrap().len(), 1);

        assert!(store.delete_by_id(&created.id).await.unwrap());
        assert!(store.find_by_id(&created.id).await.unwrap().is_none());
    }
}
