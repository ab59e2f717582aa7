//! User Storage
//! Mission: Store and look up user accounts in the shared document store

use crate::auth::models::{NewUser, User, UserChanges};
use crate::db::{Database, StoreError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, phone, password, is_admin";

/// User collection backed by the `users` table
#[derive(Clone)]
pub struct UserStore {
    db: Database,
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get user by email (case-insensitive, emails are stored lowercased)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let conn = self.db.conn().lock().await;
        let email = email.trim().to_lowercase();
        query_one(
            &conn,
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            &email,
        )
    }

    /// Get user by id
    #[cfg(test)]
    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, StoreError> {
        let conn = self.db.conn().lock().await;
        query_one(
            &conn,
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            &id.to_string(),
        )
    }

    /// Insert a new user. Fails with `StoreError::Duplicate("email")` if the email is taken.
    pub async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.trim().to_string(),
            email: new_user.email.trim().to_lowercase(),
            phone: new_user.phone,
            password: new_user.password,
            is_admin: false,
        };

        let conn = self.db.conn().lock().await;
        conn.execute(
            "INSERT INTO users (id, name, email, phone, password, is_admin)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.phone,
                user.password,
                user.is_admin,
            ],
        )
        .map_err(|e| StoreError::from_write(e, "email"))?;

        info!("Created user: {} ({})", user.email, user.id);

        Ok(user)
    }

    /// Apply `changes` to the user with `id`. Returns `None` when no such user exists.
    pub async fn update_by_id(
        &self,
        id: &Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let conn = self.db.conn().lock().await;

        let Some(mut user) = query_one(
            &conn,
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            &id.to_string(),
        )?
        else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = changes.email {
            user.email = email.trim().to_lowercase();
        }
        if let Some(phone) = changes.phone {
            user.phone = Some(phone);
        }
        if let Some(password) = changes.password {
            user.password = password;
        }

        conn.execute(
            "UPDATE users SET name = ?2, email = ?3, phone = ?4, password = ?5 WHERE id = ?1",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.phone,
                user.password,
            ],
        )
        .map_err(|e| StoreError::from_write(e, "email"))?;

        info!("Updated user: {}", user.id);

        Ok(Some(user))
    }
}

fn query_one(conn: &Connection, sql: &str, key: &str) -> Result<Option<User>, StoreError> {
    let row = conn
        .query_row(sql, params![key], |row| Ok(read_row(row)))
        .optional()?;
    row.transpose()
}

fn read_row(row: &Row<'_>) -> Result<User, StoreError> {
    let raw_id: String = row.get(0)?;
    let id = Uuid::parse_str(&raw_id)
        .map_err(|e| StoreError::Corrupt(format!("user id {raw_id:?}: {e}")))?;

    Ok(User {
        id,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        password: row.get(4)?,
        is_admin: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (UserStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db = Database::connect(temp_file.path().to_str().unwrap()).unwrap();
        (UserStore::new(db), temp_file)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".to_string(),
            email: email.to_string(),
            phone: Some("1234567890".to_string()),
            password: "$2b$04$abcdefghijklmnopqrstuvwx".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_retrieve_user() {
        let (store, _temp) = create_test_store();

        let user = store.insert(new_user("Ada@Example.com")).await.unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert!(!user.is_admin);

        let by_email = store.find_by_email("ADA@example.com").await.unwrap();
        assert_eq!(by_email.as_ref(), Some(&user));

        let by_id = store.find_by_id(&user.id).await.unwrap();
        assert_eq!(by_id, Some(user));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (store, _temp) = create_test_store();

        store.insert(new_user("ada@example.com")).await.unwrap();
        let result = store.insert(new_user("ADA@example.com")).await;

        assert!(matches!(result, Err(StoreError::Duplicate("email"))));
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let (store, _temp) = create_test_store();

        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(store.find_by_id(&Uuid::new_v4()).await.unwrap().is_none());
        assert!(store
            .update_by_id(&Uuid::new_v4(), UserChanges::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let (store, _temp) = create_test_store();
        let user = store.insert(new_user("ada@example.com")).await.unwrap();

        let updated = store
            .update_by_id(
                &user.id,
                UserChanges {
                    name: Some("Ada Lovelace".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.email, user.email);
        assert_eq!(updated.phone, user.phone);
        assert_eq!(updated.password, user.password);

        let reloaded = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(reloaded, updated);
    }

    #[tokio::test]
    async fn test_update_to_taken_email_rejected() {
        let (store, _temp) = create_test_store();
        store.insert(new_user("first@example.com")).await.unwrap();
        let second = store.insert(new_user("second@example.com")).await.unwrap();

        let result = store
            .update_by_id(
                &second.id,
                UserChanges {
                    email: Some("first@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(StoreError::Duplicate("email"))));
        let unchanged = store.find_by_id(&second.id).await.unwrap().unwrap();
        assert_eq!(unchanged.email, "second@example.com");
    }
}
