//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{User, UserCreate};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select(id.clone()).await?;
        Ok(user)
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let username_owned = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        // Check duplicate username
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        // Hash password
        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    username = $username,
                    hash_pass = $hash_pass,
                    is_moderator = $is_moderator,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("username", data.username))
            .bind(("hash_pass", hash_pass))
            .bind(("is_moderator", data.is_moderator))
            .bind(("created_at", now_millis()))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Replace a user's password
    pub async fn set_password(&self, id: &RecordId, password: &str) -> RepoResult<()> {
        let hash_pass = User::hash_password(password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET hash_pass = $hash_pass RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("hash_pass", hash_pass))
            .await?;

        result
            .take::<Option<User>>(0)?
            .map(|_| ())
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Make sure a moderator account exists
    ///
    /// Creates it when missing; an existing user with that name is promoted
    /// and its password reset to the configured one.
    pub async fn ensure_moderator(&self, username: &str, password: &str) -> RepoResult<User> {
        match self.find_by_username(username).await? {
            Some(existing) => {
                let id = existing
                    .id
                    .clone()
                    .ok_or_else(|| RepoError::Database("User without id".to_string()))?;
                self.set_password(&id, password).await?;
                if !existing.is_moderator {
                    self.base
                        .db()
                        .query("UPDATE $thing SET is_moderator = true")
                        .bind(("thing", id.clone()))
                        .await?
                        .check()?;
                }
                self.find_by_id(&id)
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
            }
            None => {
                self.create(UserCreate {
                    username: username.to_string(),
                    password: password.to_string(),
                    is_moderator: true,
                })
                .await
            }
        }
    }
}
