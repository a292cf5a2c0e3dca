use std::sync::Arc;

use tracing::debug;

use super::dto::{NewUserInput, UpdateUserRequest};
use super::error::UserResult;
use super::password::hash_password_blocking;
use super::repo::UserStore;
use super::repo_types::{NewUser, User, UserChanges};

/// User operations exposed to the HTTP layer. Every write path hashes the
/// password before it reaches the store.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: NewUserInput) -> UserResult<User> {
        let password_hash = hash_password_blocking(input.password).await?;
        self.store
            .insert(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
            })
            .await
    }

    pub async fn list_all(&self) -> UserResult<Vec<User>> {
        self.store.list().await
    }

    pub async fn get_by_id(&self, id: i64) -> UserResult<Option<User>> {
        self.store.find_by_id(id).await
    }

    pub async fn update(&self, id: i64, changes: UpdateUserRequest) -> UserResult<Option<User>> {
        let changes = changes.normalized();
        if changes.is_empty() {
            debug!(user_id = id, "update without changes");
            return self.store.find_by_id(id).await;
        }
        // Skip the hash work when the row is gone anyway.
        if changes.password.is_some() && self.store.find_by_id(id).await?.is_none() {
            return Ok(None);
        }
        let password_hash = match changes.password {
            Some(plain) => Some(hash_password_blocking(plain).await?),
            None => None,
        };
        self.store
            .update(
                id,
                UserChanges {
                    name: changes.name,
                    email: changes.email,
                    password_hash,
                },
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> UserResult<Option<User>> {
        self.store.delete(id).await
    }
}
