use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::info;

use super::error::UserResult;
use super::repo_types::{NewUser, User, UserChanges};

/// Row-level persistence for users. Callers hand in already-hashed passwords.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: NewUser) -> UserResult<User>;

    /// All users, ordered by id.
    async fn list(&self) -> UserResult<Vec<User>>;

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>>;

    /// Returns `None` and writes nothing when the id is absent.
    async fn update(&self, id: i64, changes: UserChanges) -> UserResult<Option<User>>;

    /// Returns the row as it was before removal.
    async fn delete(&self, id: i64) -> UserResult<Option<User>>;

    /// Removes every user with one of the given emails; returns the count.
    async fn delete_by_emails(&self, emails: &[String]) -> UserResult<u64>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: NewUser) -> UserResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password, created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await?;
        info!(user_id = user.id, "user created");
        Ok(user)
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at, updated_at
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> UserResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password = COALESCE($4, password),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, password, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .fetch_optional(&self.db)
        .await?;
        if let Some(u) = &user {
            info!(user_id = u.id, "user updated");
        }
        Ok(user)
    }

    async fn delete(&self, id: i64) -> UserResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            DELETE FROM users
            WHERE id = $1
            RETURNING id, name, email, password, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        if let Some(u) = &user {
            info!(user_id = u.id, "user deleted");
        }
        Ok(user)
    }

    async fn delete_by_emails(&self, emails: &[String]) -> UserResult<u64> {
        let res = sqlx::query(r#"DELETE FROM users WHERE email = ANY($1)"#)
            .bind(emails)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }
}

#[derive(Default)]
struct MemoryTable {
    next_id: i64,
    rows: BTreeMap<i64, User>,
}

/// Process-local store for tests and database-less runs.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    table: Arc<RwLock<MemoryTable>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: NewUser) -> UserResult<User> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: table.next_id,
            name: user.name,
            email: user.email,
            password: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.id, user.clone());
        info!(user_id = user.id, "user created");
        Ok(user)
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn update(&self, id: i64, changes: UserChanges) -> UserResult<Option<User>> {
        let mut table = self.table.write().await;
        let Some(user) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply(user);
        user.updated_at = OffsetDateTime::now_utc();
        info!(user_id = id, "user updated");
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> UserResult<Option<User>> {
        let mut table = self.table.write().await;
        let removed = table.rows.remove(&id);
        if removed.is_some() {
            info!(user_id = id, "user deleted");
        }
        Ok(removed)
    }

    async fn delete_by_emails(&self, emails: &[String]) -> UserResult<u64> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|_, u| !emails.contains(&u.email));
        Ok((before - table.rows.len()) as u64)
    }
}
