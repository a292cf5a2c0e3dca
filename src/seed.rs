use tracing::info;

use crate::users::error::UserResult;
use crate::users::password::hash_password_blocking;
use crate::users::repo::UserStore;
use crate::users::repo_types::NewUser;

pub const DEMO_PASSWORD: &str = "password123";

const DEMO_USERS: [(&str, &str); 3] = [
    ("João Silva", "joao.silva@example.com"),
    ("Maria Oliveira", "maria.oliveira@example.com"),
    ("Pedro Souza", "pedro.souza@example.com"),
];

/// Inserts the demo users. All three share one hash of `password`.
pub async fn up(store: &dyn UserStore, password: &str) -> UserResult<()> {
    let hash = hash_password_blocking(password.to_string()).await?;
    for (name, email) in DEMO_USERS {
        let user = store
            .insert(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: hash.clone(),
            })
            .await?;
        info!(user_id = user.id, %email, "seeded demo user");
    }
    Ok(())
}

/// Removes the demo users inserted by [`up`].
pub async fn down(store: &dyn UserStore) -> UserResult<u64> {
    let emails: Vec<String> = DEMO_USERS.iter().map(|(_, e)| e.to_string()).collect();
    let removed = store.delete_by_emails(&emails).await?;
    info!(removed, "removed demo users");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::password::verify_password;
    use crate::users::repo::InMemoryUserStore;

    #[tokio::test]
    async fn up_inserts_three_users_with_shared_hash() {
        let store = InMemoryUserStore::new();
        up(&store, DEMO_PASSWORD).await.unwrap();

        let users = store.list().await.unwrap();
        assert_eq!(users.len(), 3);
        assert!(users.iter().all(|u| u.password == users[0].password));
        assert_ne!(users[0].password, DEMO_PASSWORD);
        assert!(verify_password(DEMO_PASSWORD, &users[0].password).unwrap());
    }

    #[tokio::test]
    async fn down_reverts_up_and_keeps_other_users() {
        let store = InMemoryUserStore::new();
        store
            .insert(NewUser {
                name: "Keep".into(),
                email: "keep@x.com".into(),
                password_hash: "$argon2id$x".into(),
            })
            .await
            .unwrap();
        up(&store, "other").await.unwrap();

        assert_eq!(down(&store).await.unwrap(), 3);
        let left = store.list().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].email, "keep@x.com");
    }
}
