#[cfg(test)]
use argon2::password_hash::{PasswordHash, PasswordVerifier};
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use super::error::{UserError, UserResult};

/// Salted argon2 hash with the crate's default (fixed) parameters.
pub fn hash_password(plain: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            UserError::Hashing(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Hashes on the blocking pool so request tasks keep running.
pub async fn hash_password_blocking(plain: String) -> UserResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| UserError::Hashing(e.to_string()))?
}

#[cfg(test)]
pub fn verify_password(plain: &str, hash: &str) -> UserResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        UserError::Hashing(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("p1").unwrap();
        let b = hash_password("p1").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("p1", &a).unwrap());
        assert!(verify_password("p1", &b).unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, UserError::Hashing(_)));
    }

    #[tokio::test]
    async fn blocking_hash_verifies() {
        let hash = hash_password_blocking("p1".into()).await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("p1", &hash).unwrap());
    }
}
