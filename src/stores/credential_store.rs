use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use sea_orm::ConnectionTrait;

use crate::errors::{CredentialError, InternalError};
use crate::stores::user_store::{UserStore, UserWithRole};

/// Password hashing and credential verification
///
/// Hashes are Argon2id PHC strings with the application pepper supplied as
/// the Argon2 secret, so a leaked database alone cannot be brute-forced.
pub struct CredentialStore {
    password_pepper: String,
    users: UserStore,
}

impl CredentialStore {
    /// Create a new CredentialStore
    ///
    /// # Arguments
    /// * `password_pepper` - The secret key used for password hashing (from SecretManager)
    pub fn new(password_pepper: String) -> Self {
        Self {
            password_pepper,
            users: UserStore::new(),
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a plaintext password with a fresh salt
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("password_hash", e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored PHC string
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };
        match self.argon2() {
            Ok(argon2) => argon2.verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }

    /// Verify a username/password pair and return the user with their role
    ///
    /// Unknown usernames, users without a hash and wrong passwords are all
    /// reported as `InvalidCredentials`. A correct password on a deactivated
    /// account is `AccountInactive`.
    pub async fn verify_credentials(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
        password: &str,
    ) -> Result<UserWithRole, InternalError> {
        let (user, role) = self
            .users
            .find_by_username(conn, username)
            .await?
            .ok_or(CredentialError::InvalidCredentials)?;

        let stored_hash = user
            .password_hash
            .as_deref()
            .ok_or(CredentialError::InvalidCredentials)?;

        if !self.verify_password(password, stored_hash) {
            return Err(CredentialError::InvalidCredentials.into());
        }

        if !user.is_active {
            return Err(CredentialError::AccountInactive(user.username).into());
        }

        Ok((user, role))
    }

    /// Hash and store a new password for the user
    pub async fn set_password(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        password: &str,
    ) -> Result<(), InternalError> {
        let hash = self.hash_password(password)?;
        self.users.set_password_hash(conn, user_id, hash).await
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::user_store::NewUser;
    use crate::test::utils::setup_test_db;

    async fn setup() -> (sea_orm::DatabaseConnection, CredentialStore, String) {
        let db = setup_test_db().await;
        let store = CredentialStore::new("test-pepper-for-unit-tests".to_string());
        let user = UserStore::new()
            .create(
                &db,
                NewUser {
                    username: "jdoe".to_string(),
                    email: "jdoe@example.com".to_string(),
                    is_active: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        (db, store, user.id)
    }

    #[test]
    fn test_hash_is_argon2id_and_verifies() {
        let store = CredentialStore::new("test-pepper-for-unit-tests".to_string());
        let hash = store.hash_password("correct horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(store.verify_password("correct horse", &hash));
        assert!(!store.verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_pepper_is_part_of_the_hash() {
        let store = CredentialStore::new("test-pepper-for-unit-tests".to_string());
        let other = CredentialStore::new("a-different-pepper-value".to_string());
        let hash = store.hash_password("correct horse").unwrap();

        assert!(!other.verify_password("correct horse", &hash));
    }

    #[tokio::test]
    async fn test_verify_credentials_succeeds_after_set_password() {
        let (db, store, user_id) = setup().await;
        store.set_password(&db, &user_id, "s3cret-pass").await.unwrap();

        let (user, _) = store.verify_credentials(&db, "jdoe", "s3cret-pass").await.unwrap();
        assert_eq!(user.id, user_id);
    }

    #[tokio::test]
    async fn test_user_without_password_cannot_log_in() {
        let (db, store, _) = setup().await;
        let result = store.verify_credentials(&db, "jdoe", "anything").await;
        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user() {
        let (db, store, user_id) = setup().await;
        store.set_password(&db, &user_id, "s3cret-pass").await.unwrap();

        assert!(matches!(
            store.verify_credentials(&db, "jdoe", "nope").await,
            Err(InternalError::Credential(CredentialError::InvalidCredentials))
        ));
        assert!(matches!(
            store.verify_credentials(&db, "ghost", "s3cret-pass").await,
            Err(InternalError::Credential(CredentialError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn test_inactive_user_is_rejected() {
        let (db, store, user_id) = setup().await;
        store.set_password(&db, &user_id, "s3cret-pass").await.unwrap();
        UserStore::new()
            .update(
                &db,
                &user_id,
                crate::stores::user_store::UserChanges {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let result = store.verify_credentials(&db, "jdoe", "s3cret-pass").await;
        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::AccountInactive(_)))
        ));
    }
}
