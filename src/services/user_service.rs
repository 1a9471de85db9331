use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::services::auth_service::user_profile;
use crate::services::validation::{optional_text, required_text};
use crate::stores::{CredentialStore, NewUser, UserChanges, UserStore};
use crate::types::dto::auth::UserProfile;
use crate::types::dto::users::{CreateUserRequest, UpdateUserRequest};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Admin management of user accounts
pub struct UserService {
    db: DatabaseConnection,
    user_store: UserStore,
    credential_store: Arc<CredentialStore>,
}

impl UserService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store,
            credential_store: Arc::clone(&app_data.credential_store),
        }
    }

    fn check_password(password: &str) -> Result<(), InternalError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(InternalError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<UserProfile>, InternalError> {
        let users = self.user_store.list(&self.db).await?;
        Ok(users.into_iter().map(user_profile).collect())
    }

    pub async fn get(&self, id: &str) -> Result<UserProfile, InternalError> {
        Ok(user_profile(self.user_store.get(&self.db, id).await?))
    }

    /// Create a user; username and email are required, username must be unused
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserProfile, InternalError> {
        let username = required_text(&request.username, "Username")?;
        let email = required_text(&request.email, "Email")?;

        let password_hash = match optional_text(request.password) {
            Some(password) => {
                Self::check_password(&password)?;
                Some(self.credential_store.hash_password(&password)?)
            }
            None => None,
        };

        let user = self
            .user_store
            .create(
                &self.db,
                NewUser {
                    username,
                    email,
                    first_name: optional_text(request.first_name),
                    last_name: optional_text(request.last_name),
                    role_id: optional_text(request.role_id),
                    position_id: optional_text(request.position_id),
                    department_id: optional_text(request.department_id),
                    is_active: request.is_active.unwrap_or(true),
                    password_hash,
                },
            )
            .await?;

        tracing::info!("Created user '{}' ({})", user.username, user.id);
        self.get(&user.id).await
    }

    /// Partial update; a missing id is reported before any validation
    pub async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<UserProfile, InternalError> {
        self.user_store.get(&self.db, id).await?;

        let email = match request.email {
            Some(email) => Some(required_text(&email, "Email")?),
            None => None,
        };

        let user = self
            .user_store
            .update(
                &self.db,
                id,
                UserChanges {
                    email,
                    first_name: optional_text(request.first_name),
                    last_name: optional_text(request.last_name),
                    role_id: optional_text(request.role_id),
                    position_id: optional_text(request.position_id),
                    department_id: optional_text(request.department_id),
                    is_active: request.is_active,
                },
            )
            .await?;

        tracing::info!("Updated user '{}' ({})", user.username, user.id);
        self.get(&user.id).await
    }

    pub async fn set_password(&self, id: &str, password: &str) -> Result<(), InternalError> {
        Self::check_password(password)?;
        self.credential_store.set_password(&self.db, id, password).await?;

        tracing::info!("Password set for user {}", id);
        Ok(())
    }

    /// Set a password by username; used by the CLI
    pub async fn set_password_for_username(&self, username: &str, password: &str) -> Result<(), InternalError> {
        let (user, _) = self
            .user_store
            .find_by_username(&self.db, username.trim())
            .await?
            .ok_or_else(|| InternalError::not_found("User", username))?;
        self.set_password(&user.id, password).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), InternalError> {
        self.user_store.delete(&self.db, id).await?;
        tracing::info!("Deleted user {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{ensure_role, setup_test_app_data};
    use crate::types::internal::RoleName;

    fn request(username: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_requires_username_and_email() {
        let service = UserService::new(setup_test_app_data().await);

        let mut missing_email = request("jdoe");
        missing_email.email = " ".to_string();
        assert!(matches!(service.create(missing_email).await, Err(InternalError::Validation(_))));
        assert!(matches!(service.create(request("  ")).await, Err(InternalError::Validation(_))));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_role_and_password() {
        let app_data = setup_test_app_data().await;
        let director = ensure_role(&app_data.db, RoleName::Director).await;
        let service = UserService::new(app_data);

        let mut body = request("dir");
        body.role_id = Some(director.id);
        body.password = Some("long-enough".to_string());

        let profile = service.create(body).await.unwrap();
        assert_eq!(profile.role_name.as_deref(), Some("Director"));
        assert!(profile.has_password);
        assert!(profile.is_active);
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let service = UserService::new(setup_test_app_data().await);
        let profile = service.create(request("jdoe")).await.unwrap();

        let result = service.set_password(&profile.id, "short").await;
        assert!(matches!(result, Err(InternalError::Validation(_))));
    }

    #[tokio::test]
    async fn test_deactivate_via_update() {
        let service = UserService::new(setup_test_app_data().await);
        let profile = service.create(request("jdoe")).await.unwrap();

        let updated = service
            .update(
                &profile.id,
                UpdateUserRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.email, "jdoe@example.com");
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found_before_validation() {
        let service = UserService::new(setup_test_app_data().await);

        let result = service
            .update(
                "no-such-user",
                UpdateUserRequest {
                    email: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(InternalError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_set_password_for_unknown_username() {
        let service = UserService::new(setup_test_app_data().await);
        let result = service.set_password_for_username("ghost", "long-enough").await;
        assert!(matches!(result, Err(InternalError::NotFound { .. })));
    }
}
