use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::{CredentialError, InternalError};
use crate::services::TokenService;
use crate::stores::{CredentialStore, UserStore, UserWithRole};
use crate::types::dto::auth::{LoginResponse, UserProfile};
use crate::types::internal::{Caller, RoleName};

/// Build the public profile for a user and its (optional) role row
pub fn user_profile((user, role): UserWithRole) -> UserProfile {
    UserProfile {
        full_name: user.full_name(),
        role_name: role.map(|r| r.name),
        has_password: user.password_hash.is_some(),
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        role_id: user.role_id,
        position_id: user.position_id,
        department_id: user.department_id,
        is_active: user.is_active,
    }
}

/// Login and bearer-token resolution
///
/// Tokens only carry the user id that matters; every request re-reads the
/// user so deactivation and role changes apply immediately.
pub struct AuthService {
    db: DatabaseConnection,
    credential_store: Arc<CredentialStore>,
    token_service: Arc<TokenService>,
    user_store: UserStore,
}

impl AuthService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            credential_store: Arc::clone(&app_data.credential_store),
            token_service: Arc::clone(&app_data.token_service),
            user_store: app_data.user_store,
        }
    }

    /// Verify credentials and issue an access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - unknown user, no password set, or wrong password
    /// * `AccountInactive` - correct password on a deactivated account
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, InternalError> {
        let username = username.trim();
        let result = self
            .credential_store
            .verify_credentials(&self.db, username, password)
            .await;

        let (user, role) = match result {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!("Login failed for '{}': {}", username, err);
                return Err(err);
            }
        };

        let role_name = role.as_ref().map(|r| r.name.clone());
        let access_token = self
            .token_service
            .generate_jwt(&user.id, role_name.as_deref())?;

        tracing::info!("User '{}' logged in", user.username);

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_service.ttl_secs(),
            user: user_profile((user, role)),
            role_name,
        })
    }

    /// Resolve the caller behind a bearer token
    ///
    /// # Errors
    /// * `InvalidToken` / `ExpiredToken` - token rejected
    /// * `UnknownCaller` - user deleted or deactivated since the token was issued
    pub async fn authenticate(&self, token: &str) -> Result<Caller, InternalError> {
        let claims = self.token_service.validate_jwt(token)?;

        let (user, role) = match self.user_store.get(&self.db, &claims.sub).await {
            Ok(found) => found,
            Err(InternalError::NotFound { .. }) => {
                return Err(CredentialError::UnknownCaller(claims.sub).into());
            }
            Err(err) => return Err(err),
        };

        if !user.is_active {
            return Err(CredentialError::UnknownCaller(user.id).into());
        }

        Ok(Caller {
            role: role.and_then(|r| RoleName::parse(&r.name)),
            user_id: user.id,
            username: user.username,
        })
    }

    pub async fn profile(&self, user_id: &str) -> Result<UserProfile, InternalError> {
        let found = self.user_store.get(&self.db, user_id).await?;
        Ok(user_profile(found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::UserChanges;
    use crate::test::utils::{create_user, create_user_with_password, setup_test_app_data};

    #[tokio::test]
    async fn test_login_returns_token_and_role_name() {
        let app_data = setup_test_app_data().await;
        create_user_with_password(&app_data.db, "mgr", "s3cret-pass", Some(RoleName::Manager)).await;
        let service = AuthService::new(Arc::clone(&app_data));

        let response = service.login("mgr", "s3cret-pass").await.unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 8 * 60 * 60);
        assert_eq!(response.role_name.as_deref(), Some("Manager"));
        assert_eq!(response.user.username, "mgr");
        assert!(response.user.has_password);

        let caller = service.authenticate(&response.access_token).await.unwrap();
        assert_eq!(caller.user_id, response.user.id);
        assert_eq!(caller.role, Some(RoleName::Manager));
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_log_in() {
        let app_data = setup_test_app_data().await;
        let user = create_user_with_password(&app_data.db, "gone", "s3cret-pass", None).await;
        app_data
            .user_store
            .update(
                &app_data.db,
                &user.id,
                UserChanges {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let result = AuthService::new(app_data).login("gone", "s3cret-pass").await;
        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::AccountInactive(_)))
        ));
    }

    #[tokio::test]
    async fn test_token_for_deactivated_user_is_rejected() {
        let app_data = setup_test_app_data().await;
        create_user_with_password(&app_data.db, "jdoe", "s3cret-pass", None).await;
        let service = AuthService::new(Arc::clone(&app_data));
        let response = service.login("jdoe", "s3cret-pass").await.unwrap();

        app_data
            .user_store
            .update(
                &app_data.db,
                &response.user.id,
                UserChanges {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let result = service.authenticate(&response.access_token).await;
        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::UnknownCaller(_)))
        ));
    }

    #[tokio::test]
    async fn test_token_for_unknown_user_is_rejected() {
        let app_data = setup_test_app_data().await;
        let token = app_data.token_service.generate_jwt("ghost", None).unwrap();

        let result = AuthService::new(app_data).authenticate(&token).await;
        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::UnknownCaller(_)))
        ));
    }

    #[tokio::test]
    async fn test_profile_without_role() {
        let app_data = setup_test_app_data().await;
        let user = create_user(&app_data.db, "norole", None).await;

        let profile = AuthService::new(app_data).profile(&user.id).await.unwrap();
        assert_eq!(profile.role_name, None);
        assert_eq!(profile.full_name, "norole Tester");
        assert!(!profile.has_password);
    }
}
