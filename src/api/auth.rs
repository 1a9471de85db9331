use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, SecurityScheme, Tags, auth::Bearer, param::Path, payload::Json};

use crate::api::helpers::{authenticate, client_ip};
use crate::app_data::AppData;
use crate::errors::{ApiError, InternalError};
use crate::services::AuthService;
use crate::types::dto::auth::{LoginRequest, LoginResponse, UserProfile};

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// Authentication API endpoints
pub struct AuthApi {
    auth_service: AuthService,
    trust_proxy_headers: bool,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            trust_proxy_headers: app_data.settings.trust_proxy_headers(),
            auth_service: AuthService::new(app_data),
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with username and password to receive an access token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
        tracing::debug!("Login attempt for '{}' from {:?}", body.username, client_ip(req, self.trust_proxy_headers));
        let response = self.auth_service.login(&body.username, &body.password).await?;
        Ok(Json(response))
    }

    /// Profile of the authenticated caller
    #[oai(path = "/me", method = "get", tag = "AuthTags::Authentication")]
    async fn me(&self, auth: BearerAuth) -> Result<Json<UserProfile>, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        Ok(Json(self.auth_service.profile(&caller.user_id).await?))
    }

    /// Look up a user profile by id
    ///
    /// Callers may read their own profile; privileged roles may read anyone's.
    #[oai(path = "/user/:emp_id", method = "get", tag = "AuthTags::Authentication")]
    async fn user(&self, auth: BearerAuth, emp_id: Path<String>) -> Result<Json<UserProfile>, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        if emp_id.0 != caller.user_id && !caller.is_privileged() {
            return Err(InternalError::forbidden("Only privileged users may view other profiles").into());
        }
        Ok(Json(self.auth_service.profile(&emp_id.0).await?))
    }
}
