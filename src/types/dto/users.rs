use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::types::dto::auth::UserProfile;

/// Admin request to create a user
#[derive(Object, Debug, Clone, Default)]
#[oai(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role_id: Option<String>,
    pub position_id: Option<String>,
    pub department_id: Option<String>,

    /// Optional initial password; without one the user cannot log in yet
    pub password: Option<String>,

    pub is_active: Option<bool>,
}

/// Admin request to update a user; absent fields are left unchanged
#[derive(Object, Debug, Clone, Default)]
#[oai(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role_id: Option<String>,
    pub position_id: Option<String>,
    pub department_id: Option<String>,
    pub is_active: Option<bool>,
}

/// Admin request to set a user's password
#[derive(Object, Debug)]
pub struct SetPasswordRequest {
    #[oai(validator(min_length = 8))]
    pub password: String,
}

#[derive(ApiResponse, Debug)]
pub enum CreateUserApiResponse {
    /// User created
    #[oai(status = 201)]
    Created(Json<UserProfile>),
}
