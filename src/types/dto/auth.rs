use poem_openapi::Object;

/// Request model for user login
#[derive(Object, Debug)]
pub struct LoginRequest {
    /// Username for authentication
    pub username: String,

    /// Password for authentication
    pub password: String,
}

/// Response model for a successful login
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct LoginResponse {
    /// JWT access token, sent back as `Authorization: Bearer <token>`
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,

    pub user: UserProfile,

    pub role_name: Option<String>,
}

/// Public view of a user account
#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: String,
    pub role_id: Option<String>,
    pub role_name: Option<String>,
    pub position_id: Option<String>,
    pub department_id: Option<String>,
    pub is_active: bool,
    pub has_password: bool,
}
