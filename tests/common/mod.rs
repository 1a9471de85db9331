// Common test utilities for integration tests

use std::collections::HashMap;
use std::sync::Arc;

use dsc_timesheet::api::build_app;
use dsc_timesheet::app_data::AppData;
use dsc_timesheet::config::{BootstrapSettings, EnvironmentProvider, SecretManager, init_database, migrate_database};
use dsc_timesheet::services::{ReferenceService, UserService};
use dsc_timesheet::types::dto::reference::ReferenceKind;
use dsc_timesheet::types::dto::users::CreateUserRequest;
use dsc_timesheet::types::internal::RoleName;
use poem::test::TestClient;
use poem::{Endpoint, Response};
use serde_json::json;

pub const ADMIN_TOKEN: &str = "integration-admin-token-0123";
pub const PASSWORD: &str = "correct-horse-battery";

/// Fixed environment map so tests never touch process env vars
pub struct TestEnv {
    vars: HashMap<String, String>,
}

impl TestEnv {
    pub fn new(extra: &[(&str, &str)]) -> Self {
        let mut vars: HashMap<String, String> = [
            ("ADMIN_TOKEN", ADMIN_TOKEN),
            ("JWT_SECRET", "integration-jwt-secret-at-least-32-chars"),
            ("PASSWORD_PEPPER", "integration-pepper-value"),
            ("ADMIN_RATE_LIMIT", "1000"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        for (key, value) in extra {
            vars.insert(key.to_string(), value.to_string());
        }
        Self { vars }
    }
}

impl EnvironmentProvider for TestEnv {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// AppData over a fresh in-memory database, with optional setting overrides
pub async fn setup_app_data_with(extra: &[(&str, &str)]) -> Arc<AppData> {
    let env = TestEnv::new(extra);
    let settings = BootstrapSettings::from_env_provider(&env)
        .expect("Failed to load test settings")
        .with_database_url("sqlite::memory:");
    let secrets = SecretManager::from_env_provider(&env).expect("Failed to load test secrets");

    let db = init_database(settings.database_url())
        .await
        .expect("Failed to create test database");
    migrate_database(&db).await.expect("Failed to run migrations");

    let app_data = Arc::new(AppData::from_parts(db, settings, secrets));
    ReferenceService::new(Arc::clone(&app_data))
        .ensure_roles()
        .await
        .expect("Failed to ensure roles");
    app_data
}

pub async fn setup_app_data() -> Arc<AppData> {
    setup_app_data_with(&[]).await
}

pub fn client(app_data: Arc<AppData>) -> TestClient<impl Endpoint<Output = Response>> {
    TestClient::new(build_app(app_data))
}

/// Active user with a password and the given role; returns the user id
pub async fn create_user(app_data: &Arc<AppData>, username: &str, role: RoleName) -> String {
    let roles = ReferenceService::new(Arc::clone(app_data))
        .list(ReferenceKind::Roles, None)
        .await
        .expect("Failed to list roles");
    let role_id = roles
        .into_iter()
        .find(|r| r.key == role.as_str())
        .map(|r| r.id);

    UserService::new(Arc::clone(app_data))
        .create(CreateUserRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            first_name: Some(username.to_string()),
            last_name: Some("Tester".to_string()),
            role_id,
            password: Some(PASSWORD.to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to create user")
        .id
}

/// Log in and return the bearer token
pub async fn login<E: Endpoint>(client: &TestClient<E>, username: &str) -> String {
    let resp = client
        .post("/api/auth/login")
        .body_json(&json!({ "username": username, "password": PASSWORD }))
        .send()
        .await;
    resp.assert_status_is_ok();

    resp.json()
        .await
        .value()
        .object()
        .get("accessToken")
        .string()
        .to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
