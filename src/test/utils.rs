// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use uuid::Uuid;

use crate::app_data::AppData;
use crate::config::{BootstrapSettings, MockEnvironment, SecretManager};
use crate::stores::{CredentialStore, LookupStore, NewProject, NewUser, ProjectStore, UserStore};
use crate::types::dto::reference::ReferenceRecord;
use crate::types::db::{budget, project, role, user, work_item};
use crate::types::internal::{Caller, LookupInput, RoleName};

pub const TEST_ADMIN_TOKEN: &str = "test-admin-token-0123456789";
pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";

/// Fresh in-memory database with all migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn test_environment() -> MockEnvironment {
    MockEnvironment::empty().with_vars(&[
        ("ADMIN_TOKEN", TEST_ADMIN_TOKEN),
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("PASSWORD_PEPPER", TEST_PEPPER),
        ("ADMIN_RATE_LIMIT", "1000"),
    ])
}

/// AppData over a fresh in-memory database with test secrets
pub async fn setup_test_app_data() -> Arc<AppData> {
    let env = test_environment();
    let settings = BootstrapSettings::from_env_provider(&env)
        .expect("Failed to load test settings")
        .with_database_url("sqlite::memory:");
    let secrets = SecretManager::from_env_provider(&env).expect("Failed to load test secrets");

    Arc::new(AppData::from_parts(setup_test_db().await, settings, secrets))
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub async fn create_role(db: &DatabaseConnection, name: &str) -> role::Model {
    let now = chrono::Utc::now().timestamp();
    role::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(name.to_string()),
        description: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to create role")
}

/// Role row for `role`, created on first use
pub async fn ensure_role(db: &DatabaseConnection, role: RoleName) -> ReferenceRecord {
    let input = LookupInput {
        key: role.as_str().to_string(),
        description: None,
        parent_id: None,
        is_active: true,
    };
    LookupStore::new()
        .ensure::<role::Entity>(db, input)
        .await
        .expect("Failed to ensure role")
        .0
}

/// Active user with the given role id and no password
pub async fn create_user(db: &DatabaseConnection, username: &str, role_id: Option<&str>) -> user::Model {
    UserStore::new()
        .create(
            db,
            NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                first_name: Some(username.to_string()),
                last_name: Some("Tester".to_string()),
                role_id: role_id.map(str::to_string),
                is_active: true,
                ..Default::default()
            },
        )
        .await
        .expect("Failed to create user")
}

/// User with a password set, ready to log in
pub async fn create_user_with_password(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    role: Option<RoleName>,
) -> user::Model {
    let role_id = match role {
        Some(role) => Some(ensure_role(db, role).await.id),
        None => None,
    };
    let user = create_user(db, username, role_id.as_deref()).await;
    CredentialStore::new(TEST_PEPPER.to_string())
        .set_password(db, &user.id, password)
        .await
        .expect("Failed to set password");
    user
}

/// Caller identity without touching the database
pub fn caller(user_id: &str, role: Option<RoleName>) -> Caller {
    Caller {
        user_id: user_id.to_string(),
        username: user_id.to_string(),
        role,
    }
}

pub async fn create_project(db: &DatabaseConnection, number: &str, estimate: Option<f64>) -> project::Model {
    ProjectStore::new()
        .create(
            db,
            NewProject {
                project_number: number.to_string(),
                name: format!("Project {}", number),
                description: None,
                estimated_hours: estimate,
                is_active: true,
            },
        )
        .await
        .expect("Failed to create project")
}

pub async fn create_budget(db: &DatabaseConnection, name: &str, description: Option<&str>) -> budget::Model {
    let now = chrono::Utc::now().timestamp();
    budget::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(name.to_string()),
        description: Set(description.map(str::to_string)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to create budget")
}

pub async fn create_work_item(
    db: &DatabaseConnection,
    title: &str,
    owner_id: Option<&str>,
    project_id: Option<&str>,
    work_date: Option<NaiveDate>,
    actual_duration: f64,
) -> work_item::Model {
    let now = chrono::Utc::now().timestamp();
    work_item::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        title: Set(title.to_string()),
        description: Set(None),
        project_id: Set(project_id.map(str::to_string)),
        budget_id: Set(None),
        user_id: Set(owner_id.map(str::to_string)),
        work_date: Set(work_date),
        start_time: Set(None),
        end_time: Set(None),
        planned_duration: Set(None),
        actual_duration: Set(Some(actual_duration)),
        estimated_hours: Set(None),
        remaining_hours: Set(None),
        activity_code: Set(None),
        network_number: Set(None),
        director_code: Set(None),
        reason_code: Set(None),
        cpc_code: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to create work item")
}
