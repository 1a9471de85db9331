use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{BootstrapSettings, SecretManager, init_database, migrate_database};
use crate::errors::InternalError;
use crate::services::TokenService;
use crate::stores::{CalendarStore, CredentialStore, LookupStore, ProjectStore, UserStore, WorkItemStore};

/// Centralized application data following the main-owned stores pattern
///
/// Everything is created once in main.rs and shared by the services.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(settings)
///   ↓ creates once
///   ├─ db (DatabaseConnection, migrated)
///   ├─ secret_manager (Arc<SecretManager>)
///   ├─ credential_store (Arc<CredentialStore>)  pepper from secrets
///   ├─ token_service (Arc<TokenService>)        JWT key from secrets
///   └─ lookup/user/project/work item/calendar stores
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to services
///   ├─ AuthService::new(app_data)
///   ├─ WorkItemService::new(app_data)
///   └─ ...
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: BootstrapSettings,
    pub secret_manager: Arc<SecretManager>,
    pub credential_store: Arc<CredentialStore>,
    pub token_service: Arc<TokenService>,
    pub lookup_store: LookupStore,
    pub user_store: UserStore,
    pub project_store: ProjectStore,
    pub work_item_store: WorkItemStore,
    pub calendar_store: CalendarStore,
}

impl AppData {
    /// Connect, migrate and load secrets
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when the database is unreachable, migrations
    /// fail, or a required secret is missing
    pub async fn init(settings: BootstrapSettings) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        let db = init_database(settings.database_url()).await?;
        migrate_database(&db).await?;

        tracing::debug!("Initializing secret manager...");
        let secret_manager = SecretManager::init()
            .map_err(|e| InternalError::crypto("secret_manager", e.to_string()))?;
        tracing::debug!("Secret manager initialized");

        let app_data = Self::from_parts(db, settings, secret_manager);
        tracing::info!("AppData initialization complete");

        Ok(app_data)
    }

    /// Assemble AppData from an already migrated connection
    pub fn from_parts(
        db: DatabaseConnection,
        settings: BootstrapSettings,
        secret_manager: SecretManager,
    ) -> Self {
        let credential_store = Arc::new(CredentialStore::new(secret_manager.pepper().to_string()));
        let token_service = Arc::new(TokenService::new(secret_manager.jwt_secret().to_string()));

        Self {
            db,
            settings,
            secret_manager: Arc::new(secret_manager),
            credential_store,
            token_service,
            lookup_store: LookupStore::new(),
            user_store: UserStore::new(),
            project_store: ProjectStore::new(),
            work_item_store: WorkItemStore::new(),
            calendar_store: CalendarStore::new(),
        }
    }
}
