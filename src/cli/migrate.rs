use crate::config::{BootstrapSettings, init_database, migrate_database};

/// Run database migrations
///
/// Connects and migrates without loading secrets or the rest of AppData.
pub async fn run_migrations(settings: &BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = init_database(settings.database_url()).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");
    Ok(())
}
