use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, Statement, TransactionTrait,
};

use crate::errors::{DatabaseError, InternalError};

/// Connect to the configured database
///
/// Does NOT run migrations - call `migrate_database()` separately.
///
/// # Returns
/// * `Ok(DatabaseConnection)` - Connection established successfully
/// * `Err(InternalError)` - Connection failed
pub async fn init_database(database_url: &str) -> Result<DatabaseConnection, InternalError> {
    let db = Database::connect(database_url)
        .await
        .map_err(|e| InternalError::database("connect_database", e))?;

    tracing::debug!("Connected to database: {}", database_url);

    Ok(db)
}

/// Apply all pending schema migrations
pub async fn migrate_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    Migrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_migrations", e))?;

    tracing::debug!("Database migrations completed");

    Ok(())
}

/// Round-trip a trivial query; used by the health endpoint
pub async fn ping_database(db: &DatabaseConnection) -> bool {
    let backend = db.get_database_backend();
    match db
        .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
    {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Database ping failed: {}", e);
            false
        }
    }
}

pub async fn begin_transaction(db: &DatabaseConnection) -> Result<DatabaseTransaction, InternalError> {
    db.begin()
        .await
        .map_err(|source| InternalError::Database(DatabaseError::TransactionBegin { source }))
}

pub async fn commit_transaction(txn: DatabaseTransaction) -> Result<(), InternalError> {
    txn.commit()
        .await
        .map_err(|source| InternalError::Database(DatabaseError::TransactionCommit { source }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_migrate_and_ping() {
        let db = init_database("sqlite::memory:").await.unwrap();
        migrate_database(&db).await.unwrap();
        assert!(ping_database(&db).await);
    }

    #[tokio::test]
    async fn test_migrations_are_repeatable() {
        let db = init_database("sqlite::memory:").await.unwrap();
        migrate_database(&db).await.unwrap();
        migrate_database(&db).await.unwrap();
    }
}
