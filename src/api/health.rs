use std::sync::Arc;

use chrono::Utc;
use poem_openapi::{OpenApi, Tags, payload::Json};
use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::ping_database;
use crate::types::dto::common::HealthResponse;

/// Health check API
pub struct HealthApi {
    db: DatabaseConnection,
}

impl HealthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
        }
    }
}

/// API tags for health endpoints
#[derive(Tags)]
enum ApiTags {
    /// Health check endpoints
    Health,
}

#[OpenApi]
impl HealthApi {
    /// Health check endpoint
    ///
    /// Returns the current status of the API service and whether the
    /// database answers
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        let database_ok = ping_database(&self.db).await;

        Json(HealthResponse {
            status: if database_ok { "healthy" } else { "degraded" }.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            database: if database_ok { "connected" } else { "unreachable" }.to_string(),
        })
    }
}
