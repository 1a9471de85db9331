use std::sync::Arc;

use chrono::NaiveDate;
use poem_openapi::{OpenApi, Tags, param::Query, payload::Json};

use crate::api::BearerAuth;
use crate::api::helpers::authenticate;
use crate::app_data::AppData;
use crate::errors::ApiError;
use crate::services::{AuthService, ReportQuery, ReportService};
use crate::types::dto::reports::ReportSummary;

pub struct ReportsApi {
    auth_service: AuthService,
    report_service: ReportService,
}

impl ReportsApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            auth_service: AuthService::new(Arc::clone(&app_data)),
            report_service: ReportService::new(app_data),
        }
    }
}

#[derive(Tags)]
enum ReportTags {
    /// Aggregated hours
    Reports,
}

#[OpenApi]
impl ReportsApi {
    /// Hours by project, activity code and user
    ///
    /// Admin, Manager and Director callers may report on any user (or all);
    /// everyone else only sees their own work items.
    #[oai(path = "/reports/summary", method = "get", tag = "ReportTags::Reports")]
    async fn summary(
        &self,
        auth: BearerAuth,
        from: Query<Option<NaiveDate>>,
        to: Query<Option<NaiveDate>>,
        #[oai(name = "projectId")] project_id: Query<Option<String>>,
        #[oai(name = "userId")] user_id: Query<Option<String>>,
    ) -> Result<Json<ReportSummary>, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        let query = ReportQuery {
            from: from.0,
            to: to.0,
            project_id: project_id.0,
            user_id: user_id.0,
        };
        Ok(Json(self.report_service.summary(&caller, query).await?))
    }
}
