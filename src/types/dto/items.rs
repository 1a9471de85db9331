use chrono::NaiveDate;
use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::types::db::work_item;

/// A logged unit of work or expense entry
#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct WorkItemResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub budget_id: Option<String>,
    pub user_id: Option<String>,
    pub work_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub planned_duration: Option<f64>,
    pub actual_duration: Option<f64>,
    pub estimated_hours: Option<f64>,
    pub remaining_hours: Option<f64>,
    pub activity_code: Option<String>,
    pub network_number: Option<String>,
    pub director_code: Option<String>,
    pub reason_code: Option<String>,
    pub cpc_code: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<work_item::Model> for WorkItemResponse {
    fn from(model: work_item::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            project_id: model.project_id,
            budget_id: model.budget_id,
            user_id: model.user_id,
            work_date: model.work_date,
            start_time: model.start_time,
            end_time: model.end_time,
            planned_duration: model.planned_duration,
            actual_duration: model.actual_duration,
            estimated_hours: model.estimated_hours,
            remaining_hours: model.remaining_hours,
            activity_code: model.activity_code,
            network_number: model.network_number,
            director_code: model.director_code,
            reason_code: model.reason_code,
            cpc_code: model.cpc_code,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Work item joined with project, budget and owner display fields
#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct DetailedWorkItemResponse {
    #[oai(flatten)]
    pub item: WorkItemResponse,
    pub project_name: Option<String>,
    pub project_number: Option<String>,
    pub budget_name: Option<String>,
    pub is_expense: bool,
    pub owner_username: Option<String>,
    pub owner_full_name: Option<String>,
}

/// Create body; which classification fields are required depends on the budget
#[derive(Object, Debug, Clone, Default)]
#[oai(rename_all = "camelCase")]
pub struct CreateWorkItemRequest {
    pub title: String,
    pub description: Option<String>,
    pub budget_id: Option<String>,
    pub project_id: Option<String>,

    /// Owner; only Admin/Manager callers may log on behalf of someone else
    pub user_id: Option<String>,

    pub work_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub planned_duration: Option<f64>,
    pub actual_duration: Option<f64>,
    pub estimated_hours: Option<f64>,
    pub activity_code: Option<String>,
    pub network_number: Option<String>,
    pub director_code: Option<String>,
    pub reason_code: Option<String>,
    pub cpc_code: Option<String>,
}

/// Partial update; absent fields are left unchanged
#[derive(Object, Debug, Clone, Default)]
#[oai(rename_all = "camelCase")]
pub struct UpdateWorkItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget_id: Option<String>,
    pub project_id: Option<String>,
    pub work_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub planned_duration: Option<f64>,
    pub actual_duration: Option<f64>,
    pub estimated_hours: Option<f64>,
    pub activity_code: Option<String>,
    pub network_number: Option<String>,
    pub director_code: Option<String>,
    pub reason_code: Option<String>,
    pub cpc_code: Option<String>,
}

/// Caller's own hours against a project estimate
#[derive(Object, Debug, Clone, PartialEq)]
#[oai(rename_all = "camelCase")]
pub struct RemainingHoursResponse {
    pub project_id: String,
    pub estimated_hours: Option<f64>,
    pub used_hours: f64,
    pub remaining_hours: Option<f64>,
}

#[derive(ApiResponse, Debug)]
pub enum CreateWorkItemApiResponse {
    /// Work item logged
    #[oai(status = 201)]
    Created(Json<WorkItemResponse>),
}
