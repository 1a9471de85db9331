use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::types::db::{project, project_assignment};

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: String,
    pub project_number: String,
    pub name: String,
    pub description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<project::Model> for ProjectResponse {
    fn from(model: project::Model) -> Self {
        Self {
            id: model.id,
            project_number: model.project_number,
            name: model.name,
            description: model.description,
            estimated_hours: model.estimated_hours,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Object, Debug, Clone, Default)]
#[oai(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub project_number: String,
    pub name: String,
    pub description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub is_active: Option<bool>,
}

/// Absent fields are left unchanged
#[derive(Object, Debug, Clone, Default)]
#[oai(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub project_number: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub is_active: Option<bool>,
}

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub project_id: String,
    pub user_id: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub role_label: Option<String>,
    pub estimated_hours: Option<f64>,
    pub created_at: i64,
}

impl AssignmentResponse {
    pub fn from_model(model: project_assignment::Model, user: Option<&crate::types::db::user::Model>) -> Self {
        Self {
            project_id: model.project_id,
            user_id: model.user_id,
            username: user.map(|u| u.username.clone()),
            full_name: user.map(|u| u.full_name()),
            role_label: model.role_label,
            estimated_hours: model.estimated_hours,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug, Clone, Default)]
#[oai(rename_all = "camelCase")]
pub struct AssignUserRequest {
    /// Free-text role on the project, e.g. "Lead" or "Engineer"
    pub role_label: Option<String>,
    pub estimated_hours: Option<f64>,
}

#[derive(ApiResponse, Debug)]
pub enum CreateProjectApiResponse {
    /// Project created
    #[oai(status = 201)]
    Created(Json<ProjectResponse>),
}
