use std::sync::Arc;

use poem_openapi::{
    OpenApi, Tags,
    param::{Path, Query},
    payload::Json,
};

use crate::api::BearerAuth;
use crate::api::helpers::authenticate;
use crate::app_data::AppData;
use crate::errors::ApiError;
use crate::services::{AuthService, ProjectService};
use crate::types::dto::common::NoContentApiResponse;
use crate::types::dto::projects::{
    AssignUserRequest, AssignmentResponse, CreateProjectApiResponse, CreateProjectRequest, ProjectResponse,
    UpdateProjectRequest,
};

/// Project and assignment endpoints
pub struct ProjectsApi {
    auth_service: AuthService,
    project_service: ProjectService,
}

impl ProjectsApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            auth_service: AuthService::new(Arc::clone(&app_data)),
            project_service: ProjectService::new(app_data),
        }
    }
}

#[derive(Tags)]
enum ProjectTags {
    /// Projects and user assignments
    Projects,
}

#[OpenApi]
impl ProjectsApi {
    /// List projects ordered by project number
    #[oai(path = "/projects", method = "get", tag = "ProjectTags::Projects")]
    async fn list(
        &self,
        auth: BearerAuth,
        #[oai(name = "activeOnly")] active_only: Query<Option<bool>>,
    ) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
        authenticate(&self.auth_service, &auth).await?;
        let projects = self.project_service.list(active_only.0.unwrap_or(false)).await?;
        Ok(Json(projects.into_iter().map(Into::into).collect()))
    }

    #[oai(path = "/projects/:id", method = "get", tag = "ProjectTags::Projects")]
    async fn get(&self, auth: BearerAuth, id: Path<String>) -> Result<Json<ProjectResponse>, ApiError> {
        authenticate(&self.auth_service, &auth).await?;
        Ok(Json(self.project_service.get(&id.0).await?.into()))
    }

    /// Create a project (Admin or Manager)
    #[oai(path = "/projects", method = "post", tag = "ProjectTags::Projects")]
    async fn create(
        &self,
        auth: BearerAuth,
        body: Json<CreateProjectRequest>,
    ) -> Result<CreateProjectApiResponse, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        let project = self.project_service.create(&caller, body.0).await?;
        Ok(CreateProjectApiResponse::Created(Json(project.into())))
    }

    /// Partial update (Admin or Manager)
    #[oai(path = "/projects/:id", method = "put", tag = "ProjectTags::Projects")]
    async fn update(
        &self,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateProjectRequest>,
    ) -> Result<Json<ProjectResponse>, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        Ok(Json(self.project_service.update(&caller, &id.0, body.0).await?.into()))
    }

    /// Delete a project; its work items keep existing without a project
    #[oai(path = "/projects/:id", method = "delete", tag = "ProjectTags::Projects")]
    async fn delete(&self, auth: BearerAuth, id: Path<String>) -> Result<NoContentApiResponse, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        self.project_service.delete(&caller, &id.0).await?;
        Ok(NoContentApiResponse::NoContent)
    }

    #[oai(path = "/projects/:id/assignments", method = "get", tag = "ProjectTags::Projects")]
    async fn list_assignments(
        &self,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<Vec<AssignmentResponse>>, ApiError> {
        authenticate(&self.auth_service, &auth).await?;
        Ok(Json(self.project_service.list_assignments(&id.0).await?))
    }

    /// Assign a user, or update the existing assignment
    #[oai(path = "/projects/:id/assignments/:user_id", method = "put", tag = "ProjectTags::Projects")]
    async fn assign(
        &self,
        auth: BearerAuth,
        id: Path<String>,
        user_id: Path<String>,
        body: Json<AssignUserRequest>,
    ) -> Result<Json<AssignmentResponse>, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        Ok(Json(self.project_service.assign(&caller, &id.0, &user_id.0, body.0).await?))
    }

    #[oai(path = "/projects/:id/assignments/:user_id", method = "delete", tag = "ProjectTags::Projects")]
    async fn unassign(
        &self,
        auth: BearerAuth,
        id: Path<String>,
        user_id: Path<String>,
    ) -> Result<NoContentApiResponse, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        self.project_service.unassign(&caller, &id.0, &user_id.0).await?;
        Ok(NoContentApiResponse::NoContent)
    }
}
