use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::services::validation::{optional_text, required_text};
use crate::stores::{NewProject, ProjectChanges, ProjectStore, UserStore};
use crate::types::db::project;
use crate::types::dto::projects::{
    AssignUserRequest, AssignmentResponse, CreateProjectRequest, UpdateProjectRequest,
};
use crate::types::internal::Caller;

/// Projects and their user assignments
///
/// Anyone signed in may read; only Admin and Manager may change anything.
pub struct ProjectService {
    db: DatabaseConnection,
    project_store: ProjectStore,
    user_store: UserStore,
}

impl ProjectService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            project_store: app_data.project_store,
            user_store: app_data.user_store,
        }
    }

    fn require_manager(caller: &Caller, action: &str) -> Result<(), InternalError> {
        if caller.can_manage_others() {
            return Ok(());
        }
        tracing::warn!("User {} may not {}", caller.user_id, action);
        Err(InternalError::forbidden(format!(
            "Only Admin or Manager users may {}",
            action
        )))
    }

    fn check_estimate(estimate: Option<f64>) -> Result<(), InternalError> {
        match estimate {
            Some(hours) if !hours.is_finite() || hours < 0.0 => Err(InternalError::validation(
                "Estimated hours must be a non-negative number",
            )),
            _ => Ok(()),
        }
    }

    pub async fn list(&self, active_only: bool) -> Result<Vec<project::Model>, InternalError> {
        self.project_store.list(&self.db, active_only).await
    }

    pub async fn get(&self, id: &str) -> Result<project::Model, InternalError> {
        self.project_store.get(&self.db, id).await
    }

    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateProjectRequest,
    ) -> Result<project::Model, InternalError> {
        Self::require_manager(caller, "create projects")?;
        let project_number = required_text(&request.project_number, "Project number")?;
        let name = required_text(&request.name, "Name")?;
        Self::check_estimate(request.estimated_hours)?;

        let project = self
            .project_store
            .create(
                &self.db,
                NewProject {
                    project_number,
                    name,
                    description: optional_text(request.description),
                    estimated_hours: request.estimated_hours,
                    is_active: request.is_active.unwrap_or(true),
                },
            )
            .await?;

        tracing::info!("Created project {} '{}'", project.project_number, project.name);
        Ok(project)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        request: UpdateProjectRequest,
    ) -> Result<project::Model, InternalError> {
        Self::require_manager(caller, "update projects")?;
        Self::check_estimate(request.estimated_hours)?;

        let project_number = match request.project_number {
            Some(number) => Some(required_text(&number, "Project number")?),
            None => None,
        };
        let name = match request.name {
            Some(name) => Some(required_text(&name, "Name")?),
            None => None,
        };

        let project = self
            .project_store
            .update(
                &self.db,
                id,
                ProjectChanges {
                    project_number,
                    name,
                    description: optional_text(request.description),
                    estimated_hours: request.estimated_hours,
                    is_active: request.is_active,
                },
            )
            .await?;

        tracing::info!("Updated project {}", project.id);
        Ok(project)
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> Result<(), InternalError> {
        Self::require_manager(caller, "delete projects")?;
        self.project_store.delete(&self.db, id).await?;

        tracing::info!("Deleted project {}", id);
        Ok(())
    }

    pub async fn list_assignments(&self, project_id: &str) -> Result<Vec<AssignmentResponse>, InternalError> {
        self.project_store.get(&self.db, project_id).await?;
        let rows = self.project_store.list_assignments(&self.db, project_id).await?;

        Ok(rows
            .into_iter()
            .map(|(assignment, user)| AssignmentResponse::from_model(assignment, user.as_ref()))
            .collect())
    }

    /// Create or replace the assignment of a user to a project
    pub async fn assign(
        &self,
        caller: &Caller,
        project_id: &str,
        user_id: &str,
        request: AssignUserRequest,
    ) -> Result<AssignmentResponse, InternalError> {
        Self::require_manager(caller, "manage assignments")?;
        Self::check_estimate(request.estimated_hours)?;
        self.project_store.get(&self.db, project_id).await?;
        let (user, _) = self.user_store.get(&self.db, user_id).await?;

        let (assignment, created) = self
            .project_store
            .upsert_assignment(
                &self.db,
                project_id,
                user_id,
                optional_text(request.role_label),
                request.estimated_hours,
            )
            .await?;

        tracing::info!(
            "{} assignment of {} to project {}",
            if created { "Created" } else { "Updated" },
            user.username,
            project_id
        );
        Ok(AssignmentResponse::from_model(assignment, Some(&user)))
    }

    pub async fn unassign(&self, caller: &Caller, project_id: &str, user_id: &str) -> Result<(), InternalError> {
        Self::require_manager(caller, "manage assignments")?;
        self.project_store.delete_assignment(&self.db, project_id, user_id).await?;

        tracing::info!("Removed user {} from project {}", user_id, project_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{caller, create_user, setup_test_app_data};
    use crate::types::internal::RoleName;

    fn request(number: &str) -> CreateProjectRequest {
        CreateProjectRequest {
            project_number: number.to_string(),
            name: "Substation upgrade".to_string(),
            estimated_hours: Some(120.0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_only_managers_create_projects() {
        let service = ProjectService::new(setup_test_app_data().await);

        for role in [None, Some(RoleName::User), Some(RoleName::Director)] {
            let result = service.create(&caller("u1", role), request("P-1")).await;
            assert!(matches!(result, Err(InternalError::Forbidden(_))), "{:?}", role);
        }

        let created = service
            .create(&caller("u1", Some(RoleName::Manager)), request(" P-1 "))
            .await
            .unwrap();
        assert_eq!(created.project_number, "P-1");
        assert!(created.is_active);
    }

    #[tokio::test]
    async fn test_name_required_and_estimate_non_negative() {
        let service = ProjectService::new(setup_test_app_data().await);
        let admin = caller("a1", Some(RoleName::Admin));

        let mut blank_name = request("P-1");
        blank_name.name = "  ".to_string();
        assert!(matches!(service.create(&admin, blank_name).await, Err(InternalError::Validation(_))));

        let mut negative = request("P-2");
        negative.estimated_hours = Some(-1.0);
        assert!(matches!(service.create(&admin, negative).await, Err(InternalError::Validation(_))));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let service = ProjectService::new(setup_test_app_data().await);
        let admin = caller("a1", Some(RoleName::Admin));
        let project = service.create(&admin, request("P-1")).await.unwrap();

        let updated = service
            .update(
                &admin,
                &project.id,
                UpdateProjectRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.name, "Substation upgrade");
        assert_eq!(updated.estimated_hours, Some(120.0));
    }

    #[tokio::test]
    async fn test_assignments() {
        let app_data = setup_test_app_data().await;
        let user = create_user(&app_data.db, "jdoe", None).await;
        let service = ProjectService::new(app_data);
        let manager = caller("m1", Some(RoleName::Manager));
        let project = service.create(&manager, request("P-1")).await.unwrap();

        let assignment = service
            .assign(
                &manager,
                &project.id,
                &user.id,
                AssignUserRequest {
                    role_label: Some("Engineer".to_string()),
                    estimated_hours: Some(40.0),
                },
            )
            .await
            .unwrap();
        assert_eq!(assignment.username.as_deref(), Some("jdoe"));

        let plain = caller(&user.id, Some(RoleName::User));
        assert!(matches!(
            service.unassign(&plain, &project.id, &user.id).await,
            Err(InternalError::Forbidden(_))
        ));

        assert_eq!(service.list_assignments(&project.id).await.unwrap().len(), 1);
        service.unassign(&manager, &project.id, &user.id).await.unwrap();
        assert!(service.list_assignments(&project.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assign_unknown_user_is_not_found() {
        let service = ProjectService::new(setup_test_app_data().await);
        let admin = caller("a1", Some(RoleName::Admin));
        let project = service.create(&admin, request("P-1")).await.unwrap();

        let result = service
            .assign(&admin, &project.id, "ghost", AssignUserRequest::default())
            .await;
        assert!(matches!(result, Err(InternalError::NotFound { .. })));
    }
}
