use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::{project, project_assignment, user};

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub project_number: String,
    pub name: String,
    pub description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub is_active: bool,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub project_number: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectStore;

impl ProjectStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        active_only: bool,
    ) -> Result<Vec<project::Model>, InternalError> {
        let mut query = project::Entity::find();
        if active_only {
            query = query.filter(project::Column::IsActive.eq(true));
        }

        query
            .order_by_asc(project::Column::ProjectNumber)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_projects", e))
    }

    pub async fn get(&self, conn: &impl ConnectionTrait, id: &str) -> Result<project::Model, InternalError> {
        self.find(conn, id)
            .await?
            .ok_or_else(|| InternalError::not_found("Project", id))
    }

    pub async fn find(
        &self,
        conn: &impl ConnectionTrait,
        id: &str,
    ) -> Result<Option<project::Model>, InternalError> {
        project::Entity::find_by_id(id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_project", e))
    }

    pub async fn find_by_number(
        &self,
        conn: &impl ConnectionTrait,
        project_number: &str,
    ) -> Result<Option<project::Model>, InternalError> {
        project::Entity::find()
            .filter(project::Column::ProjectNumber.eq(project_number))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_project_by_number", e))
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        new_project: NewProject,
    ) -> Result<project::Model, InternalError> {
        let now = chrono::Utc::now().timestamp();
        project::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            project_number: Set(new_project.project_number),
            name: Set(new_project.name),
            description: Set(new_project.description),
            estimated_hours: Set(new_project.estimated_hours),
            is_active: Set(new_project.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_project", e))
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        id: &str,
        changes: ProjectChanges,
    ) -> Result<project::Model, InternalError> {
        let mut active: project::ActiveModel = self.get(conn, id).await?.into();

        if let Some(project_number) = changes.project_number {
            active.project_number = Set(project_number);
        }
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(estimated_hours) = changes.estimated_hours {
            active.estimated_hours = Set(Some(estimated_hours));
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_project", e))
    }

    /// Delete a project; its work items keep their rows with the project cleared
    pub async fn delete(&self, conn: &impl ConnectionTrait, id: &str) -> Result<(), InternalError> {
        let result = project::Entity::delete_by_id(id.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_project", e))?;

        if result.rows_affected == 0 {
            return Err(InternalError::not_found("Project", id));
        }

        Ok(())
    }

    /// Assignments for a project with the assigned user loaded
    pub async fn list_assignments(
        &self,
        conn: &impl ConnectionTrait,
        project_id: &str,
    ) -> Result<Vec<(project_assignment::Model, Option<user::Model>)>, InternalError> {
        project_assignment::Entity::find()
            .filter(project_assignment::Column::ProjectId.eq(project_id))
            .find_also_related(user::Entity)
            .order_by_asc(project_assignment::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_assignments", e))
    }

    pub async fn find_assignment(
        &self,
        conn: &impl ConnectionTrait,
        project_id: &str,
        user_id: &str,
    ) -> Result<Option<project_assignment::Model>, InternalError> {
        project_assignment::Entity::find_by_id((project_id.to_string(), user_id.to_string()))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_assignment", e))
    }

    /// Insert or overwrite the single assignment row for (project, user)
    ///
    /// Returns the row and whether it was newly created.
    pub async fn upsert_assignment(
        &self,
        conn: &impl ConnectionTrait,
        project_id: &str,
        user_id: &str,
        role_label: Option<String>,
        estimated_hours: Option<f64>,
    ) -> Result<(project_assignment::Model, bool), InternalError> {
        match self.find_assignment(conn, project_id, user_id).await? {
            Some(existing) => {
                let mut active: project_assignment::ActiveModel = existing.into();
                active.role_label = Set(role_label);
                active.estimated_hours = Set(estimated_hours);
                let model = active
                    .update(conn)
                    .await
                    .map_err(|e| InternalError::database("update_assignment", e))?;
                Ok((model, false))
            }
            None => {
                let model = project_assignment::ActiveModel {
                    project_id: Set(project_id.to_string()),
                    user_id: Set(user_id.to_string()),
                    role_label: Set(role_label),
                    estimated_hours: Set(estimated_hours),
                    created_at: Set(chrono::Utc::now().timestamp()),
                }
                .insert(conn)
                .await
                .map_err(|e| InternalError::database("create_assignment", e))?;
                Ok((model, true))
            }
        }
    }

    pub async fn delete_assignment(
        &self,
        conn: &impl ConnectionTrait,
        project_id: &str,
        user_id: &str,
    ) -> Result<(), InternalError> {
        let result =
            project_assignment::Entity::delete_by_id((project_id.to_string(), user_id.to_string()))
                .exec(conn)
                .await
                .map_err(|e| InternalError::database("delete_assignment", e))?;

        if result.rows_affected == 0 {
            return Err(InternalError::not_found(
                "Assignment",
                &format!("{}/{}", project_id, user_id),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_user, setup_test_db};

    fn new_project(number: &str, estimate: Option<f64>) -> NewProject {
        NewProject {
            project_number: number.to_string(),
            name: format!("Project {}", number),
            estimated_hours: estimate,
            is_active: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_duplicate_project_number_is_conflict() {
        let db = setup_test_db().await;
        let store = ProjectStore::new();

        store.create(&db, new_project("P-100", None)).await.unwrap();
        let result = store.create(&db, new_project("P-100", None)).await;
        assert!(matches!(result, Err(InternalError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_active_only() {
        let db = setup_test_db().await;
        let store = ProjectStore::new();

        store.create(&db, new_project("P-2", None)).await.unwrap();
        let mut inactive = new_project("P-1", None);
        inactive.is_active = false;
        store.create(&db, inactive).await.unwrap();

        assert_eq!(store.list(&db, false).await.unwrap().len(), 2);
        let active = store.list(&db, true).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].project_number, "P-2");
    }

    #[tokio::test]
    async fn test_assignment_upsert_keeps_one_row_per_pair() {
        let db = setup_test_db().await;
        let store = ProjectStore::new();
        let project = store.create(&db, new_project("P-1", Some(100.0))).await.unwrap();
        let user = create_user(&db, "jdoe", None).await;

        let (_, created) = store
            .upsert_assignment(&db, &project.id, &user.id, Some("Engineer".to_string()), Some(10.0))
            .await
            .unwrap();
        assert!(created);

        let (updated, created) = store
            .upsert_assignment(&db, &project.id, &user.id, Some("Lead".to_string()), None)
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(updated.role_label.as_deref(), Some("Lead"));

        let assignments = store.list_assignments(&db, &project.id).await.unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].1.as_ref().map(|u| u.username.as_str()), Some("jdoe"));
    }

    #[tokio::test]
    async fn test_deleting_project_removes_assignments() {
        let db = setup_test_db().await;
        let store = ProjectStore::new();
        let project = store.create(&db, new_project("P-1", None)).await.unwrap();
        let user = create_user(&db, "jdoe", None).await;
        store
            .upsert_assignment(&db, &project.id, &user.id, None, None)
            .await
            .unwrap();

        store.delete(&db, &project.id).await.unwrap();

        assert!(store.find_assignment(&db, &project.id, &user.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete(&db, &project.id).await,
            Err(InternalError::NotFound { .. })
        ));
    }
}
