use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::{role, user};

/// Fields for a new user row; password hashing happens in `CredentialStore`
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role_id: Option<String>,
    pub position_id: Option<String>,
    pub department_id: Option<String>,
    pub is_active: bool,
    pub password_hash: Option<String>,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role_id: Option<String>,
    pub position_id: Option<String>,
    pub department_id: Option<String>,
    pub is_active: Option<bool>,
}

/// User rows paired with their role, when one is assigned
pub type UserWithRole = (user::Model, Option<role::Model>);

#[derive(Debug, Default, Clone, Copy)]
pub struct UserStore;

impl UserStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn list(&self, conn: &impl ConnectionTrait) -> Result<Vec<UserWithRole>, InternalError> {
        user::Entity::find()
            .find_also_related(role::Entity)
            .order_by_asc(user::Column::Username)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    pub async fn get(&self, conn: &impl ConnectionTrait, id: &str) -> Result<UserWithRole, InternalError> {
        user::Entity::find_by_id(id.to_string())
            .find_also_related(role::Entity)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_user", e))?
            .ok_or_else(|| InternalError::not_found("User", id))
    }

    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<UserWithRole>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .find_also_related(role::Entity)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))
    }

    /// Insert a user, rejecting a taken username before touching the index
    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        new_user: NewUser,
    ) -> Result<user::Model, InternalError> {
        if self.find_by_username(conn, &new_user.username).await?.is_some() {
            return Err(InternalError::conflict(format!(
                "Username '{}' is already taken",
                new_user.username
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(new_user.username),
            email: Set(new_user.email),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            role_id: Set(new_user.role_id),
            position_id: Set(new_user.position_id),
            department_id: Set(new_user.department_id),
            is_active: Set(new_user.is_active),
            password_hash: Set(new_user.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_user", e))
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        id: &str,
        changes: UserChanges,
    ) -> Result<user::Model, InternalError> {
        let (existing, _) = self.get(conn, id).await?;
        let mut active: user::ActiveModel = existing.into();

        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(first_name) = changes.first_name {
            active.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(Some(last_name));
        }
        if let Some(role_id) = changes.role_id {
            active.role_id = Set(Some(role_id));
        }
        if let Some(position_id) = changes.position_id {
            active.position_id = Set(Some(position_id));
        }
        if let Some(department_id) = changes.department_id {
            active.department_id = Set(Some(department_id));
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_user", e))
    }

    /// Store a new password hash for the user
    pub async fn set_password_hash(
        &self,
        conn: &impl ConnectionTrait,
        id: &str,
        password_hash: String,
    ) -> Result<(), InternalError> {
        let (existing, _) = self.get(conn, id).await?;
        let mut active: user::ActiveModel = existing.into();
        active.password_hash = Set(Some(password_hash));
        active.updated_at = Set(chrono::Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_password_hash", e))?;

        Ok(())
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, id: &str) -> Result<(), InternalError> {
        let result = user::Entity::delete_by_id(id.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;

        if result.rows_affected == 0 {
            return Err(InternalError::not_found("User", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_role, setup_test_db};

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            is_active: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get_with_role() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        let manager = create_role(&db, "Manager").await;

        let mut input = new_user("mgr");
        input.role_id = Some(manager.id.clone());
        let created = store.create(&db, input).await.unwrap();

        let (fetched, role) = store.get(&db, &created.id).await.unwrap();
        assert_eq!(fetched.username, "mgr");
        assert_eq!(role.map(|r| r.name), Some("Manager".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        store.create(&db, new_user("jdoe")).await.unwrap();
        let result = store.create(&db, new_user("jdoe")).await;
        assert!(matches!(result, Err(InternalError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        let mut input = new_user("jdoe");
        input.first_name = Some("Jo".to_string());
        let created = store.create(&db, input).await.unwrap();

        let updated = store
            .update(
                &db,
                &created.id,
                UserChanges {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!updated.is_active);
        assert_eq!(updated.first_name.as_deref(), Some("Jo"));
        assert_eq!(updated.email, "jdoe@example.com");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = setup_test_db().await;
        let result = UserStore::new().delete(&db, "nope").await;
        assert!(matches!(result, Err(InternalError::NotFound { .. })));
    }
}
