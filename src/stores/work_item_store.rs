use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::{budget, project, user, work_item};
use crate::types::internal::DateRange;

/// Row filters for work item queries; every field is optional
#[derive(Debug, Clone, Default)]
pub struct WorkItemFilter {
    pub owner_id: Option<String>,
    pub project_id: Option<String>,
    pub range: DateRange,
}

/// Display rows referenced by a batch of work items, keyed by id
#[derive(Debug, Default)]
pub struct WorkItemRelations {
    pub projects: HashMap<String, project::Model>,
    pub budgets: HashMap<String, budget::Model>,
    pub users: HashMap<String, user::Model>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WorkItemStore;

impl WorkItemStore {
    pub fn new() -> Self {
        Self
    }

    /// Work items matching the filter, newest work date first
    ///
    /// When a date bound is set, items without a work date are excluded.
    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        filter: &WorkItemFilter,
    ) -> Result<Vec<work_item::Model>, InternalError> {
        let mut query = work_item::Entity::find();

        if let Some(owner_id) = &filter.owner_id {
            query = query.filter(work_item::Column::UserId.eq(owner_id.as_str()));
        }
        if let Some(project_id) = &filter.project_id {
            query = query.filter(work_item::Column::ProjectId.eq(project_id.as_str()));
        }
        if let Some(from) = filter.range.from {
            query = query.filter(work_item::Column::WorkDate.gte(from));
        }
        if let Some(to) = filter.range.to {
            query = query.filter(work_item::Column::WorkDate.lte(to));
        }

        query
            .order_by_desc(work_item::Column::WorkDate)
            .order_by_desc(work_item::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_work_items", e))
    }

    pub async fn get(&self, conn: &impl ConnectionTrait, id: &str) -> Result<work_item::Model, InternalError> {
        work_item::Entity::find_by_id(id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_work_item", e))?
            .ok_or_else(|| InternalError::not_found("Work item", id))
    }

    /// Find a work item by title and owner; used by seeding to stay idempotent
    pub async fn find_by_title_and_owner(
        &self,
        conn: &impl ConnectionTrait,
        title: &str,
        owner_id: &str,
    ) -> Result<Option<work_item::Model>, InternalError> {
        work_item::Entity::find()
            .filter(work_item::Column::Title.eq(title))
            .filter(work_item::Column::UserId.eq(owner_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_work_item_by_title", e))
    }

    /// Insert a work item; id and timestamps are assigned here
    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        mut item: work_item::ActiveModel,
    ) -> Result<work_item::Model, InternalError> {
        let now = chrono::Utc::now().timestamp();
        item.id = Set(Uuid::new_v4().to_string());
        item.created_at = Set(now);
        item.updated_at = Set(now);

        item.insert(conn)
            .await
            .map_err(|e| InternalError::database("create_work_item", e))
    }

    /// Persist the changed columns of an existing work item
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        mut item: work_item::ActiveModel,
    ) -> Result<work_item::Model, InternalError> {
        item.updated_at = Set(chrono::Utc::now().timestamp());

        item.update(conn)
            .await
            .map_err(|e| InternalError::database("update_work_item", e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, id: &str) -> Result<(), InternalError> {
        let result = work_item::Entity::delete_by_id(id.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_work_item", e))?;

        if result.rows_affected == 0 {
            return Err(InternalError::not_found("Work item", id));
        }

        Ok(())
    }

    /// Budget row deciding which classification fields an item needs
    pub async fn find_budget(
        &self,
        conn: &impl ConnectionTrait,
        budget_id: &str,
    ) -> Result<Option<budget::Model>, InternalError> {
        budget::Entity::find_by_id(budget_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_budget", e))
    }

    /// Load the projects, budgets and owners referenced by `items`
    pub async fn load_relations(
        &self,
        conn: &impl ConnectionTrait,
        items: &[work_item::Model],
    ) -> Result<WorkItemRelations, InternalError> {
        let project_ids = distinct(items.iter().filter_map(|i| i.project_id.as_deref()));
        let budget_ids = distinct(items.iter().filter_map(|i| i.budget_id.as_deref()));
        let user_ids = distinct(items.iter().filter_map(|i| i.user_id.as_deref()));

        let mut relations = WorkItemRelations::default();

        if !project_ids.is_empty() {
            relations.projects = project::Entity::find()
                .filter(project::Column::Id.is_in(project_ids))
                .all(conn)
                .await
                .map_err(|e| InternalError::database("load_work_item_projects", e))?
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect();
        }
        if !budget_ids.is_empty() {
            relations.budgets = budget::Entity::find()
                .filter(budget::Column::Id.is_in(budget_ids))
                .all(conn)
                .await
                .map_err(|e| InternalError::database("load_work_item_budgets", e))?
                .into_iter()
                .map(|b| (b.id.clone(), b))
                .collect();
        }
        if !user_ids.is_empty() {
            relations.users = user::Entity::find()
                .filter(user::Column::Id.is_in(user_ids))
                .all(conn)
                .await
                .map_err(|e| InternalError::database("load_work_item_users", e))?
                .into_iter()
                .map(|u| (u.id.clone(), u))
                .collect();
        }

        Ok(relations)
    }
}

fn distinct<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    ids.collect::<HashSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
