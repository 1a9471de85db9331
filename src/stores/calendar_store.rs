use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::calendar_entry;
use crate::types::internal::DateRange;

/// Validated calendar entry fields
#[derive(Debug, Clone)]
pub struct CalendarEntryInput {
    pub calendar_category_id: Option<String>,
    pub title: String,
    pub entry_date: chrono::NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CalendarStore;

impl CalendarStore {
    pub fn new() -> Self {
        Self
    }

    /// Entries ordered by date, optionally within a category and date range
    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        category_id: Option<&str>,
        range: DateRange,
    ) -> Result<Vec<calendar_entry::Model>, InternalError> {
        let mut query = calendar_entry::Entity::find();
        if let Some(category_id) = category_id {
            query = query.filter(calendar_entry::Column::CalendarCategoryId.eq(category_id));
        }
        if let Some(from) = range.from {
            query = query.filter(calendar_entry::Column::EntryDate.gte(from));
        }
        if let Some(to) = range.to {
            query = query.filter(calendar_entry::Column::EntryDate.lte(to));
        }

        query
            .order_by_asc(calendar_entry::Column::EntryDate)
            .order_by_asc(calendar_entry::Column::Title)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_calendar_entries", e))
    }

    pub async fn get(
        &self,
        conn: &impl ConnectionTrait,
        id: &str,
    ) -> Result<calendar_entry::Model, InternalError> {
        calendar_entry::Entity::find_by_id(id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_calendar_entry", e))?
            .ok_or_else(|| InternalError::not_found("Calendar entry", id))
    }

    /// Find an entry by title and date; used by seeding
    pub async fn find_by_title_and_date(
        &self,
        conn: &impl ConnectionTrait,
        title: &str,
        entry_date: chrono::NaiveDate,
    ) -> Result<Option<calendar_entry::Model>, InternalError> {
        calendar_entry::Entity::find()
            .filter(calendar_entry::Column::Title.eq(title))
            .filter(calendar_entry::Column::EntryDate.eq(entry_date))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_calendar_entry", e))
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        input: CalendarEntryInput,
    ) -> Result<calendar_entry::Model, InternalError> {
        let now = chrono::Utc::now().timestamp();
        calendar_entry::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            calendar_category_id: Set(input.calendar_category_id),
            title: Set(input.title),
            entry_date: Set(input.entry_date),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_calendar_entry", e))
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        id: &str,
        input: CalendarEntryInput,
    ) -> Result<calendar_entry::Model, InternalError> {
        let mut active: calendar_entry::ActiveModel = self.get(conn, id).await?.into();
        active.calendar_category_id = Set(input.calendar_category_id);
        active.title = Set(input.title);
        active.entry_date = Set(input.entry_date);
        active.description = Set(input.description);
        active.updated_at = Set(chrono::Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_calendar_entry", e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, id: &str) -> Result<(), InternalError> {
        let result = calendar_entry::Entity::delete_by_id(id.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_calendar_entry", e))?;

        if result.rows_affected == 0 {
            return Err(InternalError::not_found("Calendar entry", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{date, setup_test_db};

    fn entry(title: &str, entry_date: chrono::NaiveDate) -> CalendarEntryInput {
        CalendarEntryInput {
            calendar_category_id: None,
            title: title.to_string(),
            entry_date,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_list_by_range_in_date_order() {
        let db = setup_test_db().await;
        let store = CalendarStore::new();

        store.create(&db, entry("Canada Day", date(2025, 7, 1))).await.unwrap();
        store.create(&db, entry("New Year", date(2025, 1, 1))).await.unwrap();
        store.create(&db, entry("Christmas", date(2025, 12, 25))).await.unwrap();

        let all = store.list(&db, None, DateRange::default()).await.unwrap();
        assert_eq!(all[0].title, "New Year");
        assert_eq!(all.len(), 3);

        let first_half = store
            .list(&db, None, DateRange::new(Some(date(2025, 1, 1)), Some(date(2025, 7, 1))))
            .await
            .unwrap();
        assert_eq!(first_half.len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = setup_test_db().await;
        let result = CalendarStore::new()
            .update(&db, "missing", entry("x", date(2025, 1, 1)))
            .await;
        assert!(matches!(result, Err(InternalError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_unknown_category_is_validation_error() {
        let db = setup_test_db().await;
        let mut input = entry("Holiday", date(2025, 1, 1));
        input.calendar_category_id = Some("nope".to_string());

        let result = CalendarStore::new().create(&db, input).await;
        assert!(matches!(result, Err(InternalError::Validation(_))));
    }
}
