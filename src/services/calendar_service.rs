use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::services::validation::{optional_text, required_text};
use crate::stores::{CalendarEntryInput, CalendarStore};
use crate::types::db::calendar_entry;
use crate::types::dto::calendar::CalendarEntryRequest;
use crate::types::internal::DateRange;

pub struct CalendarService {
    db: DatabaseConnection,
    calendar_store: CalendarStore,
}

impl CalendarService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            calendar_store: app_data.calendar_store,
        }
    }

    fn normalize(request: CalendarEntryRequest) -> Result<CalendarEntryInput, InternalError> {
        Ok(CalendarEntryInput {
            title: required_text(&request.title, "Title")?,
            entry_date: request.entry_date,
            description: optional_text(request.description),
            calendar_category_id: optional_text(request.calendar_category_id),
        })
    }

    pub async fn list(
        &self,
        category_id: Option<String>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<calendar_entry::Model>, InternalError> {
        let category_id = optional_text(category_id);
        self.calendar_store
            .list(&self.db, category_id.as_deref(), DateRange::new(from, to))
            .await
    }

    pub async fn create(&self, request: CalendarEntryRequest) -> Result<calendar_entry::Model, InternalError> {
        let input = Self::normalize(request)?;
        let entry = self.calendar_store.create(&self.db, input).await?;

        tracing::info!("Created calendar entry '{}' on {}", entry.title, entry.entry_date);
        Ok(entry)
    }

    pub async fn update(
        &self,
        id: &str,
        request: CalendarEntryRequest,
    ) -> Result<calendar_entry::Model, InternalError> {
        self.calendar_store.get(&self.db, id).await?;
        let input = Self::normalize(request)?;
        let entry = self.calendar_store.update(&self.db, id, input).await?;

        tracing::info!("Updated calendar entry {}", entry.id);
        Ok(entry)
    }

    pub async fn delete(&self, id: &str) -> Result<(), InternalError> {
        self.calendar_store.delete(&self.db, id).await?;
        tracing::info!("Deleted calendar entry {}", id);
        Ok(())
    }
}
