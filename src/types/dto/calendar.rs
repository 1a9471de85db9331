use chrono::NaiveDate;
use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::types::db::calendar_entry;

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct CalendarEntryResponse {
    pub id: String,
    pub calendar_category_id: Option<String>,
    pub title: String,
    pub entry_date: NaiveDate,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<calendar_entry::Model> for CalendarEntryResponse {
    fn from(model: calendar_entry::Model) -> Self {
        Self {
            id: model.id,
            calendar_category_id: model.calendar_category_id,
            title: model.title,
            entry_date: model.entry_date,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct CalendarEntryRequest {
    pub title: String,
    pub entry_date: NaiveDate,
    pub description: Option<String>,
    pub calendar_category_id: Option<String>,
}

#[derive(ApiResponse, Debug)]
pub enum CreateCalendarEntryApiResponse {
    /// Entry created
    #[oai(status = 201)]
    Created(Json<CalendarEntryResponse>),
}
