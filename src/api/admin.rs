use std::sync::Arc;

use chrono::NaiveDate;
use poem_openapi::{
    OpenApi, SecurityScheme, Tags,
    auth::ApiKey,
    param::{Path, Query},
    payload::Json,
};

use crate::api::helpers::require_admin_token;
use crate::app_data::AppData;
use crate::errors::ApiError;
use crate::services::{CalendarService, ReferenceService, SeedService, UserService};
use crate::types::dto::auth::UserProfile;
use crate::types::dto::calendar::{CalendarEntryRequest, CalendarEntryResponse, CreateCalendarEntryApiResponse};
use crate::types::dto::common::NoContentApiResponse;
use crate::types::dto::reference::{CreateReferenceApiResponse, ReferenceInput, ReferenceKind, ReferenceRecord};
use crate::types::dto::seed::SeedResponse;
use crate::types::dto::users::{CreateUserApiResponse, CreateUserRequest, SetPasswordRequest, UpdateUserRequest};

/// Shared admin token sent as `X-Admin-Token`
#[derive(SecurityScheme)]
#[oai(ty = "api_key", key_name = "X-Admin-Token", key_in = "header")]
pub struct AdminTokenAuth(pub ApiKey);

/// Reference data, user, calendar and seeding administration
pub struct AdminApi {
    admin_token: String,
    reference_service: ReferenceService,
    user_service: UserService,
    calendar_service: CalendarService,
    seed_service: SeedService,
}

impl AdminApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            admin_token: app_data.secret_manager.admin_token().to_string(),
            reference_service: ReferenceService::new(Arc::clone(&app_data)),
            user_service: UserService::new(Arc::clone(&app_data)),
            calendar_service: CalendarService::new(Arc::clone(&app_data)),
            seed_service: SeedService::new(app_data),
        }
    }

    fn check(&self, auth: &AdminTokenAuth) -> Result<(), ApiError> {
        require_admin_token(&self.admin_token, auth)
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// Reference data tables
    ReferenceData,
    /// User accounts
    Users,
    /// Calendar entries
    Calendar,
    /// Demo data
    Seeding,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// List users
    #[oai(path = "/users", method = "get", tag = "AdminTags::Users")]
    async fn list_users(&self, auth: AdminTokenAuth) -> Result<Json<Vec<UserProfile>>, ApiError> {
        self.check(&auth)?;
        Ok(Json(self.user_service.list().await?))
    }

    #[oai(path = "/users/:id", method = "get", tag = "AdminTags::Users")]
    async fn get_user(&self, auth: AdminTokenAuth, id: Path<String>) -> Result<Json<UserProfile>, ApiError> {
        self.check(&auth)?;
        Ok(Json(self.user_service.get(&id.0).await?))
    }

    /// Create a user, optionally with an initial password
    #[oai(path = "/users", method = "post", tag = "AdminTags::Users")]
    async fn create_user(
        &self,
        auth: AdminTokenAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<CreateUserApiResponse, ApiError> {
        self.check(&auth)?;
        let profile = self.user_service.create(body.0).await?;
        Ok(CreateUserApiResponse::Created(Json(profile)))
    }

    /// Partial update; absent fields are kept
    #[oai(path = "/users/:id", method = "put", tag = "AdminTags::Users")]
    async fn update_user(
        &self,
        auth: AdminTokenAuth,
        id: Path<String>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserProfile>, ApiError> {
        self.check(&auth)?;
        Ok(Json(self.user_service.update(&id.0, body.0).await?))
    }

    /// Replace a user's password
    #[oai(path = "/users/:id/password", method = "put", tag = "AdminTags::Users")]
    async fn set_user_password(
        &self,
        auth: AdminTokenAuth,
        id: Path<String>,
        body: Json<SetPasswordRequest>,
    ) -> Result<NoContentApiResponse, ApiError> {
        self.check(&auth)?;
        self.user_service.set_password(&id.0, &body.password).await?;
        Ok(NoContentApiResponse::NoContent)
    }

    #[oai(path = "/users/:id", method = "delete", tag = "AdminTags::Users")]
    async fn delete_user(&self, auth: AdminTokenAuth, id: Path<String>) -> Result<NoContentApiResponse, ApiError> {
        self.check(&auth)?;
        self.user_service.delete(&id.0).await?;
        Ok(NoContentApiResponse::NoContent)
    }

    /// Calendar entries, optionally by category and inclusive date range
    #[oai(path = "/calendar-entries", method = "get", tag = "AdminTags::Calendar")]
    async fn list_calendar_entries(
        &self,
        auth: AdminTokenAuth,
        #[oai(name = "categoryId")] category_id: Query<Option<String>>,
        from: Query<Option<NaiveDate>>,
        to: Query<Option<NaiveDate>>,
    ) -> Result<Json<Vec<CalendarEntryResponse>>, ApiError> {
        self.check(&auth)?;
        let entries = self.calendar_service.list(category_id.0, from.0, to.0).await?;
        Ok(Json(entries.into_iter().map(Into::into).collect()))
    }

    #[oai(path = "/calendar-entries", method = "post", tag = "AdminTags::Calendar")]
    async fn create_calendar_entry(
        &self,
        auth: AdminTokenAuth,
        body: Json<CalendarEntryRequest>,
    ) -> Result<CreateCalendarEntryApiResponse, ApiError> {
        self.check(&auth)?;
        let entry = self.calendar_service.create(body.0).await?;
        Ok(CreateCalendarEntryApiResponse::Created(Json(entry.into())))
    }

    #[oai(path = "/calendar-entries/:id", method = "put", tag = "AdminTags::Calendar")]
    async fn update_calendar_entry(
        &self,
        auth: AdminTokenAuth,
        id: Path<String>,
        body: Json<CalendarEntryRequest>,
    ) -> Result<Json<CalendarEntryResponse>, ApiError> {
        self.check(&auth)?;
        let entry = self.calendar_service.update(&id.0, body.0).await?;
        Ok(Json(entry.into()))
    }

    #[oai(path = "/calendar-entries/:id", method = "delete", tag = "AdminTags::Calendar")]
    async fn delete_calendar_entry(
        &self,
        auth: AdminTokenAuth,
        id: Path<String>,
    ) -> Result<NoContentApiResponse, ApiError> {
        self.check(&auth)?;
        self.calendar_service.delete(&id.0).await?;
        Ok(NoContentApiResponse::NoContent)
    }

    /// Insert reference data and demo records; safe to run repeatedly
    #[oai(path = "/seed/test-data", method = "post", tag = "AdminTags::Seeding")]
    async fn seed_test_data(&self, auth: AdminTokenAuth) -> Result<Json<SeedResponse>, ApiError> {
        self.check(&auth)?;
        Ok(Json(self.seed_service.seed().await?))
    }

    /// List rows of a reference table, ordered by natural key
    #[oai(path = "/:kind", method = "get", tag = "AdminTags::ReferenceData")]
    async fn list_reference(
        &self,
        auth: AdminTokenAuth,
        kind: Path<ReferenceKind>,
        #[oai(name = "parentId")] parent_id: Query<Option<String>>,
    ) -> Result<Json<Vec<ReferenceRecord>>, ApiError> {
        self.check(&auth)?;
        Ok(Json(self.reference_service.list(kind.0, parent_id.0).await?))
    }

    #[oai(path = "/:kind/:id", method = "get", tag = "AdminTags::ReferenceData")]
    async fn get_reference(
        &self,
        auth: AdminTokenAuth,
        kind: Path<ReferenceKind>,
        id: Path<String>,
    ) -> Result<Json<ReferenceRecord>, ApiError> {
        self.check(&auth)?;
        Ok(Json(self.reference_service.get(kind.0, &id.0).await?))
    }

    #[oai(path = "/:kind", method = "post", tag = "AdminTags::ReferenceData")]
    async fn create_reference(
        &self,
        auth: AdminTokenAuth,
        kind: Path<ReferenceKind>,
        body: Json<ReferenceInput>,
    ) -> Result<CreateReferenceApiResponse, ApiError> {
        self.check(&auth)?;
        let record = self.reference_service.create(kind.0, body.0).await?;
        Ok(CreateReferenceApiResponse::Created(Json(record)))
    }

    #[oai(path = "/:kind/:id", method = "put", tag = "AdminTags::ReferenceData")]
    async fn update_reference(
        &self,
        auth: AdminTokenAuth,
        kind: Path<ReferenceKind>,
        id: Path<String>,
        body: Json<ReferenceInput>,
    ) -> Result<Json<ReferenceRecord>, ApiError> {
        self.check(&auth)?;
        Ok(Json(self.reference_service.update(kind.0, &id.0, body.0).await?))
    }

    #[oai(path = "/:kind/:id", method = "delete", tag = "AdminTags::ReferenceData")]
    async fn delete_reference(
        &self,
        auth: AdminTokenAuth,
        kind: Path<ReferenceKind>,
        id: Path<String>,
    ) -> Result<NoContentApiResponse, ApiError> {
        self.check(&auth)?;
        self.reference_service.delete(kind.0, &id.0).await?;
        Ok(NoContentApiResponse::NoContent)
    }
}
