use std::sync::Arc;

use chrono::NaiveDate;
use poem_openapi::{
    OpenApi, Tags,
    param::{Path, Query},
    payload::Json,
};

use crate::api::BearerAuth;
use crate::api::helpers::authenticate;
use crate::app_data::AppData;
use crate::errors::ApiError;
use crate::services::{AuthService, WorkItemService};
use crate::types::dto::common::NoContentApiResponse;
use crate::types::dto::items::{
    CreateWorkItemApiResponse, CreateWorkItemRequest, DetailedWorkItemResponse, RemainingHoursResponse,
    UpdateWorkItemRequest, WorkItemResponse,
};
use crate::types::internal::Period;

/// Work item endpoints
pub struct ItemsApi {
    auth_service: AuthService,
    work_item_service: WorkItemService,
}

impl ItemsApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            auth_service: AuthService::new(Arc::clone(&app_data)),
            work_item_service: WorkItemService::new(app_data),
        }
    }
}

/// API tags for item endpoints
#[derive(Tags)]
enum ApiTags {
    /// Work item management endpoints
    Items,
}

#[OpenApi]
impl ItemsApi {
    /// List work items, newest first
    ///
    /// Plain users always get their own items; privileged roles may pick an owner.
    #[oai(path = "/items", method = "get", tag = "ApiTags::Items")]
    async fn list(
        &self,
        auth: BearerAuth,
        #[oai(name = "ownerId")] owner_id: Query<Option<String>>,
    ) -> Result<Json<Vec<WorkItemResponse>>, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        let items = self.work_item_service.list(&caller, owner_id.0).await?;
        Ok(Json(items.into_iter().map(Into::into).collect()))
    }

    /// Work items with project, budget and owner details
    ///
    /// `period` is resolved against the server's local date; `from` and `to`
    /// override its bounds.
    #[oai(path = "/items/detailed", method = "get", tag = "ApiTags::Items")]
    async fn list_detailed(
        &self,
        auth: BearerAuth,
        #[oai(name = "ownerId")] owner_id: Query<Option<String>>,
        from: Query<Option<NaiveDate>>,
        to: Query<Option<NaiveDate>>,
        period: Query<Option<Period>>,
    ) -> Result<Json<Vec<DetailedWorkItemResponse>>, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        let today = chrono::Local::now().date_naive();
        let items = self
            .work_item_service
            .list_detailed(&caller, owner_id.0, from.0, to.0, period.0, today)
            .await?;
        Ok(Json(items))
    }

    /// The caller's hours on a project against its estimate
    #[oai(path = "/items/remaining-hours/:project_id", method = "get", tag = "ApiTags::Items")]
    async fn remaining_hours(
        &self,
        auth: BearerAuth,
        project_id: Path<String>,
    ) -> Result<Json<RemainingHoursResponse>, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        Ok(Json(
            self.work_item_service
                .remaining_hours_for_project(&caller, &project_id.0)
                .await?,
        ))
    }

    #[oai(path = "/items/:id", method = "get", tag = "ApiTags::Items")]
    async fn get(&self, auth: BearerAuth, id: Path<String>) -> Result<Json<WorkItemResponse>, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        Ok(Json(self.work_item_service.get(&caller, &id.0).await?.into()))
    }

    /// Log a work item
    ///
    /// Budgets named or described as OPEX/expense need director, reason and
    /// CPC codes; other budgets need a project, activity code and network number.
    #[oai(path = "/items", method = "post", tag = "ApiTags::Items")]
    async fn create(
        &self,
        auth: BearerAuth,
        body: Json<CreateWorkItemRequest>,
    ) -> Result<CreateWorkItemApiResponse, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        let item = self.work_item_service.create(&caller, body.0).await?;
        Ok(CreateWorkItemApiResponse::Created(Json(item.into())))
    }

    /// Partial update by the owner or an Admin/Manager
    #[oai(path = "/items/:id", method = "put", tag = "ApiTags::Items")]
    async fn update(
        &self,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateWorkItemRequest>,
    ) -> Result<Json<WorkItemResponse>, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        Ok(Json(self.work_item_service.update(&caller, &id.0, body.0).await?.into()))
    }

    #[oai(path = "/items/:id", method = "delete", tag = "ApiTags::Items")]
    async fn delete(&self, auth: BearerAuth, id: Path<String>) -> Result<NoContentApiResponse, ApiError> {
        let caller = authenticate(&self.auth_service, &auth).await?;
        self.work_item_service.delete(&caller, &id.0).await?;
        Ok(NoContentApiResponse::NoContent)
    }
}
