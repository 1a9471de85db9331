use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{ActiveModelBehavior, DatabaseConnection, Set};

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::services::validation::{MissingFields, optional_text, required_text};
use crate::stores::{ProjectStore, WorkItemFilter, WorkItemStore};
use crate::types::db::work_item;
use crate::types::dto::items::{
    CreateWorkItemRequest, DetailedWorkItemResponse, RemainingHoursResponse, UpdateWorkItemRequest,
};
use crate::types::internal::{Caller, DateRange, Period};

/// Mutable work item fields, assembled from a request (and the stored row on update)
#[derive(Debug, Clone, Default)]
struct WorkItemDraft {
    title: String,
    description: Option<String>,
    budget_id: Option<String>,
    project_id: Option<String>,
    work_date: Option<NaiveDate>,
    start_time: Option<String>,
    end_time: Option<String>,
    planned_duration: Option<f64>,
    actual_duration: Option<f64>,
    estimated_hours: Option<f64>,
    activity_code: Option<String>,
    network_number: Option<String>,
    director_code: Option<String>,
    reason_code: Option<String>,
    cpc_code: Option<String>,
}

impl WorkItemDraft {
    fn from_model(model: &work_item::Model) -> Self {
        Self {
            title: model.title.clone(),
            description: model.description.clone(),
            budget_id: model.budget_id.clone(),
            project_id: model.project_id.clone(),
            work_date: model.work_date,
            start_time: model.start_time.clone(),
            end_time: model.end_time.clone(),
            planned_duration: model.planned_duration,
            actual_duration: model.actual_duration,
            estimated_hours: model.estimated_hours,
            activity_code: model.activity_code.clone(),
            network_number: model.network_number.clone(),
            director_code: model.director_code.clone(),
            reason_code: model.reason_code.clone(),
            cpc_code: model.cpc_code.clone(),
        }
    }

    /// Overlay the non-null fields of an update request
    fn merge(&mut self, request: UpdateWorkItemRequest) -> Result<(), InternalError> {
        if let Some(title) = request.title {
            self.title = required_text(&title, "Title")?;
        }

        fn overlay(target: &mut Option<String>, value: Option<String>) {
            if let Some(value) = optional_text(value) {
                *target = Some(value);
            }
        }
        overlay(&mut self.description, request.description);
        overlay(&mut self.budget_id, request.budget_id);
        overlay(&mut self.project_id, request.project_id);
        overlay(&mut self.start_time, request.start_time);
        overlay(&mut self.end_time, request.end_time);
        overlay(&mut self.activity_code, request.activity_code);
        overlay(&mut self.network_number, request.network_number);
        overlay(&mut self.director_code, request.director_code);
        overlay(&mut self.reason_code, request.reason_code);
        overlay(&mut self.cpc_code, request.cpc_code);

        self.work_date = request.work_date.or(self.work_date);
        self.planned_duration = request.planned_duration.or(self.planned_duration);
        self.actual_duration = request.actual_duration.or(self.actual_duration);
        self.estimated_hours = request.estimated_hours.or(self.estimated_hours);
        Ok(())
    }

    fn check_numbers(&self) -> Result<(), InternalError> {
        for (field, value) in [
            ("Planned duration", self.planned_duration),
            ("Actual duration", self.actual_duration),
            ("Estimated hours", self.estimated_hours),
        ] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(InternalError::validation(format!(
                        "{} must be a non-negative number",
                        field
                    )));
                }
            }
        }
        Ok(())
    }

    fn remaining_hours(&self) -> Option<f64> {
        self.estimated_hours
            .map(|estimate| estimate - self.actual_duration.unwrap_or(0.0))
    }

    fn apply_to(self, active: &mut work_item::ActiveModel) {
        active.remaining_hours = Set(self.remaining_hours());
        active.title = Set(self.title);
        active.description = Set(self.description);
        active.budget_id = Set(self.budget_id);
        active.project_id = Set(self.project_id);
        active.work_date = Set(self.work_date);
        active.start_time = Set(self.start_time);
        active.end_time = Set(self.end_time);
        active.planned_duration = Set(self.planned_duration);
        active.actual_duration = Set(self.actual_duration);
        active.estimated_hours = Set(self.estimated_hours);
        active.activity_code = Set(self.activity_code);
        active.network_number = Set(self.network_number);
        active.director_code = Set(self.director_code);
        active.reason_code = Set(self.reason_code);
        active.cpc_code = Set(self.cpc_code);
    }
}

/// Logging, editing and listing work items
pub struct WorkItemService {
    db: DatabaseConnection,
    work_item_store: WorkItemStore,
    project_store: ProjectStore,
}

impl WorkItemService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            work_item_store: app_data.work_item_store,
            project_store: app_data.project_store,
        }
    }

    /// Privileged callers may pick any owner (or none); everyone else sees only their own
    fn scope_owner(caller: &Caller, requested: Option<String>) -> Option<String> {
        if caller.is_privileged() {
            optional_text(requested)
        } else {
            Some(caller.user_id.clone())
        }
    }

    /// Enforce the budget-type branching on a draft
    ///
    /// Expense budgets need director, reason and CPC codes; all other budgets
    /// need a project, activity code and network number. The fields of the
    /// other branch are cleared so exactly one set is populated.
    async fn classify(&self, draft: &mut WorkItemDraft, require_budget: bool) -> Result<(), InternalError> {
        let Some(budget_id) = draft.budget_id.clone() else {
            if require_budget {
                return Err(InternalError::validation("Budget is required"));
            }
            return Ok(());
        };

        let budget = self
            .work_item_store
            .find_budget(&self.db, &budget_id)
            .await?
            .ok_or_else(|| InternalError::validation(format!("Budget not found: {}", budget_id)))?;

        let mut missing = MissingFields::new();
        if budget.is_expense() {
            missing.check("DirectorCode", &draft.director_code);
            missing.check("ReasonCode", &draft.reason_code);
            missing.check("CpcCode", &draft.cpc_code);
            missing.into_result("Expense work item")?;

            draft.project_id = None;
            draft.activity_code = None;
            draft.network_number = None;
        } else {
            missing.check("ProjectId", &draft.project_id);
            missing.check("ActivityCode", &draft.activity_code);
            missing.check("NetworkNumber", &draft.network_number);
            missing.into_result("Project work item")?;

            if let Some(project_id) = &draft.project_id {
                if self.project_store.find(&self.db, project_id).await?.is_none() {
                    return Err(InternalError::validation(format!(
                        "Project not found: {}",
                        project_id
                    )));
                }
            }

            draft.director_code = None;
            draft.reason_code = None;
            draft.cpc_code = None;
        }

        Ok(())
    }

    /// Work items newest first; non-privileged callers only see their own
    pub async fn list(
        &self,
        caller: &Caller,
        owner_id: Option<String>,
    ) -> Result<Vec<work_item::Model>, InternalError> {
        let filter = WorkItemFilter {
            owner_id: Self::scope_owner(caller, owner_id),
            ..Default::default()
        };
        self.work_item_store.list(&self.db, &filter).await
    }

    /// Work items with project, budget and owner display fields
    ///
    /// `period` is resolved against `today`; explicit `from`/`to` override it.
    pub async fn list_detailed(
        &self,
        caller: &Caller,
        owner_id: Option<String>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        period: Option<Period>,
        today: NaiveDate,
    ) -> Result<Vec<DetailedWorkItemResponse>, InternalError> {
        let range = period
            .map(|p| p.resolve(today))
            .unwrap_or_default()
            .with_overrides(from, to);
        check_range(range)?;

        let filter = WorkItemFilter {
            owner_id: Self::scope_owner(caller, owner_id),
            project_id: None,
            range,
        };
        let items = self.work_item_store.list(&self.db, &filter).await?;
        let relations = self.work_item_store.load_relations(&self.db, &items).await?;

        Ok(items
            .into_iter()
            .map(|item| {
                let project = item.project_id.as_ref().and_then(|id| relations.projects.get(id));
                let budget = item.budget_id.as_ref().and_then(|id| relations.budgets.get(id));
                let owner = item.user_id.as_ref().and_then(|id| relations.users.get(id));

                DetailedWorkItemResponse {
                    project_name: project.map(|p| p.name.clone()),
                    project_number: project.map(|p| p.project_number.clone()),
                    budget_name: budget.map(|b| b.name.clone()),
                    is_expense: budget.is_some_and(|b| b.is_expense()),
                    owner_username: owner.map(|u| u.username.clone()),
                    owner_full_name: owner.map(|u| u.full_name()),
                    item: item.into(),
                }
            })
            .collect())
    }

    /// Read access follows the listing rule: owner or any privileged role
    pub async fn get(&self, caller: &Caller, id: &str) -> Result<work_item::Model, InternalError> {
        let item = self.work_item_store.get(&self.db, id).await?;
        if !caller.is_privileged() && item.user_id.as_deref() != Some(caller.user_id.as_str()) {
            return Err(InternalError::forbidden("Work item belongs to another user"));
        }
        Ok(item)
    }

    /// Log a new work item
    ///
    /// The caller owns the item unless an Admin or Manager names another owner.
    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateWorkItemRequest,
    ) -> Result<work_item::Model, InternalError> {
        let owner_id = match optional_text(request.user_id) {
            Some(owner) if owner != caller.user_id && !caller.can_manage_others() => {
                tracing::warn!("User {} tried to log work for {}", caller.user_id, owner);
                return Err(InternalError::forbidden(
                    "Only Admin or Manager users may log work for someone else",
                ));
            }
            Some(owner) => owner,
            None => caller.user_id.clone(),
        };

        let mut draft = WorkItemDraft {
            title: required_text(&request.title, "Title")?,
            description: optional_text(request.description),
            budget_id: optional_text(request.budget_id),
            project_id: optional_text(request.project_id),
            work_date: request.work_date,
            start_time: optional_text(request.start_time),
            end_time: optional_text(request.end_time),
            planned_duration: request.planned_duration,
            actual_duration: request.actual_duration,
            estimated_hours: request.estimated_hours,
            activity_code: optional_text(request.activity_code),
            network_number: optional_text(request.network_number),
            director_code: optional_text(request.director_code),
            reason_code: optional_text(request.reason_code),
            cpc_code: optional_text(request.cpc_code),
        };
        draft.check_numbers()?;
        self.classify(&mut draft, true).await?;

        let mut active = work_item::ActiveModel::new();
        active.user_id = Set(Some(owner_id));
        draft.apply_to(&mut active);

        let item = self.work_item_store.create(&self.db, active).await?;
        tracing::info!("Work item {} '{}' logged by {}", item.id, item.title, caller.user_id);
        Ok(item)
    }

    /// Partial update by the owner or an Admin/Manager
    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        request: UpdateWorkItemRequest,
    ) -> Result<work_item::Model, InternalError> {
        let existing = self.work_item_store.get(&self.db, id).await?;
        Self::check_can_modify(caller, &existing)?;

        let mut draft = WorkItemDraft::from_model(&existing);
        draft.merge(request)?;
        draft.check_numbers()?;
        self.classify(&mut draft, false).await?;

        let mut active: work_item::ActiveModel = existing.into();
        draft.apply_to(&mut active);

        let item = self.work_item_store.update(&self.db, active).await?;
        tracing::info!("Work item {} updated by {}", item.id, caller.user_id);
        Ok(item)
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> Result<(), InternalError> {
        let existing = self.work_item_store.get(&self.db, id).await?;
        Self::check_can_modify(caller, &existing)?;

        self.work_item_store.delete(&self.db, id).await?;
        tracing::info!("Work item {} deleted by {}", id, caller.user_id);
        Ok(())
    }

    /// The caller's own actual hours on a project against its estimate
    pub async fn remaining_hours_for_project(
        &self,
        caller: &Caller,
        project_id: &str,
    ) -> Result<RemainingHoursResponse, InternalError> {
        let project = self.project_store.get(&self.db, project_id).await?;
        let filter = WorkItemFilter {
            owner_id: Some(caller.user_id.clone()),
            project_id: Some(project.id.clone()),
            ..Default::default()
        };
        let used_hours: f64 = self
            .work_item_store
            .list(&self.db, &filter)
            .await?
            .iter()
            .filter_map(|item| item.actual_duration)
            .sum();

        Ok(RemainingHoursResponse {
            project_id: project.id,
            estimated_hours: project.estimated_hours,
            used_hours,
            remaining_hours: project.estimated_hours.map(|estimate| estimate - used_hours),
        })
    }

    fn check_can_modify(caller: &Caller, item: &work_item::Model) -> Result<(), InternalError> {
        if caller.can_modify(item.user_id.as_deref()) {
            return Ok(());
        }
        tracing::warn!(
            "User {} denied modifying work item {} owned by {:?}",
            caller.user_id,
            item.id,
            item.user_id
        );
        Err(InternalError::forbidden(
            "Only the owner or an Admin/Manager may modify this work item",
        ))
    }
}

pub(crate) fn check_range(range: DateRange) -> Result<(), InternalError> {
    match (range.from, range.to) {
        (Some(from), Some(to)) if from > to => Err(InternalError::validation(
            "'from' must not be after 'to'",
        )),
        _ => Ok(()),
    }
}
