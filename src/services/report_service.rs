use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::services::validation::optional_text;
use crate::services::work_item_service::check_range;
use crate::stores::{WorkItemFilter, WorkItemRelations, WorkItemStore};
use crate::types::db::work_item;
use crate::types::dto::reports::{ActivitySummary, ProjectSummary, ReportSummary, UserSummary};
use crate::types::internal::{Caller, DateRange};

/// Filters accepted by the summary report
#[derive(Debug, Clone, Default)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub project_id: Option<String>,
    pub user_id: Option<String>,
}

pub struct ReportService {
    db: DatabaseConnection,
    work_item_store: WorkItemStore,
}

impl ReportService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            work_item_store: app_data.work_item_store,
        }
    }

    /// Hours summary by project, activity code and (for privileged callers) user
    ///
    /// Non-privileged callers always get a report over their own work items,
    /// whatever `user_id` they pass.
    pub async fn summary(&self, caller: &Caller, query: ReportQuery) -> Result<ReportSummary, InternalError> {
        let privileged = caller.is_privileged();
        let range = DateRange::new(query.from, query.to);
        check_range(range)?;

        let owner_id = if privileged {
            optional_text(query.user_id)
        } else {
            Some(caller.user_id.clone())
        };

        let filter = WorkItemFilter {
            owner_id,
            project_id: optional_text(query.project_id),
            range,
        };
        let items = self.work_item_store.list(&self.db, &filter).await?;
        let relations = self.work_item_store.load_relations(&self.db, &items).await?;

        tracing::debug!(
            "Report for {} over {} work items (privileged: {})",
            caller.user_id,
            items.len(),
            privileged
        );

        Ok(aggregate(&items, &relations, range, privileged))
    }
}

#[derive(Default)]
struct Tally {
    hours: f64,
    items: u64,
}

impl Tally {
    fn add(&mut self, hours: f64) {
        self.hours += hours;
        self.items += 1;
    }
}

/// Group already-filtered work items into a report
///
/// Missing actual durations count as zero hours. Each list is sorted by
/// hours, largest first.
pub fn aggregate(
    items: &[work_item::Model],
    relations: &WorkItemRelations,
    range: DateRange,
    privileged: bool,
) -> ReportSummary {
    let mut by_project: BTreeMap<Option<&str>, Tally> = BTreeMap::new();
    let mut by_activity: BTreeMap<&str, Tally> = BTreeMap::new();
    let mut by_user: BTreeMap<&str, (Tally, BTreeSet<&str>)> = BTreeMap::new();
    let mut total_hours = 0.0;

    for item in items {
        let hours = item.actual_duration.unwrap_or(0.0);
        total_hours += hours;

        by_project
            .entry(item.project_id.as_deref())
            .or_default()
            .add(hours);

        if let Some(code) = item.activity_code.as_deref().filter(|c| !c.trim().is_empty()) {
            by_activity.entry(code).or_default().add(hours);
        }

        if privileged {
            if let Some(user_id) = item.user_id.as_deref() {
                let (tally, projects) = by_user.entry(user_id).or_default();
                tally.add(hours);
                if let Some(project_id) = item.project_id.as_deref() {
                    projects.insert(project_id);
                }
            }
        }
    }

    let mut projects: Vec<ProjectSummary> = by_project
        .into_iter()
        .map(|(project_id, tally)| {
            let project = project_id.and_then(|id| relations.projects.get(id));
            let estimated_hours = project.and_then(|p| p.estimated_hours);
            ProjectSummary {
                project_id: project_id.map(str::to_string),
                project_name: project.map(|p| p.name.clone()),
                project_number: project.map(|p| p.project_number.clone()),
                estimated_hours,
                actual_hours: tally.hours,
                item_count: tally.items,
                variance: estimated_hours.map(|estimate| tally.hours - estimate),
                is_over_budget: estimated_hours.is_some_and(|estimate| tally.hours > estimate),
            }
        })
        .collect();
    projects.sort_by(|a, b| b.actual_hours.total_cmp(&a.actual_hours));

    let mut activities: Vec<ActivitySummary> = by_activity
        .into_iter()
        .map(|(code, tally)| ActivitySummary {
            activity_code: code.to_string(),
            total_hours: tally.hours,
            item_count: tally.items,
        })
        .collect();
    activities.sort_by(|a, b| b.total_hours.total_cmp(&a.total_hours));

    let mut users: Vec<UserSummary> = by_user
        .into_iter()
        .map(|(user_id, (tally, project_ids))| {
            let user = relations.users.get(user_id);
            UserSummary {
                user_id: user_id.to_string(),
                full_name: user.map(|u| u.full_name()).unwrap_or_else(|| user_id.to_string()),
                username: user.map(|u| u.username.clone()).unwrap_or_default(),
                total_hours: tally.hours,
                project_count: project_ids.len() as u64,
                item_count: tally.items,
            }
        })
        .collect();
    users.sort_by(|a, b| b.total_hours.total_cmp(&a.total_hours));

    ReportSummary {
        from: range.from,
        to: range.to,
        total_hours,
        total_items: items.len() as u64,
        projects,
        activities,
        users,
        is_privileged_view: privileged,
    }
}
