use chrono::NaiveDate;
use poem_openapi::Object;

#[derive(Object, Debug, Clone, PartialEq)]
#[oai(rename_all = "camelCase")]
pub struct ProjectSummary {
    /// None groups work items logged without a project
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub project_number: Option<String>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: f64,
    pub item_count: u64,

    /// actual - estimate, only when the project has an estimate
    pub variance: Option<f64>,
    pub is_over_budget: bool,
}

#[derive(Object, Debug, Clone, PartialEq)]
#[oai(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub activity_code: String,
    pub total_hours: f64,
    pub item_count: u64,
}

#[derive(Object, Debug, Clone, PartialEq)]
#[oai(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: String,
    pub full_name: String,
    pub username: String,
    pub total_hours: f64,
    pub project_count: u64,
    pub item_count: u64,
}

#[derive(Object, Debug, Clone, PartialEq)]
#[oai(rename_all = "camelCase")]
pub struct ReportSummary {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub total_hours: f64,
    pub total_items: u64,
    pub projects: Vec<ProjectSummary>,
    pub activities: Vec<ActivitySummary>,

    /// Empty unless the caller is privileged
    pub users: Vec<UserSummary>,
    pub is_privileged_view: bool,
}
