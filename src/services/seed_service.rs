use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate};
use sea_orm::{ActiveModelBehavior, ConnectionTrait, DatabaseConnection, IntoActiveModel, Set};

use crate::app_data::AppData;
use crate::config::{begin_transaction, commit_transaction};
use crate::errors::InternalError;
use crate::stores::{
    CalendarEntryInput, CalendarStore, CredentialStore, LookupStore, NewProject, NewUser, ProjectStore, UserStore,
    WorkItemStore,
};
use crate::types::db::lookup::LookupEntity;
use crate::types::db::{
    activity_category, activity_code, budget, calendar_category, cpc_code, department, director_code,
    expense_category, expense_option, labour_union, network_number, position, reason_code, role, work_item,
};
use crate::types::dto::seed::{SeedResponse, SeedSetResult};
use crate::types::internal::{LookupInput, RoleName};

/// Password given to every demo account
pub const DEMO_PASSWORD: &str = "ChangeMe123!";

/// (key, description, parent key)
type LookupRow = (&'static str, &'static str, Option<&'static str>);

const POSITIONS: &[LookupRow] = &[
    ("Engineer", "Staff engineer", None),
    ("Senior Engineer", "Senior staff engineer", None),
    ("Project Manager", "Owns project delivery", None),
    ("Director", "Department director", None),
];

const DEPARTMENTS: &[LookupRow] = &[
    ("Engineering", "Design and protection engineering", None),
    ("Operations", "Field operations", None),
    ("Finance", "Budgets and cost control", None),
];

const UNIONS: &[LookupRow] = &[
    ("Non-Union", "Not represented", None),
    ("Local 100", "Engineers and technologists", None),
];

const ACTIVITY_CATEGORIES: &[LookupRow] = &[
    ("Engineering", "Design, review and studies", None),
    ("Construction", "Field construction and commissioning", None),
    ("Administration", "Meetings and planning", None),
];

const ACTIVITY_CODES: &[LookupRow] = &[
    ("ENG-01", "Design", Some("Engineering")),
    ("ENG-02", "Design review", Some("Engineering")),
    ("CON-01", "Field work", Some("Construction")),
    ("ADM-01", "Project administration", Some("Administration")),
];

const DIRECTOR_CODES: &[LookupRow] = &[
    ("DIR-100", "Engineering director", None),
    ("DIR-200", "Operations director", None),
];

const REASON_CODES: &[LookupRow] = &[
    ("RSN-TRAVEL", "Business travel", None),
    ("RSN-TRAINING", "Training and certification", None),
];

const CPC_CODES: &[LookupRow] = &[
    ("CPC-1000", "General operating", None),
    ("CPC-2000", "Professional development", None),
];

const BUDGETS: &[LookupRow] = &[
    ("CAPEX", "Capital projects", None),
    ("OPEX", "Operating expense", None),
];

const EXPENSE_CATEGORIES: &[LookupRow] = &[
    ("Travel", "Travel costs", None),
    ("Training", "Courses and conferences", None),
];

const EXPENSE_OPTIONS: &[LookupRow] = &[
    ("Airfare", "Flights", Some("Travel")),
    ("Lodging", "Hotels", Some("Travel")),
    ("Course Fees", "Registration and tuition", Some("Training")),
];

const CALENDAR_CATEGORIES: &[LookupRow] = &[
    ("Holiday", "Statutory holiday", None),
    ("Shutdown", "Planned office closure", None),
];

/// (username, first name, last name, role, position, department)
const DEMO_USERS: &[(&str, &str, &str, RoleName, &str, &str)] = &[
    ("admin", "Alex", "Admin", RoleName::Admin, "Director", "Engineering"),
    ("manager", "Morgan", "Manager", RoleName::Manager, "Project Manager", "Engineering"),
    ("director", "Dana", "Director", RoleName::Director, "Director", "Operations"),
    ("user", "Uma", "User", RoleName::User, "Engineer", "Engineering"),
];

/// (number, name, estimated hours, network number)
const PROJECTS: &[(&str, &str, f64, &str)] = &[
    ("P-1001", "Substation upgrade", 120.0, "NW-1001-A"),
    ("P-1002", "Line maintenance", 80.0, "NW-1002-A"),
];

/// (project number, username, role label, estimated hours)
const ASSIGNMENTS: &[(&str, &str, &str, f64)] = &[
    ("P-1001", "user", "Engineer", 60.0),
    ("P-1002", "user", "Engineer", 40.0),
    ("P-1001", "manager", "Project Manager", 20.0),
];

/// Per-set created/existing counter
struct SetTally {
    name: &'static str,
    created: u64,
    existing: u64,
}

impl SetTally {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            created: 0,
            existing: 0,
        }
    }

    fn record(&mut self, created: bool) {
        if created {
            self.created += 1;
        } else {
            self.existing += 1;
        }
    }

    fn finish(self) -> SeedSetResult {
        SeedSetResult {
            name: self.name.to_string(),
            created: self.created,
            existing: self.existing,
        }
    }
}

/// Populates a database with reference data and demo records
///
/// Every row is looked up by its natural key before insertion so running the
/// seed again creates nothing new.
pub struct SeedService {
    db: DatabaseConnection,
    lookups: LookupStore,
    user_store: UserStore,
    credential_store: Arc<CredentialStore>,
    project_store: ProjectStore,
    work_item_store: WorkItemStore,
    calendar_store: CalendarStore,
}

impl SeedService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            lookups: app_data.lookup_store,
            user_store: app_data.user_store,
            credential_store: Arc::clone(&app_data.credential_store),
            project_store: app_data.project_store,
            work_item_store: app_data.work_item_store,
            calendar_store: app_data.calendar_store,
        }
    }

    /// Seed everything in a single transaction
    pub async fn seed(&self) -> Result<SeedResponse, InternalError> {
        let today = chrono::Utc::now().date_naive();
        let txn = begin_transaction(&self.db).await?;
        let mut sets = Vec::new();

        let role_rows: Vec<LookupRow> = RoleName::ALL
            .iter()
            .map(|role| (role.as_str(), "", None))
            .collect();
        let (result, roles) = self.lookup_set::<role::Entity>(&txn, "roles", &role_rows, &HashMap::new()).await?;
        sets.push(result);

        let (result, positions) = self
            .lookup_set::<position::Entity>(&txn, "positions", POSITIONS, &HashMap::new())
            .await?;
        sets.push(result);

        let (result, departments) = self
            .lookup_set::<department::Entity>(&txn, "departments", DEPARTMENTS, &HashMap::new())
            .await?;
        sets.push(result);

        let (result, _) = self
            .lookup_set::<labour_union::Entity>(&txn, "unions", UNIONS, &HashMap::new())
            .await?;
        sets.push(result);

        let (result, categories) = self
            .lookup_set::<activity_category::Entity>(&txn, "activity categories", ACTIVITY_CATEGORIES, &HashMap::new())
            .await?;
        sets.push(result);

        let (result, _) = self
            .lookup_set::<activity_code::Entity>(&txn, "activity codes", ACTIVITY_CODES, &categories)
            .await?;
        sets.push(result);

        let (result, _) = self
            .lookup_set::<director_code::Entity>(&txn, "director codes", DIRECTOR_CODES, &HashMap::new())
            .await?;
        sets.push(result);

        let (result, _) = self
            .lookup_set::<reason_code::Entity>(&txn, "reason codes", REASON_CODES, &HashMap::new())
            .await?;
        sets.push(result);

        let (result, _) = self
            .lookup_set::<cpc_code::Entity>(&txn, "cpc codes", CPC_CODES, &HashMap::new())
            .await?;
        sets.push(result);

        let (result, budgets) = self
            .lookup_set::<budget::Entity>(&txn, "budgets", BUDGETS, &HashMap::new())
            .await?;
        sets.push(result);

        let (result, expense_categories) = self
            .lookup_set::<expense_category::Entity>(&txn, "expense categories", EXPENSE_CATEGORIES, &HashMap::new())
            .await?;
        sets.push(result);

        let (result, _) = self
            .lookup_set::<expense_option::Entity>(&txn, "expense options", EXPENSE_OPTIONS, &expense_categories)
            .await?;
        sets.push(result);

        let (result, calendar_categories) = self
            .lookup_set::<calendar_category::Entity>(&txn, "calendar categories", CALENDAR_CATEGORIES, &HashMap::new())
            .await?;
        sets.push(result);

        sets.push(self.seed_calendar_entries(&txn, &calendar_categories, today).await?);

        let (result, users) = self.seed_users(&txn, &roles, &positions, &departments).await?;
        sets.push(result);

        let (result, projects) = self.seed_projects(&txn).await?;
        sets.push(result);

        let network_rows: Vec<LookupRow> = PROJECTS
            .iter()
            .map(|(number, _, _, network)| (*network, "Primary network", Some(*number)))
            .collect();
        let (result, _) = self
            .lookup_set::<network_number::Entity>(&txn, "network numbers", &network_rows, &projects)
            .await?;
        sets.push(result);

        sets.push(self.seed_assignments(&txn, &projects, &users).await?);

        sets.push(self.seed_work_items(&txn, &projects, &budgets, &users, today).await?);

        commit_transaction(txn).await?;

        let total_created = sets.iter().map(|set| set.created).sum();
        tracing::info!("Seed complete: {} row(s) created", total_created);

        Ok(SeedResponse { sets, total_created })
    }

    /// Ensure each row of a lookup table, returning key -> id for later parents
    async fn lookup_set<E: LookupEntity>(
        &self,
        conn: &impl ConnectionTrait,
        name: &'static str,
        rows: &[LookupRow],
        parents: &HashMap<String, String>,
    ) -> Result<(SeedSetResult, HashMap<String, String>), InternalError>
    where
        E::Model: IntoActiveModel<E::Active>,
    {
        let mut tally = SetTally::new(name);
        let mut ids = HashMap::new();

        for (key, description, parent_key) in rows {
            let parent_id = match parent_key {
                Some(parent_key) => Some(parents.get(*parent_key).cloned().ok_or_else(|| {
                    InternalError::validation(format!("Seed parent '{}' missing for {} '{}'", parent_key, name, key))
                })?),
                None => None,
            };
            let input = LookupInput {
                key: key.to_string(),
                description: (!description.is_empty()).then(|| description.to_string()),
                parent_id,
                is_active: true,
            };

            let (record, created) = self.lookups.ensure::<E>(conn, input).await?;
            tally.record(created);
            ids.insert(record.key, record.id);
        }

        Ok((tally.finish(), ids))
    }

    async fn seed_calendar_entries(
        &self,
        conn: &impl ConnectionTrait,
        categories: &HashMap<String, String>,
        today: NaiveDate,
    ) -> Result<SeedSetResult, InternalError> {
        let mut tally = SetTally::new("calendar entries");
        let entries = [
            ("New Year's Day", 1, 1, "Holiday"),
            ("Canada Day", 7, 1, "Holiday"),
            ("Year-end shutdown", 12, 27, "Shutdown"),
        ];

        for (title, month, day, category) in entries {
            let Some(entry_date) = NaiveDate::from_ymd_opt(today.year(), month, day) else {
                continue;
            };
            if self
                .calendar_store
                .find_by_title_and_date(conn, title, entry_date)
                .await?
                .is_some()
            {
                tally.record(false);
                continue;
            }

            let input = CalendarEntryInput {
                calendar_category_id: categories.get(category).cloned(),
                title: title.to_string(),
                entry_date,
                description: None,
            };
            self.calendar_store.create(conn, input).await?;
            tally.record(true);
        }

        Ok(tally.finish())
    }

    async fn seed_users(
        &self,
        conn: &impl ConnectionTrait,
        roles: &HashMap<String, String>,
        positions: &HashMap<String, String>,
        departments: &HashMap<String, String>,
    ) -> Result<(SeedSetResult, HashMap<String, String>), InternalError> {
        let mut tally = SetTally::new("users");
        let mut ids = HashMap::new();

        for (username, first_name, last_name, role, position, department) in DEMO_USERS {
            if let Some((existing, _)) = self.user_store.find_by_username(conn, username).await? {
                tally.record(false);
                ids.insert(username.to_string(), existing.id);
                continue;
            }

            let new_user = NewUser {
                username: username.to_string(),
                email: format!("{}@dsc.example.com", username),
                first_name: Some(first_name.to_string()),
                last_name: Some(last_name.to_string()),
                role_id: roles.get(role.as_str()).cloned(),
                position_id: positions.get(*position).cloned(),
                department_id: departments.get(*department).cloned(),
                is_active: true,
                password_hash: Some(self.credential_store.hash_password(DEMO_PASSWORD)?),
            };
            let user = self.user_store.create(conn, new_user).await?;
            tracing::debug!("Seeded user {}", user.username);
            tally.record(true);
            ids.insert(username.to_string(), user.id);
        }

        Ok((tally.finish(), ids))
    }

    async fn seed_projects(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<(SeedSetResult, HashMap<String, String>), InternalError> {
        let mut tally = SetTally::new("projects");
        let mut ids = HashMap::new();

        for (number, name, estimate, _) in PROJECTS {
            let project = match self.project_store.find_by_number(conn, number).await? {
                Some(existing) => {
                    tally.record(false);
                    existing
                }
                None => {
                    let new_project = NewProject {
                        project_number: number.to_string(),
                        name: name.to_string(),
                        description: None,
                        estimated_hours: Some(*estimate),
                        is_active: true,
                    };
                    let created = self.project_store.create(conn, new_project).await?;
                    tally.record(true);
                    created
                }
            };
            ids.insert(number.to_string(), project.id);
        }

        Ok((tally.finish(), ids))
    }

    async fn seed_assignments(
        &self,
        conn: &impl ConnectionTrait,
        projects: &HashMap<String, String>,
        users: &HashMap<String, String>,
    ) -> Result<SeedSetResult, InternalError> {
        let mut tally = SetTally::new("assignments");

        for (number, username, label, hours) in ASSIGNMENTS {
            let (Some(project_id), Some(user_id)) = (projects.get(*number), users.get(*username)) else {
                continue;
            };
            if self.project_store.find_assignment(conn, project_id, user_id).await?.is_some() {
                tally.record(false);
                continue;
            }
            self.project_store
                .upsert_assignment(conn, project_id, user_id, Some(label.to_string()), Some(*hours))
                .await?;
            tally.record(true);
        }

        Ok(tally.finish())
    }

    async fn seed_work_items(
        &self,
        conn: &impl ConnectionTrait,
        projects: &HashMap<String, String>,
        budgets: &HashMap<String, String>,
        users: &HashMap<String, String>,
        today: NaiveDate,
    ) -> Result<SeedSetResult, InternalError> {
        let mut tally = SetTally::new("work items");
        let Some(owner_id) = users.get("user") else {
            return Ok(tally.finish());
        };
        let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);

        let mut design = work_item::ActiveModel::new();
        design.project_id = Set(projects.get("P-1001").cloned());
        design.budget_id = Set(budgets.get("CAPEX").cloned());
        design.work_date = Set(Some(yesterday));
        design.actual_duration = Set(Some(6.0));
        design.estimated_hours = Set(Some(8.0));
        design.remaining_hours = Set(Some(2.0));
        design.activity_code = Set(Some("ENG-01".to_string()));
        design.network_number = Set(Some("NW-1001-A".to_string()));

        let mut inspection = work_item::ActiveModel::new();
        inspection.project_id = Set(projects.get("P-1002").cloned());
        inspection.budget_id = Set(budgets.get("CAPEX").cloned());
        inspection.work_date = Set(Some(today));
        inspection.actual_duration = Set(Some(4.5));
        inspection.activity_code = Set(Some("CON-01".to_string()));
        inspection.network_number = Set(Some("NW-1002-A".to_string()));

        let mut travel = work_item::ActiveModel::new();
        travel.budget_id = Set(budgets.get("OPEX").cloned());
        travel.work_date = Set(Some(today));
        travel.actual_duration = Set(Some(3.0));
        travel.director_code = Set(Some("DIR-100".to_string()));
        travel.reason_code = Set(Some("RSN-TRAVEL".to_string()));
        travel.cpc_code = Set(Some("CPC-1000".to_string()));

        let samples = [
            ("Protection relay design", design),
            ("Conductor inspection", inspection),
            ("Site visit travel", travel),
        ];

        // Columns left NotSet are omitted from the insert and stay NULL
        for (title, mut sample) in samples {
            if self
                .work_item_store
                .find_by_title_and_owner(conn, title, owner_id)
                .await?
                .is_some()
            {
                tally.record(false);
                continue;
            }

            sample.title = Set(title.to_string());
            sample.user_id = Set(Some(owner_id.clone()));
            self.work_item_store.create(conn, sample).await?;
            tally.record(true);
        }

        Ok(tally.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::AuthService;
    use crate::stores::WorkItemFilter;
    use crate::test::utils::setup_test_app_data;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let app_data = setup_test_app_data().await;
        let service = SeedService::new(Arc::clone(&app_data));

        let first = service.seed().await.unwrap();
        assert!(first.total_created > 0);
        assert!(first.sets.iter().all(|set| set.existing == 0));

        let second = service.seed().await.unwrap();
        assert_eq!(second.total_created, 0);
        for (a, b) in first.sets.iter().zip(second.sets.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(b.existing, a.created + a.existing, "set {}", a.name);
        }

        let items = app_data
            .work_item_store
            .list(&app_data.db, &WorkItemFilter::default())
            .await
            .unwrap();
        assert_eq!(items.len(), 3);
    }

    #[tokio::test]
    async fn test_seeded_users_can_log_in() {
        let app_data = setup_test_app_data().await;
        SeedService::new(Arc::clone(&app_data)).seed().await.unwrap();

        let login = AuthService::new(app_data)
            .login("manager", DEMO_PASSWORD)
            .await
            .unwrap();
        assert_eq!(login.role_name.as_deref(), Some("Manager"));
    }

    #[tokio::test]
    async fn test_seed_reports_every_set() {
        let app_data = setup_test_app_data().await;
        let response = SeedService::new(app_data).seed().await.unwrap();

        let names: Vec<&str> = response.sets.iter().map(|set| set.name.as_str()).collect();
        assert!(names.contains(&"roles"));
        assert!(names.contains(&"network numbers"));
        assert!(names.contains(&"work items"));

        let roles = response.sets.iter().find(|set| set.name == "roles").unwrap();
        assert_eq!(roles.created, 4);
    }
}
