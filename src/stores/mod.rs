// Stores layer - Data access over SeaORM
pub mod calendar_store;
pub mod credential_store;
pub mod lookup_store;
pub mod project_store;
pub mod user_store;
pub mod work_item_store;

pub use calendar_store::{CalendarEntryInput, CalendarStore};
pub use credential_store::CredentialStore;
pub use lookup_store::LookupStore;
pub use project_store::{NewProject, ProjectChanges, ProjectStore};
pub use user_store::{NewUser, UserChanges, UserStore, UserWithRole};
pub use work_item_store::{WorkItemFilter, WorkItemRelations, WorkItemStore};
