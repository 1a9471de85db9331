// Database entities - SeaORM models
pub mod lookup;

pub mod activity_category;
pub mod activity_code;
pub mod budget;
pub mod calendar_category;
pub mod calendar_entry;
pub mod cpc_code;
pub mod department;
pub mod director_code;
pub mod expense_category;
pub mod expense_option;
pub mod labour_union;
pub mod network_number;
pub mod position;
pub mod project;
pub mod project_assignment;
pub mod reason_code;
pub mod role;
pub mod user;
pub mod work_item;

pub use lookup::LookupEntity;
