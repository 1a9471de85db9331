// Services layer - Business logic and orchestration
pub mod auth_service;
pub mod calendar_service;
pub mod crypto;
pub mod project_service;
pub mod reference_service;
pub mod report_service;
pub mod seed_service;
pub mod token_service;
pub mod user_service;
pub mod validation;
pub mod work_item_service;

pub use auth_service::AuthService;
pub use calendar_service::CalendarService;
pub use project_service::ProjectService;
pub use reference_service::ReferenceService;
pub use report_service::{ReportQuery, ReportService};
pub use seed_service::SeedService;
pub use token_service::TokenService;
pub use user_service::UserService;
pub use work_item_service::WorkItemService;
