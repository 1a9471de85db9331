// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod health;
pub mod helpers;
pub mod items;
pub mod projects;
pub mod rate_limit;
pub mod reports;

use std::sync::Arc;
use std::time::Duration;

use poem::{Endpoint, EndpointExt, Response, Route};
use poem_openapi::OpenApiService;

pub use admin::{AdminApi, AdminTokenAuth};
pub use auth::{AuthApi, BearerAuth};
pub use health::HealthApi;
pub use items::ItemsApi;
pub use projects::ProjectsApi;
pub use rate_limit::AdminRateLimit;
pub use reports::ReportsApi;

use crate::app_data::AppData;

type Apis = (HealthApi, AuthApi, AdminApi, ProjectsApi, ItemsApi, ReportsApi);

/// OpenAPI service with every endpoint group, to be nested under `/api`
pub fn api_service(app_data: Arc<AppData>) -> OpenApiService<Apis, ()> {
    let apis = (
        HealthApi::new(Arc::clone(&app_data)),
        AuthApi::new(Arc::clone(&app_data)),
        AdminApi::new(Arc::clone(&app_data)),
        ProjectsApi::new(Arc::clone(&app_data)),
        ItemsApi::new(Arc::clone(&app_data)),
        ReportsApi::new(app_data),
    );

    OpenApiService::new(apis, "DSC Timesheet API", env!("CARGO_PKG_VERSION")).server("/api")
}

/// Compose the full application: API under `/api`, Swagger UI under `/swagger`,
/// and the admin rate limiter in front of both
pub fn build_app(app_data: Arc<AppData>) -> impl Endpoint<Output = Response> {
    let rate_limit = AdminRateLimit::new(
        app_data.settings.admin_rate_limit(),
        Duration::from_secs(app_data.settings.admin_rate_window_secs()),
        app_data.settings.trust_proxy_headers(),
    );

    let api_service = api_service(app_data);
    let ui = api_service.swagger_ui();

    Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .with(rate_limit)
}
