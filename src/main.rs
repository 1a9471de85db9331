use std::sync::Arc;

use clap::Parser;
use poem::{Server, listener::TcpListener};

use dsc_timesheet::api::build_app;
use dsc_timesheet::app_data::AppData;
use dsc_timesheet::cli::{self, Cli, Commands};
use dsc_timesheet::config::{BootstrapSettings, init_logging};
use dsc_timesheet::services::{ReferenceService, SeedService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let command = cli.command();
    let settings = BootstrapSettings::from_env()?;
    tracing::debug!("Loaded settings: {:?}", settings);

    if command == Commands::Migrate {
        return cli::migrate::run_migrations(&settings).await;
    }

    let app_data = Arc::new(AppData::init(settings).await?);

    // Role rows back the closed role enumeration; make sure all four exist
    ReferenceService::new(Arc::clone(&app_data)).ensure_roles().await?;

    if command != Commands::Serve {
        return cli::execute_command(command, app_data).await;
    }

    if app_data.settings.seed_on_startup() {
        let seeded = SeedService::new(Arc::clone(&app_data)).seed().await?;
        tracing::info!("Startup seed created {} row(s)", seeded.total_created);
    }

    let address = app_data.settings.server_address();
    let port = app_data.settings.server_port();
    let app = build_app(app_data);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://localhost:{}/swagger", port);
    tracing::info!("API endpoints available at http://localhost:{}/api", port);

    Server::new(TcpListener::bind(address)).run(app).await?;
    Ok(())
}
