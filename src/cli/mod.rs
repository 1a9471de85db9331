// CLI module for administrative operations run from the server binary

pub mod migrate;
pub mod password_management;
pub mod seed;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// DSC timesheet server and administrative commands
#[derive(Parser, Debug)]
#[command(name = "dsc-timesheet")]
#[command(about = "DSC timesheet backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Serving is the default when no subcommand is given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Insert reference data and demo records
    Seed,

    /// Set a user's login password
    SetPassword {
        /// Username of the account
        username: String,

        /// New password (at least 8 characters)
        password: String,
    },
}

/// Execute a command that needs the full application data
///
/// `Serve` and `Migrate` are handled by the binary itself.
pub async fn execute_command(command: Commands, app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Seed => seed::run_seed(app_data).await?,
        Commands::SetPassword { username, password } => {
            password_management::set_password(app_data, &username, &password).await?
        }
        Commands::Serve | Commands::Migrate => {}
    }

    Ok(())
}
