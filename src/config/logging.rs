use std::path::PathBuf;

use crate::config::{EnvironmentProvider, SystemEnvironment};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Configuration for application logging
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_level: String,
    /// Daily-rolling log file, in addition to the console
    pub app_log_file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Load logging configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Self {
        Self {
            log_level: env
                .get_non_empty("LOG_LEVEL")
                .unwrap_or_else(|| "info,sqlx=warn".to_string()),
            app_log_file: env.get_non_empty("APP_LOG_FILE").map(PathBuf::from),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),
    
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
    
    #[error("File system error: {0}")]
    FileSystemError(#[from] std::io::Error),
}

/// Initialize the tracing subscriber with console and optional file output
///
/// Reads `LOG_LEVEL` (an `EnvFilter` directive) and `APP_LOG_FILE`.
pub fn init_logging() -> Result<(), LoggingError> {
    let config = LoggingConfig::from_env();
    
    // Create the environment filter for log level
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| LoggingError::InvalidLogLevel(format!("{}: {}", config.log_level, e)))?;
    
    // Create console layer with human-readable formatting
    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter.clone());
    
    // Build the subscriber with console layer
    let subscriber = tracing_subscriber::registry()
        .with(console_layer);
    
    // Add file layer if configured
    if let Some(log_file_path) = &config.app_log_file {
        // Create parent directory if it doesn't exist
        if let Some(parent) = log_file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        
        // Create file appender with daily rotation
        let file_appender = tracing_appender::rolling::daily(
            log_file_path.parent().unwrap_or_else(|| std::path::Path::new(".")),
            log_file_path.file_name()
                .ok_or_else(|| LoggingError::InitializationError("Invalid log file path".to_string()))?,
        );
        
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter);
        
        subscriber
            .with(file_layer)
            .try_init()
            .map_err(|e| LoggingError::InitializationError(e.to_string()))?;
    } else {
        subscriber
            .try_init()
            .map_err(|e| LoggingError::InitializationError(e.to_string()))?;
    }
    
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::from_env_provider(&MockEnvironment::empty());
        assert_eq!(config.log_level, "info,sqlx=warn");
        assert!(config.app_log_file.is_none());
    }

    #[test]
    fn test_logging_config_from_env() {
        let env = MockEnvironment::empty()
            .with_var("LOG_LEVEL", "debug")
            .with_var("APP_LOG_FILE", "logs/dsc.log");
        let config = LoggingConfig::from_env_provider(&env);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.app_log_file, Some(PathBuf::from("logs/dsc.log")));
    }
}
