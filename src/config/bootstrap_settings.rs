use std::fmt;
use std::str::FromStr;

use crate::config::errors::ConfigError;
use crate::config::{EnvironmentProvider, SystemEnvironment};

const DEFAULT_DATABASE_URL: &str = "sqlite://dsc.db?mode=rwc";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ADMIN_RATE_LIMIT: u32 = 100;
const DEFAULT_ADMIN_RATE_WINDOW_SECS: u64 = 60;

/// Infrastructure settings read once at startup
#[derive(Clone)]
pub struct BootstrapSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    admin_rate_limit: u32,
    admin_rate_window_secs: u64,
    seed_on_startup: bool,
    trust_proxy_headers: bool,
}

impl BootstrapSettings {
    /// Load settings from the given environment provider
    ///
    /// Unset or blank variables fall back to defaults; values that fail to parse
    /// are rejected rather than silently replaced.
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let database_url = env
            .get_non_empty("DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let server_host = env
            .get_non_empty("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let server_port: u16 = parse_or(env, "PORT", DEFAULT_PORT, "port number between 1 and 65535")?;
        if server_port == 0 {
            return Err(ConfigError::invalid_format(
                "PORT",
                "port number between 1 and 65535",
                "0",
            ));
        }

        let admin_rate_limit = parse_or(
            env,
            "ADMIN_RATE_LIMIT",
            DEFAULT_ADMIN_RATE_LIMIT,
            "positive integer",
        )?;
        let admin_rate_window_secs = parse_or(
            env,
            "ADMIN_RATE_WINDOW_SECS",
            DEFAULT_ADMIN_RATE_WINDOW_SECS,
            "positive integer",
        )?;

        Ok(Self {
            database_url,
            server_host,
            server_port,
            admin_rate_limit,
            admin_rate_window_secs,
            seed_on_startup: env.get_flag("SEED_ON_STARTUP"),
            trust_proxy_headers: env.get_flag("TRUST_PROXY_HEADERS"),
        })
    }

    /// Convenience method that uses the system environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Requests allowed per client IP within one admin rate window (0 disables)
    pub fn admin_rate_limit(&self) -> u32 {
        self.admin_rate_limit
    }

    pub fn admin_rate_window_secs(&self) -> u64 {
        self.admin_rate_window_secs
    }

    pub fn seed_on_startup(&self) -> bool {
        self.seed_on_startup
    }

    /// Take the client address from X-Forwarded-For / X-Real-IP; only safe behind a proxy that sets them
    pub fn trust_proxy_headers(&self) -> bool {
        self.trust_proxy_headers
    }

    /// Override the database URL, used by the CLI `--database-url` flag and tests
    pub fn with_database_url(mut self, database_url: &str) -> Self {
        self.database_url = database_url.to_string();
        self
    }
}

fn parse_or<T: FromStr>(
    env: &dyn EnvironmentProvider,
    name: &str,
    default: T,
    expected: &str,
) -> Result<T, ConfigError> {
    match env.get_non_empty(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::invalid_format(name, expected, &raw)),
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("admin_rate_limit", &self.admin_rate_limit)
            .field("admin_rate_window_secs", &self.admin_rate_window_secs)
            .field("seed_on_startup", &self.seed_on_startup)
            .field("trust_proxy_headers", &self.trust_proxy_headers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_defaults_when_nothing_set() {
        let settings = BootstrapSettings::from_env_provider(&MockEnvironment::empty()).unwrap();

        assert_eq!(settings.database_url(), "sqlite://dsc.db?mode=rwc");
        assert_eq!(settings.server_address(), "0.0.0.0:5000");
        assert_eq!(settings.admin_rate_limit(), 100);
        assert_eq!(settings.admin_rate_window_secs(), 60);
        assert!(!settings.seed_on_startup());
        assert!(!settings.trust_proxy_headers());
    }

    #[test]
    fn test_values_from_environment() {
        let env = MockEnvironment::empty().with_vars(&[
            ("DATABASE_URL", "postgres://dsc@localhost/dsc"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("ADMIN_RATE_LIMIT", "5"),
            ("ADMIN_RATE_WINDOW_SECS", "10"),
            ("SEED_ON_STARTUP", "true"),
            ("TRUST_PROXY_HEADERS", "true"),
        ]);
        let settings = BootstrapSettings::from_env_provider(&env).unwrap();

        assert_eq!(settings.database_url(), "postgres://dsc@localhost/dsc");
        assert_eq!(settings.server_address(), "127.0.0.1:8080");
        assert_eq!(settings.admin_rate_limit(), 5);
        assert_eq!(settings.admin_rate_window_secs(), 10);
        assert!(settings.seed_on_startup());
        assert!(settings.trust_proxy_headers());
    }

    #[test]
    fn test_invalid_port_rejected() {
        for port in ["abc", "70000", "0"] {
            let env = MockEnvironment::empty().with_var("PORT", port);
            let result = BootstrapSettings::from_env_provider(&env);
            assert!(
                matches!(result, Err(ConfigError::InvalidFormat { ref setting_name, .. }) if setting_name == "PORT"),
                "port {} should be rejected",
                port
            );
        }
    }

    #[test]
    fn test_database_url_override() {
        let settings = BootstrapSettings::from_env_provider(&MockEnvironment::empty())
            .unwrap()
            .with_database_url("sqlite::memory:");
        assert_eq!(settings.database_url(), "sqlite::memory:");
    }
}
