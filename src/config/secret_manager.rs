use std::fmt;

use crate::config::{EnvironmentProvider, SecretConfig, SecretType, SystemEnvironment};

/// Custom error type for secret-related failures
#[derive(Debug)]
pub enum SecretError {
    Missing { secret_name: String },
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Centralized manager for application secrets
///
/// Holds the admin token guarding `/api/admin/*`, the JWT signing key and the
/// password pepper. Values never appear in Debug or Display output.
pub struct SecretManager {
    admin_token: String,
    jwt_secret: String,
    pepper: String,
}

impl SecretManager {
    /// Load and validate all secrets from the process environment
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or too short
    pub fn init() -> Result<Self, SecretError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, SecretError> {
        Ok(Self {
            admin_token: Self::load_secret(env, &Self::admin_token_config())?,
            jwt_secret: Self::load_secret(env, &Self::jwt_config())?,
            pepper: Self::load_secret(env, &Self::pepper_config())?,
        })
    }

    fn admin_token_config() -> SecretConfig {
        SecretConfig::env("ADMIN_TOKEN").required(true).min_length(16)
    }

    fn jwt_config() -> SecretConfig {
        SecretConfig::env("JWT_SECRET").required(true).min_length(32)
    }

    fn pepper_config() -> SecretConfig {
        SecretConfig::env("PASSWORD_PEPPER").required(true).min_length(16)
    }

    pub fn admin_token(&self) -> &str {
        &self.admin_token
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Get the pepper for password hashing
    pub fn pepper(&self) -> &str {
        &self.pepper
    }

    pub(crate) fn load_secret(
        env: &dyn EnvironmentProvider,
        config: &SecretConfig,
    ) -> Result<String, SecretError> {
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => match env.get_var(name) {
                Some(v) => v,
                None if !config.required => return Ok(String::new()),
                None => return Err(SecretError::missing(name)),
            },
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(SecretError::invalid_length(
                    config.secret_type.name(),
                    min_len,
                    value.len(),
                ));
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("admin_token", &"<redacted>")
            .field("jwt_secret", &"<redacted>")
            .field("pepper", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 3 }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn full_env() -> MockEnvironment {
        MockEnvironment::empty().with_vars(&[
            ("ADMIN_TOKEN", "admin-token-0123456789"),
            ("JWT_SECRET", "jwt-secret-0123456789-0123456789-abcdef"),
            ("PASSWORD_PEPPER", "pepper-0123456789"),
        ])
    }

    #[test]
    fn test_loads_all_secrets() {
        let manager = SecretManager::from_env_provider(&full_env()).unwrap();
        assert_eq!(manager.admin_token(), "admin-token-0123456789");
        assert_eq!(manager.pepper(), "pepper-0123456789");
        assert!(manager.jwt_secret().starts_with("jwt-secret"));
    }

    #[test]
    fn test_missing_secret() {
        let env = MockEnvironment::empty().with_vars(&[
            ("ADMIN_TOKEN", "admin-token-0123456789"),
            ("PASSWORD_PEPPER", "pepper-0123456789"),
        ]);
        let result = SecretManager::from_env_provider(&env);
        assert!(matches!(result, Err(SecretError::Missing { ref secret_name }) if secret_name == "JWT_SECRET"));
    }

    #[test]
    fn test_short_secret() {
        let env = full_env().with_var("ADMIN_TOKEN", "short");
        let result = SecretManager::from_env_provider(&env);
        assert!(matches!(
            result,
            Err(SecretError::InvalidLength { expected: 16, actual: 5, .. })
        ));
    }

    #[test]
    fn test_debug_and_display_redact_values() {
        let manager = SecretManager::from_env_provider(&full_env()).unwrap();
        let debug = format!("{:?}", manager);
        let display = format!("{}", manager);

        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("admin-token-0123456789"));
        assert!(!display.contains("pepper-0123456789"));
    }
}
