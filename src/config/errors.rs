use std::fmt;

/// Errors raised while loading bootstrap settings
#[derive(Debug)]
pub enum ConfigError {
    MissingRequiredSetting { setting_name: String },
    InvalidFormat { setting_name: String, expected: String, actual: String },
}

impl ConfigError {
    pub fn invalid_format(setting_name: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidFormat {
            setting_name: setting_name.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiredSetting { setting_name } => {
                write!(f, "Required setting '{}' is missing", setting_name)
            }
            Self::InvalidFormat { setting_name, expected, actual } => {
                write!(
                    f,
                    "Setting '{}' has invalid format. Expected: {}, got: {}",
                    setting_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
