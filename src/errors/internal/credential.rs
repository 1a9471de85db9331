use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive: {0}")]
    AccountInactive(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Expired token")]
    ExpiredToken,

    /// Token was valid but names a user that no longer exists or is inactive
    #[error("Unknown caller: {0}")]
    UnknownCaller(String),

    #[error("Invalid admin token")]
    InvalidAdminToken,
}
