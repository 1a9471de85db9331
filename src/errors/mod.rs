// Errors layer - Error type definitions
pub mod api;
pub mod internal;

// Re-exports for convenience
pub use api::ApiError;
pub use internal::{CredentialError, DatabaseError, InternalError};

#[cfg(test)]
mod api_test;
