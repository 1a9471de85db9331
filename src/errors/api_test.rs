#[cfg(test)]
mod tests {
    use crate::errors::internal::{CredentialError, DatabaseError, InternalError};
    use crate::errors::ApiError;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let error = ApiError::from(InternalError::validation("Title is required"));
        assert!(matches!(error, ApiError::BadRequest(_)));
        assert_eq!(error.status_code(), 400);
        assert_eq!(error.message(), "Title is required");
    }

    #[test]
    fn test_not_found_names_entity_and_id() {
        let error = ApiError::from(InternalError::not_found("Project", "p-1"));
        assert!(matches!(error, ApiError::NotFound(_)));
        assert_eq!(error.message(), "Project not found: p-1");
    }

    #[test]
    fn test_forbidden_and_conflict() {
        assert_eq!(ApiError::from(InternalError::forbidden("nope")).status_code(), 403);
        assert_eq!(ApiError::from(InternalError::conflict("taken")).status_code(), 409);
    }

    #[test]
    fn test_credential_errors_are_unauthorized() {
        for credential in [
            CredentialError::InvalidCredentials,
            CredentialError::AccountInactive("jdoe".to_string()),
            CredentialError::InvalidToken("bad signature".to_string()),
            CredentialError::ExpiredToken,
            CredentialError::UnknownCaller("u1".to_string()),
            CredentialError::InvalidAdminToken,
        ] {
            let error = ApiError::from(InternalError::from(credential));
            assert!(matches!(error, ApiError::Unauthorized(_)));
        }
    }

    #[test]
    fn test_database_errors_hide_details() {
        let error = ApiError::from(InternalError::Database(DatabaseError::Operation {
            operation: "list_projects".to_string(),
            source: sea_orm::DbErr::Custom("connection refused at 10.0.0.1".to_string()),
        }));
        assert!(matches!(error, ApiError::InternalError(_)));
        assert_eq!(error.message(), "An internal error occurred");
    }

    #[test]
    fn test_display_uses_message() {
        let error = ApiError::not_found("User not found: u1");
        assert_eq!(format!("{}", error), "User not found: u1");
    }
}
