use std::net::IpAddr;

use poem::Request;

use crate::api::{AdminTokenAuth, BearerAuth};
use crate::errors::{ApiError, CredentialError, InternalError};
use crate::services::AuthService;
use crate::services::crypto::secrets_match;
use crate::types::internal::Caller;

/// Client address; proxy headers are only read when `trust_proxy_headers` is set
pub fn client_ip(req: &Request, trust_proxy_headers: bool) -> Option<IpAddr> {
    if trust_proxy_headers {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                if let Ok(ip) = ip.trim().parse() {
                    return Some(ip);
                }
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            if let Ok(ip) = real_ip.trim().parse() {
                return Some(ip);
            }
        }
    }

    // Fall back to remote address
    req.remote_addr().as_socket_addr().map(|addr| addr.ip())
}

/// Resolve the bearer token to a live caller
pub async fn authenticate(auth_service: &AuthService, auth: &BearerAuth) -> Result<Caller, ApiError> {
    Ok(auth_service.authenticate(&auth.0.token).await?)
}

/// Check the shared admin token in constant time
pub fn require_admin_token(expected: &str, auth: &AdminTokenAuth) -> Result<(), ApiError> {
    if secrets_match(expected, &auth.0.key) {
        return Ok(());
    }
    tracing::warn!("Rejected request with an invalid admin token");
    Err(InternalError::from(CredentialError::InvalidAdminToken).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use poem_openapi::auth::ApiKey;

    #[test]
    fn test_forwarded_for_takes_first_address() {
        let req = Request::builder()
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .finish();
        assert_eq!(client_ip(&req, true), Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn test_real_ip_header() {
        let req = Request::builder().header("X-Real-IP", "198.51.100.2").finish();
        assert_eq!(client_ip(&req, true), Some("198.51.100.2".parse().unwrap()));
    }

    #[test]
    fn test_garbage_forwarded_for_falls_through() {
        let req = Request::builder()
            .header("X-Forwarded-For", "not-an-ip")
            .header("X-Real-IP", "198.51.100.2")
            .finish();
        assert_eq!(client_ip(&req, true), Some("198.51.100.2".parse().unwrap()));
    }

    #[test]
    fn test_proxy_headers_ignored_unless_trusted() {
        let req = Request::builder()
            .header("X-Forwarded-For", "203.0.113.7")
            .header("X-Real-IP", "198.51.100.2")
            .finish();
        assert_eq!(client_ip(&req, false), None);
    }

    #[test]
    fn test_admin_token_check() {
        let good = AdminTokenAuth(ApiKey {
            key: "s3cret-admin-token".to_string(),
        });
        let bad = AdminTokenAuth(ApiKey {
            key: "wrong".to_string(),
        });

        assert!(require_admin_token("s3cret-admin-token", &good).is_ok());
        let err = require_admin_token("s3cret-admin-token", &bad).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }
}
