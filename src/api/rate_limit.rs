use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use poem::http::StatusCode;
use poem::web::Json;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};

use crate::api::helpers::client_ip;
use crate::types::dto::common::ErrorResponse;

/// Requests under this path prefix are counted
const ADMIN_PREFIX: &str = "/api/admin";

/// Past this many tracked clients, expired windows are swept on the next check
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client IP
#[derive(Debug)]
pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request; false once the client has used up its window
    pub fn check(&self, ip: IpAddr, now: Instant) -> bool {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if windows.len() > SWEEP_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started) < self.window);
        }

        let entry = windows.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.limit {
            return false;
        }
        entry.count += 1;
        true
    }
}

/// Middleware limiting `/api/admin` traffic per client IP
pub struct AdminRateLimit {
    limiter: Arc<FixedWindowLimiter>,
    trust_proxy_headers: bool,
}

impl AdminRateLimit {
    pub fn new(limit: u32, window: Duration, trust_proxy_headers: bool) -> Self {
        Self {
            limiter: Arc::new(FixedWindowLimiter::new(limit, window)),
            trust_proxy_headers,
        }
    }
}

impl<E: Endpoint> Middleware<E> for AdminRateLimit {
    type Output = AdminRateLimitEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        AdminRateLimitEndpoint {
            inner: ep,
            limiter: Arc::clone(&self.limiter),
            trust_proxy_headers: self.trust_proxy_headers,
        }
    }
}

pub struct AdminRateLimitEndpoint<E> {
    inner: E,
    limiter: Arc<FixedWindowLimiter>,
    trust_proxy_headers: bool,
}

impl<E: Endpoint> Endpoint for AdminRateLimitEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        if req.uri().path().starts_with(ADMIN_PREFIX) {
            let ip = client_ip(&req, self.trust_proxy_headers)
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
            if !self.limiter.check(ip, Instant::now()) {
                tracing::warn!("Admin rate limit exceeded for {}", ip);
                return Ok(too_many_requests());
            }
        }

        self.inner.call(req).await.map(IntoResponse::into_response)
    }
}

fn too_many_requests() -> Response {
    Json(ErrorResponse {
        error: "too_many_requests".to_string(),
        message: "Too many requests, try again later".to_string(),
        status_code: 429,
    })
    .with_status(StatusCode::TOO_MANY_REQUESTS)
    .into_response()
}
