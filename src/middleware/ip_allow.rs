//! Client IP allow-list middleware

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::future::BoxFuture;
use serde::Serialize;
use std::{
    collections::HashSet,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::warn;

/// Liveness paths reachable from any client
const HEALTH_PATHS: [&str; 2] = ["/health", "/api/v1/health"];

/// Access denied response
#[derive(Serialize)]
struct AccessError {
    error: AccessErrorDetail,
}

#[derive(Serialize)]
struct AccessErrorDetail {
    message: String,
    r#type: String,
    code: String,
}

/// Layer restricting callers to a set of client IPs
#[derive(Clone)]
pub struct IpAllowLayer {
    allowed: Arc<HashSet<IpAddr>>,
}

impl IpAllowLayer {
    pub fn new(allowed: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            allowed: Arc::new(allowed.into_iter().collect()),
        }
    }

    /// Build from configured strings, skipping entries that are not IP addresses
    pub fn from_config(entries: &[String]) -> Self {
        let allowed = entries.iter().filter_map(|entry| {
            let entry = entry.trim();
            match entry.parse::<IpAddr>() {
                Ok(ip) => Some(ip),
                Err(_) => {
                    warn!(entry = %entry, "Ignoring invalid allowed IP");
                    None
                }
            }
        });
        Self::new(allowed)
    }
}

impl<S> Layer<S> for IpAllowLayer {
    type Service = IpAllowMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        IpAllowMiddleware {
            inner,
            allowed: self.allowed.clone(),
        }
    }
}

/// IP allow-list middleware service
#[derive(Clone)]
pub struct IpAllowMiddleware<S> {
    inner: S,
    allowed: Arc<HashSet<IpAddr>>,
}

impl<S> Service<Request<Body>> for IpAllowMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        // Health checks and an unconfigured allow-list pass through
        if self.allowed.is_empty() || is_health_check(request.uri().path()) {
            let future = self.inner.call(request);
            return Box::pin(async move { future.await });
        }

        let client_ip = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| normalize(addr.ip()));

        match client_ip {
            Some(ip) if self.allowed.contains(&ip) => {
                let future = self.inner.call(request);
                Box::pin(async move { future.await })
            }
            Some(ip) => {
                warn!(client_ip = %ip, "Rejected request from non-allowed IP");
                Box::pin(async move { Ok(access_denied_response()) })
            }
            None => {
                warn!("Rejected request without client address");
                Box::pin(async move { Ok(access_denied_response()) })
            }
        }
    }
}

fn is_health_check(path: &str) -> bool {
    HEALTH_PATHS.contains(&path)
}

/// IPv4 clients on a dual-stack socket arrive as IPv4-mapped IPv6
fn normalize(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    }
}

fn access_denied_response() -> Response {
    let error = AccessError {
        error: AccessErrorDetail {
            message: "Access denied".to_string(),
            r#type: "permission_error".to_string(),
            code: "ip_not_allowed".to_string(),
        },
    };

    (StatusCode::FORBIDDEN, Json(error)).into_response()
}
