//! Secure scheme middleware.
//! Runs the guard in front of every handler and stops the chain on insecure requests.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::descriptor::{RequestDescriptor, ResponseDescriptor, SchemeResolution, LOCATION_KEY};
use crate::observability::metrics;
use crate::security::{Outcome, SecureSchemeGuard};

/// State required by the middleware.
#[derive(Clone)]
pub struct RequireHttpsState {
    pub guard: Arc<SecureSchemeGuard>,
    pub scheme: Arc<SchemeResolution>,
}

impl RequireHttpsState {
    pub fn new(guard: SecureSchemeGuard, scheme: SchemeResolution) -> Self {
        Self {
            guard: Arc::new(guard),
            scheme: Arc::new(scheme),
        }
    }
}

pub async fn require_https_middleware(
    State(state): State<RequireHttpsState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let descriptor = RequestDescriptor::from_parts(&parts, &state.scheme);

    // The host seen by the server becomes the response `Host` entry the guard reads.
    let mut response = if descriptor.host.is_empty() {
        ResponseDescriptor::new()
    } else {
        ResponseDescriptor::seeded_with_host(descriptor.host.clone())
    };

    match state.guard.evaluate(&descriptor, &mut response) {
        Ok(Outcome::Delegate) => {
            metrics::record_decision(Outcome::Delegate);
            tracing::debug!(path = %descriptor.path, "Secure request, passing through");
            next.run(Request::from_parts(parts, body)).await
        }
        Ok(outcome) => {
            metrics::record_decision(outcome);
            let location = response
                .headers
                .as_ref()
                .and_then(|h| h.first(LOCATION_KEY))
                .unwrap_or_default()
                .to_string();
            tracing::info!(
                scheme = %descriptor.scheme,
                host = %descriptor.host,
                path = %descriptor.path,
                policy = outcome.as_str(),
                status = ?response.status_code,
                location = %location,
                "Insecure request stopped"
            );

            match response.try_into_response() {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to encode guard response");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }
        }
        Err(e) => {
            metrics::record_missing_host();
            tracing::warn!(
                scheme = %descriptor.scheme,
                path = %descriptor.path,
                error = %e,
                "Cannot build secure redirect"
            );
            (StatusCode::BAD_REQUEST, "Missing Host header").into_response()
        }
    }
}
