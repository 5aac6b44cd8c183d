//! Request and response descriptors.
//!
//! # Responsibilities
//! - Disassemble a live request into the fields the guard reads
//! - Resolve the effective scheme (URI, trusted `X-Forwarded-Proto`, listener default)
//! - Hold the mutable response state: status cell plus a header multi-map
//! - Turn a terminal descriptor back into an axum `Response`
//!
//! # Design Decisions
//! - Descriptors are owned by a single in-flight request; nothing is shared
//! - Header values are kept as received; no normalisation or encoding
//! - The `Host` entry in the response map is input only and never sent back

use std::collections::HashMap;

use axum::body::Body;
use axum::http::header::{HeaderName, HeaderValue, HOST};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::Response;

/// Header key the guard reads the authoritative hostname from.
pub const HOST_KEY: &str = "Host";

/// Header key the guard writes redirect targets to.
pub const LOCATION_KEY: &str = "Location";

/// Header set by TLS-terminating load balancers.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Append-only header map: unique keys, ordered values per key.
///
/// Keys are case-sensitive as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMultiMap {
    entries: HashMap<String, Vec<String>>,
}

impl HeaderMultiMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value under `key`, after any values already there.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    /// All values stored under `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// First value stored under `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

/// How the effective scheme of a request is decided.
///
/// The scheme is the transport the request arrived on. A scheme in an
/// absolute-form request target is client input and is never consulted.
#[derive(Debug, Clone)]
pub struct SchemeResolution {
    /// Honour `X-Forwarded-Proto` from a TLS-terminating upstream.
    pub trust_forwarded_proto: bool,

    /// Scheme of the listener the request arrived on.
    pub default_scheme: String,
}

impl Default for SchemeResolution {
    fn default() -> Self {
        Self {
            trust_forwarded_proto: false,
            default_scheme: "http".to_string(),
        }
    }
}

impl SchemeResolution {
    fn resolve(&self, parts: &Parts) -> String {
        if self.trust_forwarded_proto {
            let forwarded = parts
                .headers
                .get(X_FORWARDED_PROTO)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty());
            if let Some(proto) = forwarded {
                return proto.to_string();
            }
        }

        self.default_scheme.clone()
    }
}

/// Read-only view of the request fields the guard needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub scheme: String,
    /// Host as sent by the client, possibly with a `:port` suffix. Empty when absent.
    pub host: String,
    pub path_base: String,
    pub path: String,
    /// Raw query without the leading `?`. Empty means no query.
    pub query_string: String,
}

impl RequestDescriptor {
    /// Build a descriptor from a live request head.
    pub fn from_parts(parts: &Parts, scheme: &SchemeResolution) -> Self {
        let host = parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_default();

        Self {
            scheme: scheme.resolve(parts),
            host,
            path_base: String::new(),
            path: parts.uri.path().to_string(),
            query_string: parts.uri.query().unwrap_or_default().to_string(),
        }
    }
}

/// Error converting a terminal descriptor into a wire response.
#[derive(Debug, thiserror::Error)]
pub enum ResponseConversionError {
    #[error("invalid header name `{0}`")]
    InvalidHeaderName(String),

    #[error("invalid value for header `{name}`: `{value}`")]
    InvalidHeaderValue { name: String, value: String },
}

/// Mutable response state handed to the guard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseDescriptor {
    pub status_code: Option<StatusCode>,
    pub headers: Option<HeaderMultiMap>,
}

impl ResponseDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor whose header map already carries the `Host` entry.
    pub fn seeded_with_host(host: impl Into<String>) -> Self {
        let mut headers = HeaderMultiMap::new();
        headers.append(HOST_KEY, host);
        Self {
            status_code: None,
            headers: Some(headers),
        }
    }

    /// The header map, created empty on first use.
    pub fn headers_mut(&mut self) -> &mut HeaderMultiMap {
        self.headers.get_or_insert_with(HeaderMultiMap::new)
    }

    /// Convert into an empty-bodied response. The `Host` entry is dropped.
    pub fn try_into_response(self) -> Result<Response, ResponseConversionError> {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = self.status_code.unwrap_or(StatusCode::OK);

        let Some(headers) = self.headers else {
            return Ok(response);
        };

        for (key, values) in headers.iter() {
            if key.eq_ignore_ascii_case(HOST_KEY) {
                continue;
            }
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| ResponseConversionError::InvalidHeaderName(key.to_string()))?;
            for value in values {
                let header_value = HeaderValue::from_str(value).map_err(|_| {
                    ResponseConversionError::InvalidHeaderValue {
                        name: key.to_string(),
                        value: value.clone(),
                    }
                })?;
                response.headers_mut().append(name.clone(), header_value);
            }
        }

        Ok(response)
    }
}
