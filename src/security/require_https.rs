//! Secure scheme enforcement.
//!
//! Decides what happens to a request that did not arrive over https:
//!
//! ```text
//! scheme == https (any case)     → Delegate
//! fixed redirect target set      → 302, Location = target
//! force_401                      → 401
//! otherwise                      → 302, Location = https://host[:port]{path_base}{path}[?query]
//! ```
//!
//! The checks run in that order. The guard holds only its configuration and
//! never touches the response on the delegate path.

use std::sync::LazyLock;

use axum::http::StatusCode;
use regex::Regex;

use crate::config::schema::{GuardConfig, DEFAULT_HTTPS_PORT};
use crate::http::descriptor::{RequestDescriptor, ResponseDescriptor, HOST_KEY, LOCATION_KEY};

const SECURE_SCHEME: &str = "https";

static PORT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\d+").expect("port pattern is valid"));

/// Which policy ended the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    FixedRedirect,
    Rejected,
    SecureRedirect,
}

impl TerminalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TerminalKind::FixedRedirect => "fixed_redirect",
            TerminalKind::Rejected => "rejected",
            TerminalKind::SecureRedirect => "secure_redirect",
        }
    }
}

/// Result of evaluating a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Already secure; run the rest of the chain and return its response as is.
    Delegate,
    /// The response descriptor is final; the chain must stop here.
    Terminal(TerminalKind),
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Delegate => "delegate",
            Outcome::Terminal(kind) => kind.as_str(),
        }
    }
}

/// Caller contract violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("response headers carry no `Host` entry to build a secure redirect from")]
    MissingHost,
}

/// Redirects or rejects requests that did not arrive over https.
#[derive(Debug, Clone, Default)]
pub struct SecureSchemeGuard {
    config: GuardConfig,
}

impl SecureSchemeGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Decide the fate of one request.
    ///
    /// On `Delegate` the response is left untouched. On `Terminal` its status
    /// is set and, for redirects, one `Location` value is appended.
    ///
    /// # Errors
    ///
    /// [`GuardError::MissingHost`] when a secure URL has to be computed and
    /// the response headers have no `Host` entry. The response is not
    /// modified in that case.
    pub fn evaluate(
        &self,
        request: &RequestDescriptor,
        response: &mut ResponseDescriptor,
    ) -> Result<Outcome, GuardError> {
        if request.scheme.eq_ignore_ascii_case(SECURE_SCHEME) {
            return Ok(Outcome::Delegate);
        }

        if let Some(target) = self.config.fixed_redirect_target() {
            redirect(response, target.to_string());
            return Ok(Outcome::Terminal(TerminalKind::FixedRedirect));
        }

        if self.config.force_401 {
            response.status_code = Some(StatusCode::UNAUTHORIZED);
            return Ok(Outcome::Terminal(TerminalKind::Rejected));
        }

        let host = response
            .headers
            .as_ref()
            .and_then(|headers| headers.first(HOST_KEY))
            .ok_or(GuardError::MissingHost)?;
        let location = self.secure_url(host, request);

        redirect(response, location);
        Ok(Outcome::Terminal(TerminalKind::SecureRedirect))
    }

    /// Rebuild the request URL on the https scheme.
    fn secure_url(&self, host: &str, request: &RequestDescriptor) -> String {
        let hostname = PORT_SUFFIX.replace_all(host, "");

        let mut url = format!("{SECURE_SCHEME}://{hostname}");
        if self.config.https_port_number != DEFAULT_HTTPS_PORT {
            url.push(':');
            url.push_str(&self.config.https_port_number.to_string());
        }
        url.push_str(&request.path_base);
        url.push_str(&request.path);
        if !request.query_string.is_empty() {
            url.push('?');
            url.push_str(&request.query_string);
        }
        url
    }
}

fn redirect(response: &mut ResponseDescriptor, location: String) {
    response.headers_mut().append(LOCATION_KEY, location);
    response.status_code = Some(StatusCode::FOUND);
}
