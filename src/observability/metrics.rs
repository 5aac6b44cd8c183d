//! Metrics collection and exposition.
//!
//! # Metrics
//! - `requires_https_decisions_total` (counter): guard decisions by outcome
//!   (`delegate`, `fixed_redirect`, `rejected`, `secure_redirect`, `missing_host`)

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::security::Outcome;

pub const DECISIONS_TOTAL: &str = "requires_https_decisions_total";

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_decision(outcome: Outcome) {
    metrics::counter!(DECISIONS_TOTAL, "outcome" => outcome.as_str()).increment(1);
}

pub fn record_missing_host() {
    metrics::counter!(DECISIONS_TOTAL, "outcome" => "missing_host").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::TerminalKind;

    #[test]
    fn decisions_are_counted_by_outcome() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_decision(Outcome::Delegate);
            record_decision(Outcome::Terminal(TerminalKind::Rejected));
            record_decision(Outcome::Terminal(TerminalKind::Rejected));
            record_decision(Outcome::Terminal(TerminalKind::SecureRedirect));
            record_missing_host();
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"requires_https_decisions_total{outcome="delegate"} 1"#), "{rendered}");
        assert!(rendered.contains(r#"requires_https_decisions_total{outcome="rejected"} 2"#), "{rendered}");
        assert!(rendered.contains(r#"requires_https_decisions_total{outcome="secure_redirect"} 1"#), "{rendered}");
        assert!(rendered.contains(r#"requires_https_decisions_total{outcome="missing_host"} 1"#), "{rendered}");
        assert!(!rendered.contains(r#"outcome="fixed_redirect""#), "{rendered}");
    }
}
