//! Prometheus metrics for the decision gate.
//!
//! Metrics are recorded through the `metrics` facade and rendered by the
//! HTTP `/metrics` route from a [`PrometheusHandle`]; no separate listener
//! is started.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Latency buckets from 10us to 100ms. Evaluation is pure and fast.
pub const LATENCY_BUCKETS: [f64; 9] = [
    0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1,
];

/// Decisions, labelled by stage, outcome and reason code.
pub const DECISIONS_TOTAL: &str = "macro_gate_decisions_total";
/// Requests rejected by the rate limiter.
pub const RATE_LIMIT_HITS_TOTAL: &str = "macro_gate_rate_limit_hits_total";
/// Requests rejected by API-key authentication.
pub const AUTH_FAILURES_TOTAL: &str = "macro_gate_auth_failures_total";
/// Wall time of one evaluation.
pub const EVALUATION_SECONDS: &str = "macro_gate_evaluation_seconds";

/// Install the global Prometheus recorder.
///
/// # Errors
///
/// Returns an error if the buckets are rejected or a recorder is already installed.
pub fn init_metrics() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .set_buckets(&LATENCY_BUCKETS)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install_recorder()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!("Prometheus recorder installed");

    Ok(handle)
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure the recorder.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install the recorder.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Record one decision.
///
/// # Arguments
///
/// * `stage` - `"portfolio"` for the constraint stage, `"candidate"` for the gate
/// * `outcome` - `"ok"` or `"no_trade"`
/// * `reason_code` - Rejection code, `"none"` when ok
pub fn record_decision(stage: &'static str, outcome: &'static str, reason_code: &'static str) {
    counter!(
        DECISIONS_TOTAL,
        "stage" => stage,
        "outcome" => outcome,
        "reason_code" => reason_code
    )
    .increment(1);
}

/// Record a request rejected by the rate limiter.
pub fn record_rate_limit_hit() {
    counter!(RATE_LIMIT_HITS_TOTAL).increment(1);
}

/// Record a failed authentication.
///
/// * `reason` - `"missing"` or `"invalid"`
pub fn record_auth_failure(reason: &'static str) {
    counter!(AUTH_FAILURES_TOTAL, "reason" => reason).increment(1);
}

/// Record how long an evaluation took.
pub fn record_evaluation_latency(route: &'static str, seconds: f64) {
    histogram!(EVALUATION_SECONDS, "route" => route).record(seconds);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_recorder(f: impl FnOnce()) -> String {
        let recorder = PrometheusBuilder::new()
            .set_buckets(&LATENCY_BUCKETS)
            .unwrap()
            .build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, f);
        handle.render()
    }

    #[test]
    fn buckets_are_sorted_and_sub_second() {
        assert!(LATENCY_BUCKETS.windows(2).all(|w| w[0] < w[1]));
        assert!(LATENCY_BUCKETS.iter().all(|b| *b < 1.0));
    }

    #[test]
    fn record_without_recorder_is_a_no_op() {
        record_decision("portfolio", "ok", "none");
        record_rate_limit_hit();
        record_auth_failure("missing");
        record_evaluation_latency("decide", 0.0001);
    }

    #[test]
    fn decisions_render_with_labels() {
        let out = with_recorder(|| {
            record_decision("candidate", "no_trade", "COUNTER_TREND_LONG_BANNED");
            record_decision("candidate", "no_trade", "COUNTER_TREND_LONG_BANNED");
        });
        assert!(out.contains(DECISIONS_TOTAL));
        assert!(out.contains("reason_code=\"COUNTER_TREND_LONG_BANNED\""));
        assert!(out.contains("stage=\"candidate\""));
    }

    #[test]
    fn counters_and_histogram_render() {
        let out = with_recorder(|| {
            record_rate_limit_hit();
            record_auth_failure("invalid");
            record_evaluation_latency("gate", 0.0002);
        });
        assert!(out.contains(RATE_LIMIT_HITS_TOTAL));
        assert!(out.contains("reason=\"invalid\""));
        assert!(out.contains("macro_gate_evaluation_seconds_bucket"));
    }
}
