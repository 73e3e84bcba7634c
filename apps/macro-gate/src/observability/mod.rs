//! Observability module for metrics.
//!
//! Logging is plain `tracing`; the subscriber is set up in the binary.

mod metrics;

pub use self::metrics::{
    AUTH_FAILURES_TOTAL, DECISIONS_TOTAL, EVALUATION_SECONDS, LATENCY_BUCKETS, MetricsError,
    RATE_LIMIT_HITS_TOTAL, init_metrics, record_auth_failure, record_decision,
    record_evaluation_latency, record_rate_limit_hit,
};
