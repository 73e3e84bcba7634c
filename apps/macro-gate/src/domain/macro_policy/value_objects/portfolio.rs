//! Portfolio exposure snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bucket grouping BTC-correlated exposure.
pub const BTC_BETA_BUCKET: &str = "btc_beta";

/// Informational global cap reported by upstream when none is supplied.
pub const DEFAULT_REPORTED_RISK_CAP_R: f64 = 3.0;

/// Open risk across all live positions, in R-multiples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Total open risk.
    pub open_risk_r: f64,
    /// Global cap as reported upstream. Not authoritative; the policy cap is.
    pub risk_cap_r: f64,
    /// Open risk per named bucket.
    pub buckets: BTreeMap<String, f64>,
}

impl Default for PortfolioSnapshot {
    fn default() -> Self {
        Self {
            open_risk_r: 0.0,
            risk_cap_r: DEFAULT_REPORTED_RISK_CAP_R,
            buckets: BTreeMap::new(),
        }
    }
}

impl PortfolioSnapshot {
    /// Create a snapshot with the given total open risk and no buckets.
    #[must_use]
    pub fn new(open_risk_r: f64) -> Self {
        Self {
            open_risk_r,
            ..Self::default()
        }
    }

    /// Record the open risk of a bucket.
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>, open_r: f64) -> Self {
        self.buckets.insert(bucket.into(), open_r);
        self
    }

    /// Open risk in a bucket, zero when the bucket is not reported.
    #[must_use]
    pub fn bucket_open_r(&self, bucket: &str) -> f64 {
        self.buckets.get(bucket).copied().unwrap_or(0.0)
    }
}
