//! Macro policy configuration.
//!
//! Every per-state map is optional field by field; missing states keep the
//! built-in table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::macro_policy::aggregate::{
    ConfidenceTable, DEFAULT_BTC_BETA_CAPS_R, DEFAULT_CORRELATION_BEARISH_THRESHOLD,
    DEFAULT_INITIAL_RISK_CAPS_R, DEFAULT_SIZE_MULTIPLIERS,
};
use crate::domain::macro_policy::value_objects::DEFAULT_CAP_AGGREGATE_RISK_R;
use crate::domain::macro_policy::{PolicyConfig, PolicyError, StateTable};

/// Partial per-state values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateOverrides {
    /// `risk_off` value.
    pub risk_off: Option<f64>,
    /// `caution` value.
    pub caution: Option<f64>,
    /// `neutral` value.
    pub neutral: Option<f64>,
    /// `supportive` value.
    pub supportive: Option<f64>,
}

impl StateOverrides {
    /// Fill the gaps from `base`.
    #[must_use]
    pub fn over(&self, base: StateTable<f64>) -> StateTable<f64> {
        StateTable::new(
            self.risk_off.unwrap_or(base.risk_off),
            self.caution.unwrap_or(base.caution),
            self.neutral.unwrap_or(base.neutral),
            self.supportive.unwrap_or(base.supportive),
        )
    }
}

/// Partial confidence multipliers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceOverrides {
    /// Low confidence.
    pub low: Option<f64>,
    /// Medium confidence.
    pub med: Option<f64>,
    /// High confidence.
    pub high: Option<f64>,
}

/// Policy section of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    /// Aggregate open risk cap.
    #[serde(alias = "cap_aggregate_risk_R")]
    pub cap_aggregate_risk_r: f64,
    /// Correlation below which the DXY guard fires.
    #[serde(alias = "corr30_bearish_threshold")]
    pub correlation_bearish_threshold: f64,
    /// Initial risk caps per state.
    #[serde(alias = "initial_risk_cap_R")]
    pub initial_risk_cap_r: StateOverrides,
    /// Size multiplier ceilings per state.
    pub size_multiplier: StateOverrides,
    /// Confidence multipliers.
    pub confidence_multiplier: ConfidenceOverrides,
    /// Bucket caps per bucket per state. Missing states use the BTC-beta defaults.
    #[serde(alias = "bucket_caps_R")]
    pub bucket_caps_r: BTreeMap<String, StateOverrides>,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            cap_aggregate_risk_r: DEFAULT_CAP_AGGREGATE_RISK_R,
            correlation_bearish_threshold: DEFAULT_CORRELATION_BEARISH_THRESHOLD,
            initial_risk_cap_r: StateOverrides::default(),
            size_multiplier: StateOverrides::default(),
            confidence_multiplier: ConfidenceOverrides::default(),
            bucket_caps_r: BTreeMap::new(),
        }
    }
}

impl PolicySettings {
    /// Build the validated policy table.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] for non-finite or negative values or an out-of-range threshold.
    pub fn to_policy(&self) -> Result<PolicyConfig, PolicyError> {
        let defaults = ConfidenceTable::default();
        let confidence = ConfidenceTable {
            low: self.confidence_multiplier.low.unwrap_or(defaults.low),
            med: self.confidence_multiplier.med.unwrap_or(defaults.med),
            high: self.confidence_multiplier.high.unwrap_or(defaults.high),
        };

        let builder = PolicyConfig::builder()
            .cap_aggregate_risk_r(self.cap_aggregate_risk_r)
            .correlation_bearish_threshold(self.correlation_bearish_threshold)
            .initial_risk_caps_r(self.initial_risk_cap_r.over(DEFAULT_INITIAL_RISK_CAPS_R))
            .size_multipliers(self.size_multiplier.over(DEFAULT_SIZE_MULTIPLIERS))
            .confidence_multipliers(confidence);

        self.bucket_caps_r
            .iter()
            .fold(builder, |b, (bucket, caps)| {
                b.bucket_caps_r(bucket.as_str(), caps.over(DEFAULT_BTC_BETA_CAPS_R))
            })
            .build()
    }
}
