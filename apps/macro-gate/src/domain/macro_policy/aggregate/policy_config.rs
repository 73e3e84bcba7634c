//! Policy Config Aggregate
//!
//! Static per-state numeric policy. Every per-state table is a fixed-shape
//! record over [`MacroState`], so a lookup can never miss a state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::macro_policy::errors::PolicyError;
use crate::domain::macro_policy::value_objects::{
    BTC_BETA_BUCKET, Confidence, DEFAULT_CAP_AGGREGATE_RISK_R, MacroState,
};

/// Multiplier applied for confidence labels outside the known set.
pub const FALLBACK_CONFIDENCE_MULTIPLIER: f64 = 0.75;

/// Default correlation below which the DXY guard fires.
pub const DEFAULT_CORRELATION_BEARISH_THRESHOLD: f64 = -0.5;

/// One value per macro state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTable<T> {
    /// Value under `risk_off`.
    pub risk_off: T,
    /// Value under `caution`.
    pub caution: T,
    /// Value under `neutral`.
    pub neutral: T,
    /// Value under `supportive`.
    pub supportive: T,
}

impl<T: Copy> StateTable<T> {
    /// Create a table, strictest state first.
    #[must_use]
    pub const fn new(risk_off: T, caution: T, neutral: T, supportive: T) -> Self {
        Self {
            risk_off,
            caution,
            neutral,
            supportive,
        }
    }

    /// Value for `state`.
    #[must_use]
    pub const fn get(&self, state: MacroState) -> T {
        match state {
            MacroState::RiskOff => self.risk_off,
            MacroState::Caution => self.caution,
            MacroState::Neutral => self.neutral,
            MacroState::Supportive => self.supportive,
        }
    }

    /// `(state, value)` pairs, strictest first.
    pub fn iter(&self) -> impl Iterator<Item = (MacroState, T)> + '_ {
        MacroState::ALL.into_iter().map(|s| (s, self.get(s)))
    }
}

/// Default BTC-beta bucket caps.
pub const DEFAULT_BTC_BETA_CAPS_R: StateTable<f64> = StateTable::new(1.0, 1.5, 2.0, 2.5);

/// Default initial risk caps.
pub const DEFAULT_INITIAL_RISK_CAPS_R: StateTable<f64> = StateTable::new(0.5, 0.75, 1.0, 1.0);

/// Default size multiplier ceilings.
pub const DEFAULT_SIZE_MULTIPLIERS: StateTable<f64> = StateTable::new(0.5, 0.5, 1.0, 1.0);

/// Multiplier per known confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceTable {
    /// Low confidence.
    pub low: f64,
    /// Medium confidence.
    pub med: f64,
    /// High confidence.
    pub high: f64,
}

impl ConfidenceTable {
    /// Multiplier for `confidence`. Unrecognized labels always get the fixed fallback.
    #[must_use]
    pub const fn get(&self, confidence: Confidence) -> f64 {
        match confidence {
            Confidence::Low => self.low,
            Confidence::Med => self.med,
            Confidence::High => self.high,
            Confidence::Unrecognized => FALLBACK_CONFIDENCE_MULTIPLIER,
        }
    }
}

impl Default for ConfidenceTable {
    fn default() -> Self {
        Self {
            low: 0.5,
            med: 0.75,
            high: 1.0,
        }
    }
}

/// Policy Config Aggregate - immutable once built, shared read-only by all callers.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    initial_risk_caps_r: StateTable<f64>,
    size_multipliers: StateTable<f64>,
    bucket_caps_r: BTreeMap<String, StateTable<f64>>,
    confidence_multipliers: ConfidenceTable,
    correlation_bearish_threshold: f64,
    cap_aggregate_risk_r: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            initial_risk_caps_r: DEFAULT_INITIAL_RISK_CAPS_R,
            size_multipliers: DEFAULT_SIZE_MULTIPLIERS,
            bucket_caps_r: BTreeMap::from([(BTC_BETA_BUCKET.to_string(), DEFAULT_BTC_BETA_CAPS_R)]),
            confidence_multipliers: ConfidenceTable::default(),
            correlation_bearish_threshold: DEFAULT_CORRELATION_BEARISH_THRESHOLD,
            cap_aggregate_risk_r: DEFAULT_CAP_AGGREGATE_RISK_R,
        }
    }
}

impl PolicyConfig {
    /// Start a builder seeded with the default table.
    #[must_use]
    pub fn builder() -> PolicyConfigBuilder {
        PolicyConfigBuilder::default()
    }

    /// Initial risk cap for `state`.
    #[must_use]
    pub const fn initial_risk_cap_r(&self, state: MacroState) -> f64 {
        self.initial_risk_caps_r.get(state)
    }

    /// Size multiplier ceiling for `state`.
    #[must_use]
    pub const fn size_multiplier(&self, state: MacroState) -> f64 {
        self.size_multipliers.get(state)
    }

    /// Confidence discount.
    #[must_use]
    pub const fn confidence_multiplier(&self, confidence: Confidence) -> f64 {
        self.confidence_multipliers.get(confidence)
    }

    /// Cap for a named bucket under `state`, if the bucket is configured.
    #[must_use]
    pub fn bucket_cap_r(&self, bucket: &str, state: MacroState) -> Option<f64> {
        self.bucket_caps_r.get(bucket).map(|t| t.get(state))
    }

    /// Cap for the BTC-beta bucket under `state`.
    #[must_use]
    pub fn btc_beta_cap_r(&self, state: MacroState) -> f64 {
        self.bucket_cap_r(BTC_BETA_BUCKET, state)
            .unwrap_or_else(|| DEFAULT_BTC_BETA_CAPS_R.get(state))
    }

    /// Names of the configured buckets.
    pub fn buckets(&self) -> impl Iterator<Item = &str> {
        self.bucket_caps_r.keys().map(String::as_str)
    }

    /// Correlation below which the DXY guard fires.
    #[must_use]
    pub const fn correlation_bearish_threshold(&self) -> f64 {
        self.correlation_bearish_threshold
    }

    /// Authoritative aggregate risk cap.
    #[must_use]
    pub const fn cap_aggregate_risk_r(&self) -> f64 {
        self.cap_aggregate_risk_r
    }
}

/// Builds a validated [`PolicyConfig`]. Anything left unset keeps its default.
#[derive(Debug, Clone, Default)]
pub struct PolicyConfigBuilder {
    config: PolicyConfig,
}

impl PolicyConfigBuilder {
    /// Set the initial risk caps.
    #[must_use]
    pub const fn initial_risk_caps_r(mut self, table: StateTable<f64>) -> Self {
        self.config.initial_risk_caps_r = table;
        self
    }

    /// Set the size multiplier ceilings.
    #[must_use]
    pub const fn size_multipliers(mut self, table: StateTable<f64>) -> Self {
        self.config.size_multipliers = table;
        self
    }

    /// Set or replace the caps of one bucket.
    #[must_use]
    pub fn bucket_caps_r(mut self, bucket: impl Into<String>, table: StateTable<f64>) -> Self {
        self.config.bucket_caps_r.insert(bucket.into(), table);
        self
    }

    /// Set the confidence multipliers.
    #[must_use]
    pub const fn confidence_multipliers(mut self, table: ConfidenceTable) -> Self {
        self.config.confidence_multipliers = table;
        self
    }

    /// Set the correlation bearish threshold.
    #[must_use]
    pub const fn correlation_bearish_threshold(mut self, threshold: f64) -> Self {
        self.config.correlation_bearish_threshold = threshold;
        self
    }

    /// Set the aggregate risk cap.
    #[must_use]
    pub const fn cap_aggregate_risk_r(mut self, cap: f64) -> Self {
        self.config.cap_aggregate_risk_r = cap;
        self
    }

    /// Validate and freeze the table.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] if any cap or multiplier is non-finite or
    /// negative, or if the threshold lies outside [-1, 1].
    pub fn build(self) -> Result<PolicyConfig, PolicyError> {
        let c = &self.config;

        check_table("initial_risk_caps_r", &c.initial_risk_caps_r)?;
        check_table("size_multipliers", &c.size_multipliers)?;
        for (bucket, table) in &c.bucket_caps_r {
            check_table(&format!("bucket_caps_r.{bucket}"), table)?;
        }
        check_non_negative("confidence_multipliers.low", c.confidence_multipliers.low)?;
        check_non_negative("confidence_multipliers.med", c.confidence_multipliers.med)?;
        check_non_negative("confidence_multipliers.high", c.confidence_multipliers.high)?;
        check_non_negative("cap_aggregate_risk_r", c.cap_aggregate_risk_r)?;

        let threshold = c.correlation_bearish_threshold;
        check_finite("correlation_bearish_threshold", threshold)?;
        if !(-1.0..=1.0).contains(&threshold) {
            return Err(PolicyError::ThresholdOutOfRange(threshold));
        }

        Ok(self.config)
    }
}

fn check_table(name: &str, table: &StateTable<f64>) -> Result<(), PolicyError> {
    for (state, value) in table.iter() {
        check_non_negative(&format!("{name}.{state}"), value)?;
    }
    Ok(())
}

fn check_finite(field: &str, value: f64) -> Result<(), PolicyError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PolicyError::NonFinite {
            field: field.to_string(),
            value,
        })
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<(), PolicyError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(PolicyError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}
