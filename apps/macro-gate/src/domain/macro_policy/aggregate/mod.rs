//! Macro Policy Aggregates

mod policy_config;

pub use policy_config::{
    ConfidenceTable, DEFAULT_BTC_BETA_CAPS_R, DEFAULT_CORRELATION_BEARISH_THRESHOLD,
    DEFAULT_INITIAL_RISK_CAPS_R, DEFAULT_SIZE_MULTIPLIERS, FALLBACK_CONFIDENCE_MULTIPLIER,
    PolicyConfig, PolicyConfigBuilder, StateTable,
};
