//! Per-cycle policy derived from the macro snapshot.

use serde::{Deserialize, Serialize};

/// Aggregate cap used when constraints are built without a policy.
pub const DEFAULT_CAP_AGGREGATE_RISK_R: f64 = 3.0;

/// Derived policy for one decision cycle.
///
/// Serialized as a flat record; the R-denominated caps keep their upstream
/// `_R` suffix on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    /// Reject new longs that run against the higher-timeframe trend.
    pub ban_new_counter_trend_longs: bool,
    /// Entries must align with the higher-timeframe trend.
    pub require_trend_alignment: bool,
    /// Entries need confluence at a meaningful location.
    pub require_location_confluence: bool,
    /// Use tighter stops.
    pub tighten_stop: bool,
    /// Discount long setups.
    pub discount_longs: bool,
    /// Require stronger confirmation before entry.
    pub raise_confirmation_bar: bool,
    /// Trade the normal playbook.
    pub normal_playbook: bool,
    /// Cap on a single trade's initial risk.
    #[serde(rename = "cap_initial_risk_R")]
    pub cap_initial_risk_r: Option<f64>,
    /// Cap on total open risk.
    #[serde(rename = "cap_aggregate_risk_R")]
    pub cap_aggregate_risk_r: f64,
    /// Final position size multiplier.
    pub size_multiplier: f64,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            ban_new_counter_trend_longs: false,
            require_trend_alignment: false,
            require_location_confluence: false,
            tighten_stop: false,
            discount_longs: false,
            raise_confirmation_bar: false,
            normal_playbook: false,
            cap_initial_risk_r: None,
            cap_aggregate_risk_r: DEFAULT_CAP_AGGREGATE_RISK_R,
            size_multiplier: 1.0,
        }
    }
}

impl Constraints {
    /// Fresh constraints with every stance flag cleared.
    #[must_use]
    pub fn with_aggregate_cap(cap_aggregate_risk_r: f64) -> Self {
        Self {
            cap_aggregate_risk_r,
            ..Self::default()
        }
    }

    /// Names of the stance flags currently set, in declaration order.
    #[must_use]
    pub fn active_stances(&self) -> Vec<&'static str> {
        [
            (self.ban_new_counter_trend_longs, "ban_new_counter_trend_longs"),
            (self.require_trend_alignment, "require_trend_alignment"),
            (self.require_location_confluence, "require_location_confluence"),
            (self.tighten_stop, "tighten_stop"),
            (self.discount_longs, "discount_longs"),
            (self.raise_confirmation_bar, "raise_confirmation_bar"),
            (self.normal_playbook, "normal_playbook"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}
