//! Macro regime snapshot produced upstream by the regime classifier.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Correlation series consulted by the DXY guard.
pub const BTC_DXY_30: &str = "btc_dxy_30";

/// Coarse market-regime label. `RiskOff` is the strictest, `Supportive` the most permissive.
///
/// Unrecognized labels deserialize as `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroState {
    /// Risk-off regime.
    RiskOff,
    /// Caution regime.
    Caution,
    /// Supportive regime.
    Supportive,
    /// Neutral regime, also the fallback for unrecognized labels.
    #[default]
    #[serde(other)]
    Neutral,
}

impl MacroState {
    /// All states, strictest first.
    pub const ALL: [Self; 4] = [Self::RiskOff, Self::Caution, Self::Neutral, Self::Supportive];

    /// Wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RiskOff => "risk_off",
            Self::Caution => "caution",
            Self::Neutral => "neutral",
            Self::Supportive => "supportive",
        }
    }

    /// Whether the BTC-beta bucket cap is enforced in this state.
    #[must_use]
    pub const fn enforces_bucket_caps(self) -> bool {
        matches!(self, Self::RiskOff | Self::Caution)
    }
}

impl fmt::Display for MacroState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dollar index trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DxyTrend {
    /// Dollar strengthening.
    Bullish,
    /// No clear dollar trend.
    #[default]
    Neutral,
    /// Dollar weakening.
    Bearish,
    /// Unknown or unrecognized.
    #[serde(other)]
    Unknown,
}

/// Risk appetite mode. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskMode {
    /// Risk-off.
    Off,
    /// Neutral.
    #[default]
    Neutral,
    /// Risk-on.
    On,
    /// Unknown or unrecognized.
    #[serde(other)]
    Unknown,
}

/// Classifier confidence in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Low confidence.
    Low,
    /// Medium confidence.
    #[default]
    Med,
    /// High confidence.
    High,
    /// Label outside the known set; sized with the fixed fallback multiplier.
    #[serde(other)]
    Unrecognized,
}

/// Immutable macro snapshot for one decision cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroSnapshot {
    /// Regime label.
    pub state: MacroState,
    /// Dollar index trend.
    pub dxy_trend: DxyTrend,
    /// Risk appetite mode.
    pub risk_mode: RiskMode,
    /// Named correlation series. `None` marks a series reported without a value.
    pub correlation: BTreeMap<String, Option<f64>>,
    /// Composite regime score. Carried for forward compatibility, never branched on.
    pub score: Option<f64>,
    /// Classifier confidence.
    pub confidence: Confidence,
}

impl MacroSnapshot {
    /// Create a snapshot in the given state with every other field defaulted.
    #[must_use]
    pub fn new(state: MacroState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Set the dollar index trend.
    #[must_use]
    pub const fn with_dxy_trend(mut self, dxy_trend: DxyTrend) -> Self {
        self.dxy_trend = dxy_trend;
        self
    }

    /// Set the classifier confidence.
    #[must_use]
    pub const fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Record a correlation value for a named series.
    #[must_use]
    pub fn with_correlation(mut self, series: impl Into<String>, value: Option<f64>) -> Self {
        self.correlation.insert(series.into(), value);
        self
    }

    /// Finite value of a correlation series.
    ///
    /// Absent series, series without a value and non-finite values all read as `None`.
    #[must_use]
    pub fn correlation(&self, series: &str) -> Option<f64> {
        self.correlation
            .get(series)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    }
}
