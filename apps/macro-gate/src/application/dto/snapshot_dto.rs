//! Inbound snapshot DTOs
//!
//! Wire shapes of the macro snapshot, portfolio snapshot and candidate.
//! Every field is optional; `null` and absent fields take the documented
//! defaults. Numeric fields also accept numeric strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::macro_policy::{
    Candidate, Confidence, Direction, DxyTrend, MacroSnapshot, MacroState, PortfolioSnapshot,
    RiskMode,
};
use crate::domain::macro_policy::value_objects::DEFAULT_REPORTED_RISK_CAP_R;

/// Parse a JSON number or numeric string. Anything else, and non-finite results, is `None`.
#[must_use]
pub fn lenient_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Entries of a JSON object, each parsed with [`lenient_f64`]. Non-objects are empty.
fn lenient_map(value: Option<&Value>) -> BTreeMap<String, Option<f64>> {
    match value {
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(name, v)| (name.clone(), lenient_f64(v)))
            .collect(),
        _ => BTreeMap::new(),
    }
}

/// Numeric elements of a JSON array, in order. Unparsable elements and non-arrays are dropped.
fn lenient_vec(value: Option<&Value>) -> Vec<f64> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(lenient_f64).collect(),
        _ => Vec::new(),
    }
}

/// Macro snapshot as emitted by the regime classifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroSnapshotDto {
    /// Regime label.
    pub state: Option<MacroState>,
    /// Dollar index trend.
    pub dxy_trend: Option<DxyTrend>,
    /// Risk appetite mode.
    pub risk_mode: Option<RiskMode>,
    /// Named correlation series.
    pub corr: Option<Value>,
    /// Composite score.
    pub score: Option<Value>,
    /// Classifier confidence.
    pub confidence: Option<Confidence>,
}

impl From<MacroSnapshotDto> for MacroSnapshot {
    fn from(dto: MacroSnapshotDto) -> Self {
        let correlation = lenient_map(dto.corr.as_ref());

        Self {
            state: dto.state.unwrap_or_default(),
            dxy_trend: dto.dxy_trend.unwrap_or_default(),
            risk_mode: dto.risk_mode.unwrap_or_default(),
            correlation,
            score: dto.score.as_ref().and_then(lenient_f64),
            confidence: dto.confidence.unwrap_or_default(),
        }
    }
}

/// Portfolio exposure snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioDto {
    /// Total open risk.
    #[serde(rename = "open_risk_R")]
    pub open_risk_r: Option<Value>,
    /// Informational global cap.
    #[serde(rename = "risk_cap_R")]
    pub risk_cap_r: Option<Value>,
    /// Open risk per bucket.
    pub buckets: Option<Value>,
}

impl From<PortfolioDto> for PortfolioSnapshot {
    fn from(dto: PortfolioDto) -> Self {
        // Unreported or unparsable buckets read as zero exposure, same as absent ones.
        let buckets = lenient_map(dto.buckets.as_ref())
            .into_iter()
            .filter_map(|(bucket, open_r)| open_r.map(|r| (bucket, r)))
            .collect();

        Self {
            open_risk_r: dto.open_risk_r.as_ref().and_then(lenient_f64).unwrap_or(0.0),
            risk_cap_r: dto
                .risk_cap_r
                .as_ref()
                .and_then(lenient_f64)
                .unwrap_or(DEFAULT_REPORTED_RISK_CAP_R),
            buckets,
        }
    }
}

/// A proposed trade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateDto {
    /// Invalidation level.
    pub invalidate: Option<Value>,
    /// Initial risk in R.
    #[serde(rename = "risk_R")]
    pub risk_r: Option<Value>,
    /// Take-profit targets. Elements that are not numbers are dropped.
    pub tp: Option<Value>,
    /// Direction. Unknown strings are rejected at deserialization.
    pub direction: Option<Direction>,
}

impl From<CandidateDto> for Candidate {
    fn from(dto: CandidateDto) -> Self {
        Self {
            invalidate: dto.invalidate.as_ref().and_then(lenient_f64),
            risk_r: dto.risk_r.as_ref().and_then(lenient_f64),
            take_profits: lenient_vec(dto.tp.as_ref()),
            direction: dto.direction.unwrap_or_default(),
        }
    }
}
