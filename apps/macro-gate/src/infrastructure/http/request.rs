//! HTTP request bodies.

use serde::{Deserialize, Serialize};

use crate::application::dto::{CandidateDto, MacroSnapshotDto, PortfolioDto};
use crate::domain::macro_policy::{Constraints, MacroState, MtfTrend};

/// `POST /v1/constraints`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintsRequest {
    /// Macro snapshot.
    #[serde(rename = "macro")]
    pub macro_snapshot: Option<MacroSnapshotDto>,
    /// Portfolio exposure.
    pub portfolio: Option<PortfolioDto>,
}

/// `POST /v1/gate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GateRequest {
    /// Constraints from an earlier `/v1/constraints` call.
    pub constraints: Option<Constraints>,
    /// Candidate trade.
    pub candidate: Option<CandidateDto>,
    /// Macro state the constraints were built under.
    pub macro_state: Option<MacroState>,
    /// Higher-timeframe consensus trend.
    pub mtf_trend: Option<MtfTrend>,
}

/// `POST /v1/decide`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecideRequest {
    /// Macro snapshot.
    #[serde(rename = "macro")]
    pub macro_snapshot: Option<MacroSnapshotDto>,
    /// Portfolio exposure.
    pub portfolio: Option<PortfolioDto>,
    /// Higher-timeframe consensus trend.
    pub mtf_trend: Option<MtfTrend>,
    /// Candidates, gated in order.
    pub candidates: Option<Vec<CandidateDto>>,
}

/// Query string of authenticated routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyQuery {
    /// API key, used when the header is absent.
    pub key: Option<String>,
}
