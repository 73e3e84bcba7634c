//! Outbound decision DTOs

use serde::{Deserialize, Serialize};

use crate::domain::macro_policy::{Constraints, Decision, GateVerdict, NoTradeReason, Outcome};

fn describe(reason: Option<&NoTradeReason>) -> (Option<String>, Option<String>) {
    reason.map_or((None, None), |r| (Some(r.to_string()), Some(r.code().to_string())))
}

/// Result of the constraint-building stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionDto {
    /// `ok` or `no_trade`.
    pub decision: Outcome,
    /// Human-readable reason, `null` when ok.
    pub reason: Option<String>,
    /// Machine-readable reason code, `null` when ok.
    pub reason_code: Option<String>,
    /// Constraints for the cycle, present even when vetoed.
    pub constraints: Constraints,
}

impl From<Decision> for DecisionDto {
    fn from(d: Decision) -> Self {
        let (reason, reason_code) = describe(d.reason.as_ref());
        Self {
            decision: d.outcome,
            reason,
            reason_code,
            constraints: d.constraints,
        }
    }
}

/// Result of gating one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictDto {
    /// `ok` or `no_trade`.
    pub decision: Outcome,
    /// Human-readable reason, `null` when ok.
    pub reason: Option<String>,
    /// Machine-readable reason code, `null` when ok.
    pub reason_code: Option<String>,
}

impl From<GateVerdict> for VerdictDto {
    fn from(v: GateVerdict) -> Self {
        let (reason, reason_code) = describe(v.reason.as_ref());
        Self {
            decision: v.outcome,
            reason,
            reason_code,
        }
    }
}

/// Full decision cycle: constraints once, then every candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDto {
    /// Outcome of the constraint-building stage.
    pub decision: Outcome,
    /// Reason for a cycle veto.
    pub reason: Option<String>,
    /// Code for a cycle veto.
    pub reason_code: Option<String>,
    /// Constraints for the cycle.
    pub constraints: Constraints,
    /// Per-candidate verdicts in request order. Empty when the cycle was vetoed.
    pub candidates: Vec<VerdictDto>,
}

impl EvaluationDto {
    /// Combine the cycle decision with candidate verdicts.
    #[must_use]
    pub fn new(decision: DecisionDto, candidates: Vec<VerdictDto>) -> Self {
        Self {
            decision: decision.decision,
            reason: decision.reason,
            reason_code: decision.reason_code,
            constraints: decision.constraints,
            candidates,
        }
    }
}
