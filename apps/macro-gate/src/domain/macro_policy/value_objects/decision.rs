//! Decision outcomes and rejection reasons.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::constraints::Constraints;
use super::macro_snapshot::MacroState;
use super::portfolio::BTC_BETA_BUCKET;

/// Verdict of either stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Proceed.
    Ok,
    /// Do not trade.
    NoTrade,
}

impl Outcome {
    /// Wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NoTrade => "no_trade",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a cycle or candidate ended in `no_trade`.
#[derive(Debug, Clone, PartialEq)]
pub enum NoTradeReason {
    /// Total open risk is above the aggregate cap.
    PortfolioOpenRiskExceeded {
        /// Open risk.
        open_risk_r: f64,
        /// Aggregate cap.
        cap_r: f64,
    },
    /// A bucket's open risk is above its cap for the current state.
    BucketRiskExceeded {
        /// Bucket name.
        bucket: String,
        /// Open risk in the bucket.
        open_r: f64,
        /// Bucket cap.
        cap_r: f64,
        /// State the cap applies to.
        state: MacroState,
    },
    /// Candidate lacks invalidation, risk, or targets.
    MissingCandidateFields,
    /// Long against a down trend while risk-off alignment is required.
    CounterTrendLongBanned,
    /// Candidate's initial risk is above the state's cap.
    InitialRiskExceeded {
        /// Candidate risk.
        risk_r: f64,
        /// Initial risk cap.
        cap_r: f64,
        /// State the cap applies to.
        state: MacroState,
    },
}

impl NoTradeReason {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PortfolioOpenRiskExceeded { .. } => "PORTFOLIO_OPEN_RISK_EXCEEDED",
            Self::BucketRiskExceeded { .. } => "BUCKET_RISK_EXCEEDED",
            Self::MissingCandidateFields => "MISSING_CANDIDATE_FIELDS",
            Self::CounterTrendLongBanned => "COUNTER_TREND_LONG_BANNED",
            Self::InitialRiskExceeded { .. } => "INITIAL_RISK_EXCEEDED",
        }
    }
}

impl fmt::Display for NoTradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PortfolioOpenRiskExceeded { open_risk_r, cap_r } => write!(
                f,
                "portfolio open risk {open_risk_r:.2}R exceeds cap {cap_r:.2}R"
            ),
            Self::BucketRiskExceeded {
                bucket,
                open_r,
                cap_r,
                state,
            } => {
                let label = if bucket == BTC_BETA_BUCKET {
                    "BTC-beta"
                } else {
                    bucket.as_str()
                };
                write!(
                    f,
                    "{label} bucket {open_r:.2}R exceeds cap {cap_r:.2}R under {state}"
                )
            }
            Self::MissingCandidateFields => f.write_str("macro uncertainty: missing invalidate/R/TP"),
            Self::CounterTrendLongBanned => f.write_str("counter-trend long banned under risk_off"),
            Self::InitialRiskExceeded {
                risk_r,
                cap_r,
                state,
            } => write!(
                f,
                "initial risk {risk_r:.2}R exceeds cap {cap_r:.2}R under {state}"
            ),
        }
    }
}

/// Result of the constraint-building stage.
///
/// Constraints are attached even on `no_trade` so vetoed cycles can still be logged.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Outcome.
    pub outcome: Outcome,
    /// Present exactly when the outcome is `no_trade`.
    pub reason: Option<NoTradeReason>,
    /// Constraints computed for the cycle.
    pub constraints: Constraints,
}

impl Decision {
    /// Admit the cycle.
    #[must_use]
    pub const fn ok(constraints: Constraints) -> Self {
        Self {
            outcome: Outcome::Ok,
            reason: None,
            constraints,
        }
    }

    /// Veto the cycle.
    #[must_use]
    pub const fn no_trade(reason: NoTradeReason, constraints: Constraints) -> Self {
        Self {
            outcome: Outcome::NoTrade,
            reason: Some(reason),
            constraints,
        }
    }

    /// Returns true if the cycle may proceed to candidate gating.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Ok)
    }
}

/// Result of gating a single candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct GateVerdict {
    /// Outcome.
    pub outcome: Outcome,
    /// Present exactly when the outcome is `no_trade`.
    pub reason: Option<NoTradeReason>,
}

impl GateVerdict {
    /// Admit the candidate.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            outcome: Outcome::Ok,
            reason: None,
        }
    }

    /// Reject the candidate.
    #[must_use]
    pub const fn no_trade(reason: NoTradeReason) -> Self {
        Self {
            outcome: Outcome::NoTrade,
            reason: Some(reason),
        }
    }

    /// Returns true if the candidate was admitted.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portfolio_reason_mentions_both_values() {
        let reason = NoTradeReason::PortfolioOpenRiskExceeded {
            open_risk_r: 3.5,
            cap_r: 3.0,
        };
        let msg = reason.to_string();
        assert!(msg.contains("3.50"));
        assert!(msg.contains("3.00"));
        assert_eq!(reason.code(), "PORTFOLIO_OPEN_RISK_EXCEEDED");
    }

    #[test]
    fn bucket_reason_cites_bucket_amount_and_cap() {
        let reason = NoTradeReason::BucketRiskExceeded {
            bucket: BTC_BETA_BUCKET.to_string(),
            open_r: 1.5,
            cap_r: 1.0,
            state: MacroState::RiskOff,
        };
        assert_eq!(
            reason.to_string(),
            "BTC-beta bucket 1.50R exceeds cap 1.00R under risk_off"
        );

        let other = NoTradeReason::BucketRiskExceeded {
            bucket: "eth_beta".to_string(),
            open_r: 2.0,
            cap_r: 1.5,
            state: MacroState::Caution,
        };
        assert!(other.to_string().starts_with("eth_beta bucket"));
    }

    #[test]
    fn fixed_messages() {
        assert_eq!(
            NoTradeReason::MissingCandidateFields.to_string(),
            "macro uncertainty: missing invalidate/R/TP"
        );
        assert_eq!(
            NoTradeReason::CounterTrendLongBanned.to_string(),
            "counter-trend long banned under risk_off"
        );
    }

    #[test]
    fn initial_risk_reason_names_state() {
        let reason = NoTradeReason::InitialRiskExceeded {
            risk_r: 0.8,
            cap_r: 0.5,
            state: MacroState::RiskOff,
        };
        let msg = reason.to_string();
        assert!(msg.contains("exceeds cap"));
        assert!(msg.ends_with("under risk_off"));
    }

    #[test]
    fn constructors_keep_reason_and_outcome_consistent() {
        let ok = Decision::ok(Constraints::default());
        assert!(ok.is_ok());
        assert!(ok.reason.is_none());

        let vetoed = Decision::no_trade(
            NoTradeReason::CounterTrendLongBanned,
            Constraints::default(),
        );
        assert!(!vetoed.is_ok());
        assert!(vetoed.reason.is_some());

        assert!(GateVerdict::ok().is_ok());
        assert_eq!(
            GateVerdict::no_trade(NoTradeReason::MissingCandidateFields).outcome,
            Outcome::NoTrade
        );
    }

    #[test]
    fn outcome_wire_labels() {
        assert_eq!(serde_json::to_string(&Outcome::Ok).unwrap(), "\"ok\"");
        assert_eq!(serde_json::to_string(&Outcome::NoTrade).unwrap(), "\"no_trade\"");
    }
}
