//! Evaluate Trade Use Case
//!
//! One decision cycle: build constraints once, then gate each candidate
//! against the same constraints.

use std::time::Instant;

use crate::application::dto::{
    CandidateDto, DecisionDto, EvaluationDto, MacroSnapshotDto, PortfolioDto, VerdictDto,
};
use crate::domain::macro_policy::{
    Candidate, ConstraintBuilder, Constraints, Decision, GateVerdict, MacroSnapshot, MacroState,
    MtfTrend, PolicyConfig, PortfolioSnapshot, TradeGate,
};
use crate::observability::{record_decision, record_evaluation_latency};

const STAGE_PORTFOLIO: &str = "portfolio";
const STAGE_CANDIDATE: &str = "candidate";

/// Use case for the two-stage trade decision.
#[derive(Debug, Clone, Default)]
pub struct EvaluateTradeUseCase {
    builder: ConstraintBuilder,
}

impl EvaluateTradeUseCase {
    /// Create a use case over a validated policy.
    #[must_use]
    pub const fn new(policy: PolicyConfig) -> Self {
        Self {
            builder: ConstraintBuilder::new(policy),
        }
    }

    /// The policy table in use.
    #[must_use]
    pub const fn policy(&self) -> &PolicyConfig {
        self.builder.policy()
    }

    /// Build the constraints for one cycle.
    #[must_use]
    pub fn build_constraints(&self, snapshot: MacroSnapshotDto, portfolio: PortfolioDto) -> DecisionDto {
        let start = Instant::now();
        let decision = self.run_builder(&snapshot.into(), &portfolio.into());
        record_evaluation_latency("constraints", start.elapsed().as_secs_f64());
        decision.into()
    }

    /// Gate a single candidate against constraints built earlier.
    #[must_use]
    pub fn gate_candidate(
        &self,
        constraints: &Constraints,
        candidate: CandidateDto,
        state: MacroState,
        trend: MtfTrend,
    ) -> VerdictDto {
        let start = Instant::now();
        let verdict = Self::run_gate(constraints, &candidate.into(), state, trend);
        record_evaluation_latency("gate", start.elapsed().as_secs_f64());
        verdict.into()
    }

    /// Run the full cycle.
    ///
    /// Candidates are gated in order only when the constraint stage returns
    /// ok; a vetoed cycle reports no candidate verdicts.
    #[must_use]
    pub fn evaluate(
        &self,
        snapshot: MacroSnapshotDto,
        portfolio: PortfolioDto,
        trend: MtfTrend,
        candidates: Vec<CandidateDto>,
    ) -> EvaluationDto {
        let start = Instant::now();
        let snapshot = MacroSnapshot::from(snapshot);
        let decision = self.run_builder(&snapshot, &portfolio.into());

        let verdicts = if decision.is_ok() {
            candidates
                .into_iter()
                .map(|dto| {
                    let candidate = Candidate::from(dto);
                    Self::run_gate(&decision.constraints, &candidate, snapshot.state, trend).into()
                })
                .collect()
        } else {
            Vec::new()
        };

        record_evaluation_latency("decide", start.elapsed().as_secs_f64());
        EvaluationDto::new(decision.into(), verdicts)
    }

    fn run_builder(&self, snapshot: &MacroSnapshot, portfolio: &PortfolioSnapshot) -> Decision {
        let decision = self.builder.build(snapshot, portfolio);
        let c = &decision.constraints;

        tracing::debug!(
            state = %snapshot.state,
            stances = ?c.active_stances(),
            cap_initial_risk_r = ?c.cap_initial_risk_r,
            size_multiplier = c.size_multiplier,
            "Constraints derived"
        );

        let code = decision.reason.as_ref().map_or("none", |r| r.code());
        if let Some(reason) = &decision.reason {
            tracing::info!(
                reason_code = code,
                open_risk_r = portfolio.open_risk_r,
                "Cycle vetoed: {reason}"
            );
        }
        record_decision(STAGE_PORTFOLIO, decision.outcome.as_str(), code);

        decision
    }

    fn run_gate(
        constraints: &Constraints,
        candidate: &Candidate,
        state: MacroState,
        trend: MtfTrend,
    ) -> GateVerdict {
        let verdict = TradeGate::evaluate(constraints, candidate, state, trend);

        let code = verdict.reason.as_ref().map_or("none", |r| r.code());
        if let Some(reason) = &verdict.reason {
            tracing::info!(
                reason_code = code,
                direction = ?candidate.direction,
                trend = ?trend,
                "Candidate rejected: {reason}"
            );
        }
        record_decision(STAGE_CANDIDATE, verdict.outcome.as_str(), code);

        verdict
    }
}
