//! Constraint Builder
//!
//! Derives the per-cycle [`Constraints`] from the macro snapshot and vetoes
//! the cycle when portfolio exposure already breaches a cap.

use crate::domain::macro_policy::aggregate::PolicyConfig;
use crate::domain::macro_policy::value_objects::{
    BTC_BETA_BUCKET, BTC_DXY_30, Constraints, Decision, DxyTrend, MacroSnapshot, MacroState,
    NoTradeReason, PortfolioSnapshot,
};

/// Constraint Builder - stateless apart from the immutable policy table.
#[derive(Debug, Clone, Default)]
pub struct ConstraintBuilder {
    policy: PolicyConfig,
}

impl ConstraintBuilder {
    /// Create a builder over `policy`.
    #[must_use]
    pub const fn new(policy: PolicyConfig) -> Self {
        Self { policy }
    }

    /// The policy table in use.
    #[must_use]
    pub const fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Build the constraints for one cycle.
    ///
    /// The aggregate veto is checked before any bucket veto, so when both
    /// would fire the aggregate reason wins.
    #[must_use]
    pub fn build(&self, snapshot: &MacroSnapshot, portfolio: &PortfolioSnapshot) -> Decision {
        let constraints = self.derive(snapshot);

        if let Some(reason) = self.exposure_veto(snapshot.state, portfolio, &constraints) {
            return Decision::no_trade(reason, constraints);
        }

        Decision::ok(constraints)
    }

    /// Stance flags, caps and size multiplier, without any portfolio checks.
    #[must_use]
    pub fn derive(&self, snapshot: &MacroSnapshot) -> Constraints {
        let policy = &self.policy;
        let state = snapshot.state;
        let mut c = Constraints::with_aggregate_cap(policy.cap_aggregate_risk_r());

        match state {
            MacroState::RiskOff => {
                c.ban_new_counter_trend_longs = true;
                c.require_trend_alignment = true;
                c.tighten_stop = true;
            }
            MacroState::Caution => c.require_location_confluence = true,
            MacroState::Supportive => c.normal_playbook = true,
            MacroState::Neutral => {}
        }
        c.cap_initial_risk_r = Some(policy.initial_risk_cap_r(state));

        if self.correlation_guard_fires(snapshot) {
            c.discount_longs = true;
            c.raise_confirmation_bar = true;
        }

        c.size_multiplier = match state {
            MacroState::Supportive => policy.size_multiplier(state),
            _ => policy.size_multiplier(state) * policy.confidence_multiplier(snapshot.confidence),
        };

        c
    }

    /// Dollar strength paired with a strongly negative BTC/DXY correlation.
    ///
    /// A missing or non-finite correlation is unclear, never bearish.
    #[must_use]
    pub fn correlation_guard_fires(&self, snapshot: &MacroSnapshot) -> bool {
        snapshot.dxy_trend == DxyTrend::Bullish
            && snapshot
                .correlation(BTC_DXY_30)
                .is_some_and(|corr| corr < self.policy.correlation_bearish_threshold())
    }

    fn exposure_veto(
        &self,
        state: MacroState,
        portfolio: &PortfolioSnapshot,
        constraints: &Constraints,
    ) -> Option<NoTradeReason> {
        let cap_r = constraints.cap_aggregate_risk_r;
        if portfolio.open_risk_r > cap_r {
            return Some(NoTradeReason::PortfolioOpenRiskExceeded {
                open_risk_r: portfolio.open_risk_r,
                cap_r,
            });
        }

        if !state.enforces_bucket_caps() {
            return None;
        }

        // btc_beta first, then any further configured buckets by name.
        let btc_beta = (BTC_BETA_BUCKET, self.policy.btc_beta_cap_r(state));
        let extra = self
            .policy
            .buckets()
            .filter(|b| *b != BTC_BETA_BUCKET)
            .filter_map(|b| Some((b, self.policy.bucket_cap_r(b, state)?)));
        std::iter::once(btc_beta)
            .chain(extra)
            .find_map(|(bucket, cap_r)| {
                let open_r = portfolio.bucket_open_r(bucket);
                (open_r > cap_r).then(|| NoTradeReason::BucketRiskExceeded {
                    bucket: bucket.to_string(),
                    open_r,
                    cap_r,
                    state,
                })
            })
    }
}
