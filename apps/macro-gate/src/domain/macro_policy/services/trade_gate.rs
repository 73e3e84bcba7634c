//! Trade Gate
//!
//! Final admission check of one candidate against already-built constraints.

use crate::domain::macro_policy::value_objects::{
    Candidate, Constraints, Direction, GateVerdict, MacroState, MtfTrend, NoTradeReason,
};

/// Trade Gate - pure function of its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TradeGate;

impl TradeGate {
    /// Admit or reject `candidate`.
    ///
    /// Checks run in order: completeness, counter-trend long ban, initial risk cap.
    #[must_use]
    pub fn evaluate(
        constraints: &Constraints,
        candidate: &Candidate,
        state: MacroState,
        trend: MtfTrend,
    ) -> GateVerdict {
        let Some(risk_r) = candidate.complete_risk_r() else {
            return GateVerdict::no_trade(NoTradeReason::MissingCandidateFields);
        };

        if constraints.ban_new_counter_trend_longs
            && constraints.require_trend_alignment
            && candidate.direction == Direction::Long
            && trend.is_counter_trend(candidate.direction)
        {
            return GateVerdict::no_trade(NoTradeReason::CounterTrendLongBanned);
        }

        if let Some(cap_r) = constraints.cap_initial_risk_r
            && risk_r > cap_r
        {
            return GateVerdict::no_trade(NoTradeReason::InitialRiskExceeded {
                risk_r,
                cap_r,
                state,
            });
        }

        GateVerdict::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::macro_policy::value_objects::Outcome;
    use proptest::prelude::*;
    use test_case::test_case;

    fn risk_off() -> Constraints {
        Constraints {
            ban_new_counter_trend_longs: true,
            require_trend_alignment: true,
            tighten_stop: true,
            cap_initial_risk_r: Some(0.5),
            ..Constraints::default()
        }
    }

    fn long(risk_r: f64) -> Candidate {
        Candidate::new(0.8, risk_r, vec![1.0, 1.8], Direction::Long)
    }

    #[test]
    fn empty_targets_are_incomplete_regardless_of_other_fields() {
        let candidate = Candidate {
            take_profits: Vec::new(),
            ..long(0.1)
        };
        let verdict = TradeGate::evaluate(
            &Constraints::default(),
            &candidate,
            MacroState::Supportive,
            MtfTrend::Up,
        );
        assert_eq!(verdict.outcome, Outcome::NoTrade);
        assert_eq!(
            verdict.reason.unwrap().to_string(),
            "macro uncertainty: missing invalidate/R/TP"
        );
    }

    #[test]
    fn incompleteness_is_checked_before_the_ban() {
        let candidate = Candidate {
            invalidate: None,
            ..long(0.4)
        };
        let verdict = TradeGate::evaluate(&risk_off(), &candidate, MacroState::RiskOff, MtfTrend::Down);
        assert_eq!(verdict.reason, Some(NoTradeReason::MissingCandidateFields));
    }

    #[test]
    fn counter_trend_long_banned_under_risk_off() {
        let verdict = TradeGate::evaluate(&risk_off(), &long(0.4), MacroState::RiskOff, MtfTrend::Down);
        assert_eq!(verdict.reason, Some(NoTradeReason::CounterTrendLongBanned));
    }

    #[test]
    fn counter_trend_short_is_not_banned() {
        let short = Candidate {
            direction: Direction::Short,
            ..long(0.4)
        };
        let verdict = TradeGate::evaluate(&risk_off(), &short, MacroState::RiskOff, MtfTrend::Up);
        assert!(verdict.is_ok());
    }

    #[test_case(MtfTrend::Mixed)]
    #[test_case(MtfTrend::Neutral)]
    #[test_case(MtfTrend::Unknown)]
    #[test_case(MtfTrend::Up)]
    fn ambiguous_or_aligned_trend_is_not_banned(trend: MtfTrend) {
        let verdict = TradeGate::evaluate(&risk_off(), &long(0.4), MacroState::RiskOff, trend);
        assert!(verdict.is_ok());
    }

    #[test]
    fn ban_needs_both_flags() {
        let only_ban = Constraints {
            require_trend_alignment: false,
            ..risk_off()
        };
        let verdict = TradeGate::evaluate(&only_ban, &long(0.4), MacroState::RiskOff, MtfTrend::Down);
        assert!(verdict.is_ok());
    }

    #[test]
    fn initial_risk_above_cap_is_rejected() {
        let verdict = TradeGate::evaluate(&risk_off(), &long(0.6), MacroState::RiskOff, MtfTrend::Up);
        let reason = verdict.reason.unwrap();
        assert_eq!(reason.code(), "INITIAL_RISK_EXCEEDED");
        assert_eq!(
            reason.to_string(),
            "initial risk 0.60R exceeds cap 0.50R under risk_off"
        );
    }

    #[test]
    fn initial_risk_at_cap_is_admitted() {
        let verdict = TradeGate::evaluate(&risk_off(), &long(0.5), MacroState::RiskOff, MtfTrend::Up);
        assert!(verdict.is_ok());
    }

    #[test]
    fn no_cap_means_no_risk_check() {
        let verdict = TradeGate::evaluate(&Constraints::default(), &long(9.0), MacroState::Neutral, MtfTrend::Up);
        assert!(verdict.is_ok());
    }

    proptest! {
        #[test]
        fn evaluate_is_idempotent(
            risk in 0.0f64..2.0,
            cap in proptest::option::of(0.0f64..2.0),
            ban in any::<bool>(),
            align in any::<bool>(),
            short in any::<bool>(),
            trend in prop::sample::select(vec![
                MtfTrend::Up, MtfTrend::Down, MtfTrend::Mixed, MtfTrend::Neutral, MtfTrend::Unknown,
            ]),
        ) {
            let constraints = Constraints {
                ban_new_counter_trend_longs: ban,
                require_trend_alignment: align,
                cap_initial_risk_r: cap,
                ..Constraints::default()
            };
            let direction = if short { Direction::Short } else { Direction::Long };
            let candidate = Candidate::new(1.0, risk, vec![2.0], direction);

            let first = TradeGate::evaluate(&constraints, &candidate, MacroState::Caution, trend);
            let second = TradeGate::evaluate(&constraints, &candidate, MacroState::Caution, trend);
            prop_assert_eq!(first, second);
        }
    }
}
