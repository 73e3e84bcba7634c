//! Candidate trade and higher-timeframe trend.

use serde::{Deserialize, Serialize};

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Long.
    #[default]
    Long,
    /// Short.
    Short,
}

/// Higher-timeframe consensus trend, independent of the macro snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MtfTrend {
    /// Up.
    Up,
    /// Down.
    Down,
    /// Timeframes disagree.
    Mixed,
    /// Flat.
    Neutral,
    /// No consensus reported.
    #[default]
    #[serde(other)]
    Unknown,
}

impl MtfTrend {
    /// Whether a trade in `direction` runs against this trend.
    ///
    /// Ambiguous trends (mixed, neutral, unknown) are never counter-trend.
    #[must_use]
    pub const fn is_counter_trend(self, direction: Direction) -> bool {
        matches!(
            (direction, self),
            (Direction::Long, Self::Down) | (Direction::Short, Self::Up)
        )
    }
}

/// A single proposed trade.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Candidate {
    /// Invalidation level.
    pub invalidate: Option<f64>,
    /// Initial risk in R-multiples.
    pub risk_r: Option<f64>,
    /// Ordered take-profit targets.
    pub take_profits: Vec<f64>,
    /// Direction.
    pub direction: Direction,
}

impl Candidate {
    /// Create a fully specified candidate.
    #[must_use]
    pub fn new(invalidate: f64, risk_r: f64, take_profits: Vec<f64>, direction: Direction) -> Self {
        Self {
            invalidate: Some(invalidate),
            risk_r: Some(risk_r),
            take_profits,
            direction,
        }
    }

    /// Initial risk, but only when invalidation, risk and at least one target are all present.
    #[must_use]
    pub fn complete_risk_r(&self) -> Option<f64> {
        match (self.invalidate, self.risk_r) {
            (Some(_), Some(risk_r)) if !self.take_profits.is_empty() => Some(risk_r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Direction::Long, MtfTrend::Down, true)]
    #[test_case(Direction::Short, MtfTrend::Up, true)]
    #[test_case(Direction::Long, MtfTrend::Up, false)]
    #[test_case(Direction::Short, MtfTrend::Down, false)]
    #[test_case(Direction::Long, MtfTrend::Mixed, false)]
    #[test_case(Direction::Short, MtfTrend::Neutral, false)]
    #[test_case(Direction::Long, MtfTrend::Unknown, false)]
    fn counter_trend_classification(direction: Direction, trend: MtfTrend, expected: bool) {
        assert_eq!(trend.is_counter_trend(direction), expected);
    }

    #[test]
    fn unrecognized_trend_reads_as_unknown() {
        let trend: MtfTrend = serde_json::from_str("\"sideways\"").unwrap();
        assert_eq!(trend, MtfTrend::Unknown);
    }

    #[test]
    fn completeness_requires_every_field() {
        let full = Candidate::new(0.8, 0.4, vec![1.0, 1.8], Direction::Long);
        assert_eq!(full.complete_risk_r(), Some(0.4));

        let no_tp = Candidate {
            take_profits: Vec::new(),
            ..full.clone()
        };
        assert_eq!(no_tp.complete_risk_r(), None);

        let no_invalidate = Candidate {
            invalidate: None,
            ..full.clone()
        };
        assert_eq!(no_invalidate.complete_risk_r(), None);

        let no_risk = Candidate {
            risk_r: None,
            ..full
        };
        assert_eq!(no_risk.complete_risk_r(), None);
    }
}
