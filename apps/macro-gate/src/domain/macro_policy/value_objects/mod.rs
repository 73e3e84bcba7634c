//! Macro Policy Value Objects

mod candidate;
mod constraints;
mod decision;
mod macro_snapshot;
mod portfolio;

pub use candidate::{Candidate, Direction, MtfTrend};
pub use constraints::{Constraints, DEFAULT_CAP_AGGREGATE_RISK_R};
pub use decision::{Decision, GateVerdict, NoTradeReason, Outcome};
pub use macro_snapshot::{BTC_DXY_30, Confidence, DxyTrend, MacroSnapshot, MacroState, RiskMode};
pub use portfolio::{BTC_BETA_BUCKET, DEFAULT_REPORTED_RISK_CAP_R, PortfolioSnapshot};
