//! Macro Policy Bounded Context
//!
//! Two-stage gating of proposed trades. The [`ConstraintBuilder`] turns a
//! macro snapshot and portfolio exposure into per-cycle [`Constraints`]
//! (or an early veto), and the [`TradeGate`] admits individual candidates
//! against those constraints.
//!
//! Everything here is a pure function of its inputs over an immutable
//! [`PolicyConfig`], so it is safe to share across any number of callers.

pub mod aggregate;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use aggregate::{ConfidenceTable, PolicyConfig, PolicyConfigBuilder, StateTable};
pub use errors::PolicyError;
pub use services::{ConstraintBuilder, TradeGate};
pub use value_objects::{
    BTC_BETA_BUCKET, BTC_DXY_30, Candidate, Confidence, Constraints, Decision, Direction,
    DxyTrend, GateVerdict, MacroSnapshot, MacroState, MtfTrend, NoTradeReason, Outcome,
    PortfolioSnapshot, RiskMode,
};
