//! Macro Policy Services

mod constraint_builder;
mod trade_gate;

pub use constraint_builder::ConstraintBuilder;
pub use trade_gate::TradeGate;
