//! Application Use Cases

mod evaluate_trade;

pub use evaluate_trade::EvaluateTradeUseCase;
