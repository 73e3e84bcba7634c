// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Macro Gate - Rust Core Library
//!
//! Deterministic trade gating driven by the macro regime.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: `macro_policy` holds the snapshot value objects, the
//!   policy table, the Constraint Builder and the Trade Gate. Pure and
//!   side-effect free.
//!
//! - **Application**: `EvaluateTradeUseCase` runs one decision cycle over
//!   lenient wire DTOs, logging and recording metrics.
//!
//! - **Infrastructure**: the axum HTTP adapter with key auth and a
//!   sliding-window rate limiter.
//!
//! Cross-cutting: `config` (YAML with `${VAR:-default}` interpolation),
//! `observability` (Prometheus metrics) and `error` (uniform HTTP errors).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and DTOs.
pub mod application;

/// Infrastructure layer - Adapters.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// HTTP error types.
pub mod error;

/// Metrics.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::use_cases::EvaluateTradeUseCase;
pub use domain::macro_policy::{
    Candidate, ConstraintBuilder, Constraints, Decision, GateVerdict, MacroSnapshot, MacroState,
    MtfTrend, NoTradeReason, Outcome, PolicyConfig, PortfolioSnapshot, TradeGate,
};
pub use error::ApiError;
