//! Application Layer
//!
//! Orchestrates the macro policy domain:
//!
//! - **DTOs**: Lenient wire shapes for snapshots, candidates and decisions
//! - **Use Cases**: The decision cycle, with logging and metrics

pub mod dto;
pub mod use_cases;

pub use dto::*;
pub use use_cases::*;
