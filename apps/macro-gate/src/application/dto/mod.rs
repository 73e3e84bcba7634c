//! Data Transfer Objects (DTOs)
//!
//! Wire shapes at the API boundary and use case inputs/outputs.

mod decision_dto;
mod snapshot_dto;

pub use decision_dto::{DecisionDto, EvaluationDto, VerdictDto};
pub use snapshot_dto::{CandidateDto, MacroSnapshotDto, PortfolioDto, lenient_f64};
