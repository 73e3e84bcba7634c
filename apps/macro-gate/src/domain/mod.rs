//! Domain Layer
//!
//! Pure decision logic with no I/O.

pub mod macro_policy;
