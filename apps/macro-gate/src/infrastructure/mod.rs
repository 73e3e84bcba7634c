//! Infrastructure Layer
//!
//! Driver adapters exposing the application to the outside world.
//!
//! - `http/`: REST API, API-key authentication, rate limiting

pub mod http;
