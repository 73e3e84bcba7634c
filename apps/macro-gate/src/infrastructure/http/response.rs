//! HTTP response bodies.

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always true while serving.
    pub ok: bool,
}

/// Service and build metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    /// Service name.
    pub name: String,
    /// Release version.
    pub version: String,
    /// Source revision.
    pub git_sha: String,
    /// Build timestamp.
    pub built_at: String,
}

/// Index response: metadata plus the route list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    /// Service and build metadata.
    #[serde(flatten)]
    pub version: VersionResponse,
    /// Available routes.
    pub endpoints: Vec<String>,
}
