//! Build metadata reported by `/` and `/version`.

use serde::{Deserialize, Serialize};

/// Build metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Release version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Source revision.
    #[serde(default = "default_git_sha")]
    pub git_sha: String,
    /// Build timestamp.
    #[serde(default = "default_built_at")]
    pub built_at: String,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: default_version(),
            git_sha: default_git_sha(),
            built_at: default_built_at(),
        }
    }
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_git_sha() -> String {
    "dev".to_string()
}

fn default_built_at() -> String {
    "local".to_string()
}
