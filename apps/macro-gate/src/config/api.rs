//! API access configuration: keys and rate limiting.

use serde::{Deserialize, Deserializer, Serialize};

/// API access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Accepted API keys. A YAML list or a comma-separated string.
    #[serde(default, deserialize_with = "deserialize_keys")]
    pub keys: Vec<String>,
    /// Requests allowed per key within the 60-second sliding window.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

const fn default_requests_per_minute() -> u32 {
    60
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyList {
    List(Vec<String>),
    Csv(String),
}

/// Split, trim and drop empty keys.
#[must_use]
pub fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let keys = match Option::<KeyList>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(KeyList::Csv(raw)) => parse_key_list(&raw),
        Some(KeyList::List(list)) => list
            .iter()
            .flat_map(|k| parse_key_list(k))
            .collect(),
    };
    Ok(keys)
}
