//! API-key authentication.

use crate::error::ApiError;

/// Request header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Configured API keys. An empty set rejects every key.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    keys: Vec<String>,
}

impl ApiKeys {
    /// Create a key set, dropping blank entries.
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: keys
                .into_iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Number of configured keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether `candidate` is a configured key. Every key is compared in constant time.
    #[must_use]
    pub fn contains(&self, candidate: &str) -> bool {
        self.keys
            .iter()
            .fold(false, |found, k| found | constant_time_eq(k.as_bytes(), candidate.as_bytes()))
    }

    /// Resolve the request's key: header first, then the `key` query parameter.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingApiKey`] when neither is present, [`ApiError::InvalidApiKey`]
    /// when the key is not configured.
    pub fn authorize(&self, header: Option<&str>, query: Option<&str>) -> Result<String, ApiError> {
        let token = header
            .filter(|t| !t.is_empty())
            .or_else(|| query.filter(|t| !t.is_empty()))
            .ok_or(ApiError::MissingApiKey)?;

        if self.contains(token) {
            Ok(token.to_string())
        } else {
            Err(ApiError::InvalidApiKey)
        }
    }
}

/// Loggable form of a key: the first six characters followed by `***`.
#[must_use]
pub fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(6).collect();
    format!("{prefix}***")
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
