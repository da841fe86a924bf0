use std::fmt;

use serde::{Deserialize, Serialize};

/// Cache generation used when no tag is configured.
pub const DEFAULT_CACHE_TAG: &str = "shorequad-v1";

/// Name of the current cache generation.
///
/// Changing the tag is the only way cached assets are invalidated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheTag(String);

impl CacheTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Tag baked in at build time through `SHORESQUAD_CACHE_TAG`.
    pub fn from_build() -> Self {
        Self::new(option_env!("SHORESQUAD_CACHE_TAG").unwrap_or(DEFAULT_CACHE_TAG))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CacheTag {
    fn default() -> Self {
        Self::from_build()
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a response was obtained, mirroring the fetch response types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Same-origin
    Basic,
    /// Cross-origin with readable body
    Cors,
    /// Cross-origin without a readable body
    Opaque,
    /// Network-level failure stand-in
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub response_type: ResponseType,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, response_type: ResponseType, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            response_type,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Only a plain 200 that is not an error-type response is stored.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.response_type != ResponseType::Error
    }
}

/// Lifecycle phase of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    Parsed,
    Installed,
    Activated,
}

#[derive(Debug, thiserror::Error)]
pub enum OfflineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache entry could not be encoded: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Cache entry body is corrupt: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Invalid cache name: {0:?}")]
    InvalidCacheName(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Network request failed: {0}")]
    Network(String),

    #[error("Offline and no cached copy of {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cacheable_responses() {
        assert!(Response::new(200, ResponseType::Basic, "ok").is_cacheable());
        assert!(Response::new(200, ResponseType::Cors, "ok").is_cacheable());
        assert!(!Response::new(404, ResponseType::Basic, "").is_cacheable());
        assert!(!Response::new(204, ResponseType::Basic, "").is_cacheable());
        assert!(!Response::new(200, ResponseType::Error, "").is_cacheable());
    }

    #[test]
    fn test_tag_from_build_is_not_empty() {
        assert!(!CacheTag::from_build().as_str().is_empty());
        assert_eq!(CacheTag::new("shorequad-v2").to_string(), "shorequad-v2");
    }
}
