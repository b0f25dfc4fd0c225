use crate::errors::{EditorError, EditorResult};
use crate::identity::sanitize;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings injected by the host page when the editor is constructed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Numeric page id sent with every remote write
    pub page_id: u64,

    /// Page slug; part of every stable id and of the cache key
    pub page_identifier: String,

    pub cache_key_prefix: String,

    /// Attribute carrying the stable id on editable elements
    pub identity_attribute: String,

    /// Delays for region re-tag retries after initial load
    pub retag_delays_ms: Vec<u64>,

    /// Send the style map as a JSON-encoded string instead of a map
    pub encode_styles_as_json: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            page_id: 0,
            page_identifier: String::new(),
            cache_key_prefix: "quickedit_pending_edits".to_string(),
            identity_attribute: "data-qe-id".to_string(),
            retag_delays_ms: vec![250, 1000, 2500],
            encode_styles_as_json: false,
        }
    }
}

impl EditorConfig {
    pub fn new(page_id: u64, page_identifier: impl Into<String>) -> Self {
        Self {
            page_id,
            page_identifier: page_identifier.into(),
            ..Default::default()
        }
    }

    /// Parse host-provided JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EditorResult<()> {
        if self.identity_attribute.trim().is_empty() {
            return Err(EditorError::InvalidConfig(
                "identity_attribute must not be empty".to_string(),
            ));
        }
        if self.cache_key_prefix.trim().is_empty() {
            return Err(EditorError::InvalidConfig(
                "cache_key_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Key of the pending-edit blob in the client-side cache
    pub fn cache_key(&self) -> String {
        let page = sanitize(&self.page_identifier);
        if page.is_empty() {
            self.cache_key_prefix.clone()
        } else {
            format!("{}_{}", self.cache_key_prefix, page)
        }
    }

    pub fn retag_delays(&self) -> Vec<Duration> {
        self.retag_delays_ms
            .iter()
            .map(|ms| Duration::from_millis(*ms))
            .collect()
    }
}
