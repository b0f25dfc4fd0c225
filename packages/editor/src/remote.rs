//! # Remote Store
//!
//! The two write calls the persistence endpoint accepts. Content and styles
//! are separate remote records, so every edit is two independent requests.

use crate::element::ElementType;
use crate::pending::PendingEdit;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Transport-level failure; the endpoint never answered
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Endpoint reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteAck {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WriteAck {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentWrite {
    pub element_id: String,
    pub stable_id: String,
    pub element_type: ElementType,
    pub selector: String,
    pub content: String,
    pub page_id: u64,
    pub page_identifier: String,
}

impl From<&PendingEdit> for ContentWrite {
    fn from(edit: &PendingEdit) -> Self {
        Self {
            element_id: edit.element_id.clone(),
            stable_id: edit.stable_id.clone(),
            element_type: edit.element_type,
            selector: edit.selector.clone(),
            content: edit.content.clone(),
            page_id: edit.page_id,
            page_identifier: edit.page_identifier.clone(),
        }
    }
}

/// Style map as sent on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StylePayload {
    Map(BTreeMap<String, String>),
    /// The map serialized to a JSON string
    Encoded(String),
}

impl StylePayload {
    pub fn new(styles: &BTreeMap<String, String>, encode: bool) -> Self {
        if encode {
            // A string map always serializes
            StylePayload::Encoded(serde_json::to_string(styles).unwrap_or_else(|_| "{}".to_string()))
        } else {
            StylePayload::Map(styles.clone())
        }
    }

    pub fn decode(&self) -> Result<BTreeMap<String, String>, serde_json::Error> {
        match self {
            StylePayload::Map(styles) => Ok(styles.clone()),
            StylePayload::Encoded(json) => serde_json::from_str(json),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleWrite {
    pub element_id: String,
    pub stable_id: String,
    pub element_type: ElementType,
    pub selector: String,
    pub styles: StylePayload,
    pub page_id: u64,
    pub page_identifier: String,
}

impl StyleWrite {
    pub fn from_edit(edit: &PendingEdit, encode: bool) -> Self {
        Self {
            element_id: edit.element_id.clone(),
            stable_id: edit.stable_id.clone(),
            element_type: edit.element_type,
            selector: edit.selector.clone(),
            styles: StylePayload::new(&edit.styles, encode),
            page_id: edit.page_id,
            page_identifier: edit.page_identifier.clone(),
        }
    }
}

/// Persistence endpoint
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn write_content(&self, request: ContentWrite) -> Result<WriteAck, RemoteError>;

    async fn write_styles(&self, request: StyleWrite) -> Result<WriteAck, RemoteError>;
}

/// A call received by [`RecordingRemote`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Content(ContentWrite),
    Styles(StyleWrite),
}

impl RemoteCall {
    pub fn stable_id(&self) -> &str {
        match self {
            RemoteCall::Content(request) => &request.stable_id,
            RemoteCall::Styles(request) => &request.stable_id,
        }
    }

    pub fn is_content(&self) -> bool {
        matches!(self, RemoteCall::Content(_))
    }
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<RemoteCall>,
    fail_content: HashSet<String>,
    fail_styles: HashSet<String>,
    reject: HashMap<String, String>,
    content: BTreeMap<String, String>,
    styles: BTreeMap<String, BTreeMap<String, String>>,
}

/// In-memory endpoint that records every call
///
/// Clones share state. Accepted writes are kept per stable id so tests can
/// read back what was committed.
#[derive(Debug, Clone, Default)]
pub struct RecordingRemote {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingRemote {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fail content writes for `stable_id` with a transport error
    pub fn fail_content_for(&self, stable_id: &str) {
        self.state().fail_content.insert(stable_id.to_string());
    }

    pub fn fail_styles_for(&self, stable_id: &str) {
        self.state().fail_styles.insert(stable_id.to_string());
    }

    /// Answer both writes for `stable_id` with `success: false`
    pub fn reject_for(&self, stable_id: &str, message: &str) {
        self.state().reject.insert(stable_id.to_string(), message.to_string());
    }

    /// Stop failing or rejecting writes for `stable_id`
    pub fn heal(&self, stable_id: &str) {
        let mut state = self.state();
        state.fail_content.remove(stable_id);
        state.fail_styles.remove(stable_id);
        state.reject.remove(stable_id);
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.state().calls.clone()
    }

    pub fn calls_for(&self, stable_id: &str) -> Vec<RemoteCall> {
        self.state()
            .calls
            .iter()
            .filter(|call| call.stable_id() == stable_id)
            .cloned()
            .collect()
    }

    pub fn committed_content(&self, stable_id: &str) -> Option<String> {
        self.state().content.get(stable_id).cloned()
    }

    pub fn committed_styles(&self, stable_id: &str) -> Option<BTreeMap<String, String>> {
        self.state().styles.get(stable_id).cloned()
    }
}

#[async_trait]
impl RemoteStore for RecordingRemote {
    async fn write_content(&self, request: ContentWrite) -> Result<WriteAck, RemoteError> {
        let mut state = self.state();
        state.calls.push(RemoteCall::Content(request.clone()));

        if state.fail_content.contains(&request.stable_id) {
            return Err(RemoteError::Transport("connection reset".to_string()));
        }
        if let Some(message) = state.reject.get(&request.stable_id) {
            return Ok(WriteAck::rejected(message.clone()));
        }

        state.content.insert(request.stable_id, request.content);
        Ok(WriteAck::ok())
    }

    async fn write_styles(&self, request: StyleWrite) -> Result<WriteAck, RemoteError> {
        let mut state = self.state();
        state.calls.push(RemoteCall::Styles(request.clone()));

        if state.fail_styles.contains(&request.stable_id) {
            return Err(RemoteError::Transport("connection reset".to_string()));
        }
        if let Some(message) = state.reject.get(&request.stable_id) {
            return Ok(WriteAck::rejected(message.clone()));
        }

        let styles = request
            .styles
            .decode()
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
        state.styles.insert(request.stable_id, styles);
        Ok(WriteAck::ok())
    }
}
