//! Error types for the editor

use crate::cache::CacheError;
use quickedit_common::DomError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No active edit session")]
    NoActiveSession,

    #[error("Element {0} is no longer attached to the document")]
    Detached(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type EditorResult<T> = Result<T, EditorError>;
