use crate::dom::NodeId;
use thiserror::Error;

/// Errors raised by DOM adapters and selector evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    #[error("Invalid selector at {pos}: {message}")]
    InvalidSelector { pos: usize, message: String },

    #[error("Unexpected end of selector at {pos}")]
    UnexpectedEnd { pos: usize },

    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),
}

impl DomError {
    pub fn invalid_selector(pos: usize, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            pos,
            message: message.into(),
        }
    }

    pub fn unexpected_end(pos: usize) -> Self {
        Self::UnexpectedEnd { pos }
    }
}
