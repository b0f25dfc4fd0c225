use crate::error::DomError;

/// Common Result type alias
pub type DomResult<T> = Result<T, DomError>;
