use thiserror::Error;

use autoapply_core_types::{ApplyError, ErrorKind};

use crate::model::ElementHandle;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected `{found}` at offset {offset} in `{selector}`")]
    Unexpected {
        selector: String,
        found: char,
        offset: usize,
    },
    #[error("unterminated {what} in `{selector}`")]
    Unterminated { selector: String, what: &'static str },
    #[error("unsupported {feature} in `{selector}`")]
    Unsupported {
        selector: String,
        feature: &'static str,
    },
}

#[derive(Debug, Error, Clone)]
pub enum DomError {
    #[error("invalid selector: {0}")]
    InvalidSelector(#[from] SelectorError),
    #[error("element {0} is no longer attached")]
    Detached(ElementHandle),
    #[error("host document error: {0}")]
    Host(String),
}

impl DomError {
    /// Query-time selector faults are local to one binding; everything else
    /// means the document itself misbehaved.
    pub fn is_selector_failure(&self) -> bool {
        matches!(self, DomError::InvalidSelector(_))
    }
}

impl From<DomError> for ApplyError {
    fn from(err: DomError) -> Self {
        let kind = if err.is_selector_failure() {
            ErrorKind::Selector
        } else {
            ErrorKind::Dom
        };
        ApplyError::new(kind, err.to_string())
    }
}
