use thiserror::Error;

use autoapply_core_types::{ApplyError, ErrorKind};
use dom_port::{DomError, ElementHandle};

#[derive(Debug, Error, Clone)]
pub enum FillError {
    #[error("refusing to write an empty value")]
    EmptyValue,
    #[error("value exceeds max length ({0})")]
    TextTooLong(usize),
    #[error("element {0} is no longer attached")]
    Detached(ElementHandle),
    #[error("field disabled")]
    DisabledField,
    #[error("field is readonly")]
    ReadOnly,
    #[error("option `{0}` cannot be selected on this element")]
    UnselectableOption(String),
    #[error("document error: {0}")]
    Dom(DomError),
}

impl FillError {
    /// Element-local refusals. The caller skips the element and carries on;
    /// anything else means the document itself failed.
    pub fn is_element_local(&self) -> bool {
        !matches!(self, FillError::Dom(_))
    }
}

impl From<DomError> for FillError {
    fn from(err: DomError) -> Self {
        match err {
            DomError::Detached(handle) => FillError::Detached(handle),
            other => FillError::Dom(other),
        }
    }
}

impl From<FillError> for ApplyError {
    fn from(err: FillError) -> Self {
        match err {
            FillError::Dom(dom) => dom.into(),
            other => ApplyError::new(ErrorKind::Fill, other.to_string()),
        }
    }
}
