use thiserror::Error;

use autoapply_core_types::{ApplyError, ErrorKind};
use dom_port::DomError;

#[derive(Debug, Error, Clone)]
pub enum FlowError {
    #[error("control lookup failed: {0}")]
    Document(#[from] DomError),
    #[error("event publish failed: {0}")]
    Publish(ApplyError),
}

impl From<FlowError> for ApplyError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Publish(inner) => inner,
            other => ApplyError::new(ErrorKind::Flow, other.to_string()),
        }
    }
}
