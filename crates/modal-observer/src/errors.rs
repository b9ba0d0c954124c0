use thiserror::Error;

use autoapply_core_types::{ApplyError, ErrorKind};
use dom_port::DomError;

#[derive(Debug, Error, Clone)]
pub enum ObserverError {
    #[error("modal lookup failed: {0}")]
    Document(#[from] DomError),
}

impl From<ObserverError> for ApplyError {
    fn from(err: ObserverError) -> Self {
        ApplyError::new(ErrorKind::Observer, err.to_string())
    }
}
