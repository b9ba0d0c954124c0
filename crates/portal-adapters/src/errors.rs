use thiserror::Error;

use autoapply_core_types::{ApplyError, ErrorKind};
use dom_port::DomError;
use form_fill::FillError;

/// Faults that abort a whole fill pass. Selector failures and element-local
/// fill refusals never surface here; they only skip one binding or element.
#[derive(Debug, Error, Clone)]
pub enum AdapterError {
    #[error("document query failed: {0}")]
    Document(#[from] DomError),
    #[error("fill failed: {0}")]
    Fill(#[from] FillError),
}

impl From<AdapterError> for ApplyError {
    fn from(err: AdapterError) -> Self {
        ApplyError::new(ErrorKind::Adapter, err.to_string())
    }
}
