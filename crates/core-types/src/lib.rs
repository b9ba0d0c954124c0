//! Shared primitives for the AutoApply form-fill kernel.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

mod portal;
mod profile;
mod settings;

pub use portal::Portal;
pub use profile::{Profile, ProfileField};
pub use settings::Settings;

/// Subsystem an [`ApplyError`] originated from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    Dom,
    Selector,
    Fill,
    Adapter,
    Flow,
    Observer,
    Bus,
    Store,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Dom => "dom",
            ErrorKind::Selector => "selector",
            ErrorKind::Fill => "fill",
            ErrorKind::Adapter => "adapter",
            ErrorKind::Flow => "flow",
            ErrorKind::Observer => "observer",
            ErrorKind::Bus => "bus",
            ErrorKind::Store => "store",
            ErrorKind::Config => "config",
        }
    }
}

/// Kernel-wide error every crate-local error converts into.
#[derive(Debug, Error, Clone)]
#[error("{}: {message}", kind.as_str())]
pub struct ApplyError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApplyError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Identifier of one fill pass, carried through tracing spans.
#[derive(Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PassId(pub String);

impl PassId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for PassId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_carries_kind() {
        let err = ApplyError::new(ErrorKind::Selector, "bad selector `[`");
        assert_eq!(err.to_string(), "selector: bad selector `[`");
    }

    #[test]
    fn pass_ids_are_unique() {
        assert_ne!(PassId::new(), PassId::new());
    }
}
