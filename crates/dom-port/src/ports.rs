use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::DomError;
use crate::model::{DomEvent, ElementHandle, ElementSnapshot};

/// Capability over the live host document, borrowed per call.
///
/// Implementations must never hand out cached state: every call observes
/// the document as it is now.
#[async_trait]
pub trait DocumentPort: Send + Sync {
    /// All elements matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>, DomError>;

    /// Fresh snapshot of one element.
    async fn snapshot(&self, handle: &ElementHandle) -> Result<ElementSnapshot, DomError>;

    /// Whether the node is still attached to the document.
    async fn contains(&self, handle: &ElementHandle) -> bool;

    /// Writes through the base value accessor of the element's prototype,
    /// bypassing setters a page framework may have installed.
    async fn write_value(&self, handle: &ElementHandle, value: &str) -> Result<(), DomError>;

    async fn dispatch(&self, handle: &ElementHandle, event: DomEvent) -> Result<(), DomError>;

    async fn click(&self, handle: &ElementHandle) -> Result<(), DomError>;

    /// Outlines the element; the host removes the outline after `ttl`.
    async fn highlight(&self, handle: &ElementHandle, ttl: Duration) -> Result<(), DomError>;

    async fn query_first(&self, selector: &str) -> Result<Option<ElementSnapshot>, DomError> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum NoticeKind {
    Success,
    Warn,
    Info,
}

/// Transient toast shown on the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub ttl: Duration,
}

impl Notice {
    pub const DEFAULT_TTL: Duration = Duration::from_millis(6000);

    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            ttl: Self::DEFAULT_TTL,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warn, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// User-visible toast surface. Showing a notice replaces the previous one.
#[async_trait]
pub trait NoticePort: Send + Sync {
    async fn show(&self, notice: Notice);
}
