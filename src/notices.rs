use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dom_port::{Notice, NoticePort};

/// Applies the configured toast lifetime to every notice passing through.
pub struct TtlNotices {
    inner: Arc<dyn NoticePort>,
    ttl: Duration,
}

impl TtlNotices {
    pub fn new(inner: Arc<dyn NoticePort>, ttl: Duration) -> Self {
        Self { inner, ttl }
    }
}

#[async_trait]
impl NoticePort for TtlNotices {
    async fn show(&self, notice: Notice) {
        self.inner.show(notice.with_ttl(self.ttl)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_port::MemoryDocument;

    #[tokio::test]
    async fn overrides_ttl_and_keeps_message() {
        let doc = Arc::new(MemoryDocument::new());
        let notices = TtlNotices::new(doc.clone(), Duration::from_millis(2500));
        notices.show(Notice::warn("Error filling form")).await;
        let shown = doc.notices();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].message, "Error filling form");
        assert_eq!(shown[0].ttl, Duration::from_millis(2500));
    }
}
