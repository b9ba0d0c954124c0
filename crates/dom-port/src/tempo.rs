use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

/// The only suspension point the kernel uses between a document mutation
/// and the next read.
#[async_trait]
pub trait TempoPort: Send + Sync {
    async fn settle(&self, delay: Duration);
}

/// Real timer backed by tokio.
#[derive(Clone, Debug, Default)]
pub struct TokioTempo;

#[async_trait]
impl TempoPort for TokioTempo {
    async fn settle(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Virtual clock: every settle returns immediately and advances virtual time.
#[derive(Debug, Default)]
pub struct VirtualTempo {
    elapsed_ms: AtomicU64,
    delays: Mutex<Vec<Duration>>,
}

impl VirtualTempo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms.load(Ordering::SeqCst))
    }

    /// Every delay requested so far, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }
}

#[async_trait]
impl TempoPort for VirtualTempo {
    async fn settle(&self, delay: Duration) {
        self.delays.lock().push(delay);
        self.elapsed_ms
            .fetch_add(delay.as_millis() as u64, Ordering::SeqCst);
        tokio::task::yield_now().await;
    }
}
