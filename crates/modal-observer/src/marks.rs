use dashmap::DashSet;

use dom_port::{DocumentPort, ElementHandle};

/// Processed flags keyed by node identity.
///
/// A mark never outlives its node: [`ProcessedMarks::prune`] drops every
/// mark whose node is detached.
#[derive(Debug, Default)]
pub struct ProcessedMarks {
    marks: DashSet<ElementHandle>,
}

impl ProcessedMarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `handle`; `true` only the first time.
    pub fn mark(&self, handle: &ElementHandle) -> bool {
        self.marks.insert(handle.clone())
    }

    pub async fn prune(&self, document: &dyn DocumentPort) -> usize {
        let snapshot: Vec<ElementHandle> = self.marks.iter().map(|h| h.key().clone()).collect();
        let mut removed = 0;
        for handle in snapshot {
            if !document.contains(&handle).await {
                self.marks.remove(&handle);
                removed += 1;
            }
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}
