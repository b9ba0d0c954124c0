use std::sync::Arc;

use tokio::select;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use dom_port::{DocumentPort, ElementHandle};

use crate::errors::ObserverError;
use crate::marks::ProcessedMarks;

/// One batch of child-list mutations somewhere under the document body.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MutationTick;

/// A freshly inserted dialog that has not been processed yet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModalInstance {
    pub handle: ElementHandle,
    pub selector: &'static str,
}

pub struct ModalObserver {
    document: Arc<dyn DocumentPort>,
    selectors: &'static [&'static str],
    marks: ProcessedMarks,
    shutdown: CancellationToken,
}

impl ModalObserver {
    pub fn new(document: Arc<dyn DocumentPort>, selectors: &'static [&'static str]) -> Self {
        Self {
            document,
            selectors,
            marks: ProcessedMarks::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn marks(&self) -> &ProcessedMarks {
        &self.marks
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Reacts to one mutation batch: forgets detached dialogs, then marks and
    /// returns every attached dialog not seen before.
    pub async fn on_mutation(&self) -> Result<Vec<ModalInstance>, ObserverError> {
        self.marks.prune(self.document.as_ref()).await;
        let mut fresh = Vec::new();
        for &selector in self.selectors {
            let found = match self.document.query_all(selector).await {
                Ok(found) => found,
                Err(err) if err.is_selector_failure() => {
                    warn!(target: "modal-observer", selector, "selector skipped: {}", err);
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            for el in found {
                if self.marks.mark(&el.handle) {
                    debug!(target: "modal-observer", handle = %el.handle, selector, "new dialog");
                    fresh.push(ModalInstance {
                        handle: el.handle,
                        selector,
                    });
                }
            }
        }
        Ok(fresh)
    }

    /// Consumes mutation ticks until the stream closes, the consumer goes
    /// away or the observer is shut down, forwarding fresh dialogs.
    pub async fn run(
        &self,
        mut ticks: mpsc::Receiver<MutationTick>,
        found: mpsc::Sender<ModalInstance>,
    ) -> Result<(), ObserverError> {
        debug!(target: "modal-observer", "observer started");
        loop {
            select! {
                _ = self.shutdown.cancelled() => break,
                tick = ticks.recv() => {
                    if tick.is_none() {
                        break;
                    }
                    for instance in self.on_mutation().await? {
                        if found.send(instance).await.is_err() {
                            debug!(target: "modal-observer", "consumer dropped");
                            return Ok(());
                        }
                    }
                }
            }
        }
        debug!(target: "modal-observer", "observer exited");
        Ok(())
    }
}
