use std::sync::Arc;

use async_trait::async_trait;

use autoapply_core_types::{ApplyError, ErrorKind};
use dom_port::{ChoiceOption, DocumentPort, ElementHandle};

use crate::errors::FillError;
use crate::model::FillReport;
use crate::policy::FillPolicyView;
use crate::runner::{execute_choice, execute_text, RuntimeDeps};

/// Writes values so the host page's own change detection observes them.
#[async_trait]
pub trait FillExecutor: Send + Sync {
    async fn fill_text(&self, handle: &ElementHandle, value: &str)
        -> Result<FillReport, FillError>;

    /// Selects `option` on a select, or clicks it inside a radio group.
    async fn fill_choice(
        &self,
        handle: &ElementHandle,
        option: &ChoiceOption,
    ) -> Result<FillReport, FillError>;
}

pub struct FillExecutorBuilder {
    policy: FillPolicyView,
    document: Option<Arc<dyn DocumentPort>>,
}

impl FillExecutorBuilder {
    pub fn new(policy: FillPolicyView) -> Self {
        Self {
            policy,
            document: None,
        }
    }

    pub fn with_document(mut self, port: Arc<dyn DocumentPort>) -> Self {
        self.document = Some(port);
        self
    }

    pub fn build(self) -> Result<Arc<dyn FillExecutor>, ApplyError> {
        let document = self
            .document
            .ok_or_else(|| ApplyError::new(ErrorKind::Config, "document port required"))?;
        Ok(Arc::new(FillExecutorImpl {
            policy: self.policy,
            document,
        }))
    }
}

pub struct FillExecutorImpl {
    policy: FillPolicyView,
    document: Arc<dyn DocumentPort>,
}

impl FillExecutorImpl {
    fn deps(&self) -> RuntimeDeps<'_> {
        RuntimeDeps {
            document: self.document.as_ref(),
            policy: &self.policy,
        }
    }
}

#[async_trait]
impl FillExecutor for FillExecutorImpl {
    async fn fill_text(
        &self,
        handle: &ElementHandle,
        value: &str,
    ) -> Result<FillReport, FillError> {
        execute_text(handle, value, self.deps()).await
    }

    async fn fill_choice(
        &self,
        handle: &ElementHandle,
        option: &ChoiceOption,
    ) -> Result<FillReport, FillError> {
        execute_choice(handle, option, self.deps()).await
    }
}
