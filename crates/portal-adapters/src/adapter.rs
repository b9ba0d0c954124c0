use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use autoapply_core_types::{PassId, Portal, Profile};
use dom_port::{DocumentPort, Notice, NoticePort};
use field_classifier::FieldClassifier;
use form_fill::FillExecutor;

use crate::attempt::FillAttempt;
use crate::binding;
use crate::errors::AdapterError;
use crate::spec::PortalSpec;
use crate::sweeps::{self, SweepCtx};

/// Ports a fill pass borrows. Cheap to clone.
#[derive(Clone)]
pub struct FillDeps {
    pub document: Arc<dyn DocumentPort>,
    pub notices: Arc<dyn NoticePort>,
    pub executor: Arc<dyn FillExecutor>,
    pub classifier: FieldClassifier,
}

#[async_trait]
pub trait PortalAdapter: Send + Sync {
    fn portal(&self) -> Portal {
        self.spec().portal
    }

    fn spec(&self) -> &PortalSpec;

    /// Runs one fill pass over the document as it is now and shows exactly
    /// one notice summarizing the count.
    async fn fill(&self, deps: &FillDeps, profile: &Profile) -> Result<FillAttempt, AdapterError>;
}

/// Adapter driven entirely by a [`PortalSpec`].
pub struct DeclarativeAdapter {
    spec: PortalSpec,
}

impl DeclarativeAdapter {
    pub fn new(spec: PortalSpec) -> Self {
        Self { spec }
    }
}

pub fn adapter_for(portal: Portal) -> Arc<dyn PortalAdapter> {
    Arc::new(DeclarativeAdapter::new(PortalSpec::for_portal(portal)))
}

#[async_trait]
impl PortalAdapter for DeclarativeAdapter {
    fn spec(&self) -> &PortalSpec {
        &self.spec
    }

    #[instrument(skip_all, fields(portal = %self.spec.portal, pass = tracing::field::Empty))]
    async fn fill(&self, deps: &FillDeps, profile: &Profile) -> Result<FillAttempt, AdapterError> {
        let pass_id = PassId::new();
        tracing::Span::current().record("pass", tracing::field::display(&pass_id));

        let mut touched = HashSet::new();
        let mut ctx = SweepCtx {
            document: deps.document.as_ref(),
            executor: deps.executor.as_ref(),
            touched: &mut touched,
            filled: 0,
        };

        for bound in &self.spec.bindings {
            let Some(value) = bound.value.resolve(&deps.classifier, profile) else {
                continue;
            };
            let Some(target) = binding::locate(ctx.document, bound, ctx.touched).await? else {
                continue;
            };
            let outcome = ctx
                .executor
                .fill_text(&target.handle, &value)
                .await
                .map(|_| ());
            ctx.settle(&target.handle, outcome)?;
        }
        debug!(target: "portal-adapters", filled = ctx.filled, "explicit bindings done");

        if self.spec.sweeps.cover_letter {
            sweeps::cover_letter_sweep(&mut ctx, profile).await?;
        }
        if self.spec.sweeps.screeners {
            sweeps::screener_sweep(&mut ctx, profile).await?;
        }
        if ctx.filled == 0 {
            sweeps::generic_sweep(&mut ctx, &deps.classifier, profile).await?;
        }

        let filled = ctx.filled;
        deps.notices
            .show(Notice::success(self.spec.fill_notice(filled)))
            .await;
        info!(target: "portal-adapters", filled, "fill pass complete");
        Ok(FillAttempt::new(pass_id, self.spec.portal, filled))
    }
}
