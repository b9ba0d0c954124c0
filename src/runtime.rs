use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use autoapply_core_types::{ApplyError, Portal, Profile};
use autoapply_event_bus::{BridgeMessage, Command, CommandResponse, EventBus};
use dom_port::{DocumentPort, ElementHandle, Notice, NoticePort, TempoPort};
use field_classifier::FieldClassifier;
use form_fill::FillExecutorBuilder;
use modal_observer::{ModalInstance, ModalObserver, MutationTick};
use portal_adapters::{adapter_for, FillDeps, PortalAdapter};
use submission_flow::{FlowError, FlowOutcome, SubmissionMachine};

use crate::config::RuntimeConfig;
use crate::notices::TtlNotices;
use crate::store::{ProfileStore, StoredState};

pub type FlowHandle = JoinHandle<Result<FlowOutcome, FlowError>>;

const MISSING_PROFILE: &str = "Set up your profile in the extension first!";

/// Host capabilities the runtime is embedded with.
#[derive(Clone)]
pub struct RuntimePorts {
    pub document: Arc<dyn DocumentPort>,
    pub notices: Arc<dyn NoticePort>,
    pub tempo: Arc<dyn TempoPort>,
    pub bus: Arc<dyn EventBus<BridgeMessage>>,
    pub store: Arc<dyn ProfileStore>,
}

/// Outcome of one observer-triggered pass.
#[derive(Debug)]
pub struct ModalPass {
    pub modal: ElementHandle,
    pub filled: usize,
    /// Submission machine started after the fill, if auto-submit was on.
    pub flow: Option<FlowHandle>,
}

/// Everything the page-embedded side does for one page visit.
pub struct ContentRuntime {
    portal: Portal,
    adapter: Arc<dyn PortalAdapter>,
    ports: RuntimePorts,
    deps: FillDeps,
    config: RuntimeConfig,
}

impl ContentRuntime {
    pub fn new(host: &str, ports: RuntimePorts, config: RuntimeConfig) -> Result<Self, ApplyError> {
        let portal = Portal::from_host(host);
        let executor = FillExecutorBuilder::new(config.fill.clone())
            .with_document(ports.document.clone())
            .build()?;
        let notices: Arc<dyn NoticePort> =
            Arc::new(TtlNotices::new(ports.notices.clone(), config.notice_ttl()));
        let deps = FillDeps {
            document: ports.document.clone(),
            notices,
            executor,
            classifier: FieldClassifier::new(config.classifier.clone()),
        };
        info!(target: "autoapply", %portal, host, "content runtime ready");
        Ok(Self {
            portal,
            adapter: adapter_for(portal),
            ports,
            deps,
            config,
        })
    }

    pub fn portal(&self) -> Portal {
        self.portal
    }

    /// Runs one fill pass. Adapter faults never escape: they are reported to
    /// the user and count as zero fills.
    pub async fn fill_pass(&self, profile: &Profile) -> usize {
        match self.adapter.fill(&self.deps, profile).await {
            Ok(attempt) => attempt.filled,
            Err(err) => {
                warn!(target: "autoapply", portal = %self.portal, "fill pass failed: {}", err);
                self.notify(Notice::warn("Error filling form")).await;
                0
            }
        }
    }

    /// Answers a popup command. The returned handle, if any, is the
    /// submission machine the command started; the response never waits
    /// for it.
    #[instrument(skip_all, fields(portal = %self.portal, command = ?command))]
    pub async fn handle_command(&self, command: Command) -> (CommandResponse, Option<FlowHandle>) {
        let state = self.load_state().await;
        let Some(profile) = state.profile else {
            return match command {
                Command::FillForm => {
                    self.notify(Notice::warn(MISSING_PROFILE)).await;
                    (
                        CommandResponse::Filled {
                            success: false,
                            filled: 0,
                        },
                        None,
                    )
                }
                Command::FullApply => (CommandResponse::Applied { success: false }, None),
            };
        };

        match command {
            Command::FillForm => {
                let filled = self.fill_pass(&profile).await;
                let flow = state
                    .settings
                    .auto_submit
                    .then(|| self.spawn_machine(profile, false));
                (
                    CommandResponse::Filled {
                        success: filled > 0,
                        filled,
                    },
                    flow,
                )
            }
            Command::FullApply => {
                let flow = self.spawn_machine(profile, true);
                (CommandResponse::Applied { success: true }, Some(flow))
            }
        }
    }

    /// Watches for apply dialogs until `ticks` closes. Each fresh dialog gets
    /// one fill pass, gated by the settings as they are at that moment.
    #[instrument(skip_all, fields(portal = %self.portal))]
    pub async fn observe(
        &self,
        ticks: mpsc::Receiver<MutationTick>,
    ) -> Result<Vec<ModalPass>, ApplyError> {
        let Some(modal) = self.adapter.spec().modal else {
            debug!(target: "autoapply", "portal has no apply dialog to watch");
            return Ok(Vec::new());
        };
        self.ports
            .tempo
            .settle(self.config.observer_start_delay())
            .await;

        let observer = ModalObserver::new(self.ports.document.clone(), modal.selectors);
        let (found_tx, mut found_rx) = mpsc::channel::<ModalInstance>(8);
        let handle_modals = async {
            let mut passes = Vec::new();
            while let Some(instance) = found_rx.recv().await {
                let state = self.load_state().await;
                if !state.settings.auto_fill || !state.settings.portal_enabled(self.portal) {
                    debug!(target: "autoapply", handle = %instance.handle, "auto-fill disabled");
                    continue;
                }
                let Some(profile) = state.profile else {
                    debug!(target: "autoapply", "no profile stored");
                    continue;
                };
                self.ports.tempo.settle(modal.fill_delay()).await;
                let filled = self.fill_pass(&profile).await;
                if filled > 0 {
                    self.notify(Notice::info(format!("ApplyAI auto-filled {} fields", filled)))
                        .await;
                }
                let flow = state
                    .settings
                    .auto_submit
                    .then(|| self.spawn_machine(profile, false));
                passes.push(ModalPass {
                    modal: instance.handle,
                    filled,
                    flow,
                });
            }
            passes
        };

        let (watched, passes) = tokio::join!(observer.run(ticks, found_tx), handle_modals);
        watched?;
        Ok(passes)
    }

    fn spawn_machine(&self, profile: Profile, fill_first: bool) -> FlowHandle {
        let mut machine = SubmissionMachine::new(
            self.adapter.clone(),
            self.deps.clone(),
            self.ports.tempo.clone(),
            self.ports.bus.clone(),
            profile,
        )
        .with_timing(self.config.flow.clone());
        if let Some(budget) = self.config.search_budget(self.portal) {
            machine = machine.with_search_budget(budget);
        }
        if fill_first {
            machine = machine.fill_first();
        }
        tokio::spawn(machine.run())
    }

    /// A store that cannot be read behaves like an empty one.
    async fn load_state(&self) -> StoredState {
        match self.ports.store.load().await {
            Ok(state) => state,
            Err(err) => {
                warn!(target: "autoapply", "profile store unreadable: {}", err);
                StoredState::default()
            }
        }
    }

    async fn notify(&self, notice: Notice) {
        self.deps.notices.show(notice).await;
    }
}
