use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use autoapply_core_types::{Portal, Profile};
use autoapply_event_bus::{BridgeMessage, EventBus};
use dom_port::{DomError, Notice, TempoPort};
use portal_adapters::{
    scrape_listing, FillAttempt, FillDeps, FlowProfile, ListingInfo, PortalAdapter,
};

use crate::controls::{find_control, ControlMatch};
use crate::errors::FlowError;
use crate::timing::FlowTiming;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    /// Running the machine's own fill pass before the first search.
    Filling,
    Searching,
    /// An advance control was found; the step is re-filled before clicking.
    Advancing { label: &'static str },
    Submitting { label: &'static str },
    Submitted,
    Stalled,
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Submitted | FlowState::Stalled)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowOutcome {
    pub portal: Portal,
    pub state: FlowState,
    pub searches: u32,
    pub advances: u32,
    /// Present once the machine submitted.
    pub listing: Option<ListingInfo>,
    /// Fill pass run by the machine itself, if it started in `Filling`.
    pub initial_fill: Option<FillAttempt>,
}

/// One submission attempt over a live page. Holds no state beyond the
/// current page visit; dropping it is the only way to cancel.
pub struct SubmissionMachine {
    adapter: Arc<dyn PortalAdapter>,
    deps: FillDeps,
    tempo: Arc<dyn TempoPort>,
    bus: Arc<dyn EventBus<BridgeMessage>>,
    profile: Profile,
    timing: FlowTiming,
    flow: FlowProfile,
    state: FlowState,
    searches: u32,
    advances: u32,
    listing: Option<ListingInfo>,
    initial_fill: Option<FillAttempt>,
}

impl SubmissionMachine {
    pub fn new(
        adapter: Arc<dyn PortalAdapter>,
        deps: FillDeps,
        tempo: Arc<dyn TempoPort>,
        bus: Arc<dyn EventBus<BridgeMessage>>,
        profile: Profile,
    ) -> Self {
        let flow = adapter.spec().flow;
        Self {
            adapter,
            deps,
            tempo,
            bus,
            profile,
            timing: FlowTiming::default(),
            flow,
            state: FlowState::Idle,
            searches: 0,
            advances: 0,
            listing: None,
            initial_fill: None,
        }
    }

    pub fn with_timing(mut self, timing: FlowTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_search_budget(mut self, budget: u32) -> Self {
        self.flow.search_budget = budget.max(1);
        self
    }

    /// Starts with a fill pass of its own instead of relying on the caller's.
    pub fn fill_first(mut self) -> Self {
        if self.state == FlowState::Idle {
            self.state = FlowState::Filling;
        }
        self
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn searches(&self) -> u32 {
        self.searches
    }

    pub fn advances(&self) -> u32 {
        self.advances
    }

    fn portal(&self) -> Portal {
        self.adapter.portal()
    }

    /// Performs one transition. Terminal states are absorbing.
    pub async fn step(&mut self) -> Result<FlowState, FlowError> {
        let next = match self.state {
            FlowState::Idle => {
                self.tempo.settle(self.timing.initial()).await;
                FlowState::Searching
            }
            FlowState::Filling => {
                self.initial_fill = self.refill().await;
                FlowState::Idle
            }
            FlowState::Searching => self.search().await?,
            FlowState::Advancing { label } => self.advance(label).await?,
            FlowState::Submitting { label } => self.submit(label).await?,
            terminal => terminal,
        };
        if next != self.state {
            debug!(target: "submission-flow", from = ?self.state, to = ?next, "transition");
        }
        self.state = next;
        Ok(next)
    }

    #[instrument(skip_all, fields(portal = %self.portal()))]
    pub async fn run(mut self) -> Result<FlowOutcome, FlowError> {
        while !self.state.is_terminal() {
            self.step().await?;
        }
        info!(
            target: "submission-flow",
            state = ?self.state,
            searches = self.searches,
            advances = self.advances,
            "submission flow finished"
        );
        Ok(FlowOutcome {
            portal: self.portal(),
            state: self.state,
            searches: self.searches,
            advances: self.advances,
            listing: self.listing,
            initial_fill: self.initial_fill,
        })
    }

    async fn search(&mut self) -> Result<FlowState, FlowError> {
        if self.searches >= self.flow.search_budget {
            return Ok(self.stall().await);
        }
        self.searches += 1;
        let document = self.deps.document.as_ref();

        if let Some(found) = find_control(document, self.flow.submit).await? {
            return Ok(FlowState::Submitting { label: found.label });
        }
        if let Some(found) = find_control(document, self.flow.advance).await? {
            self.advances += 1;
            return Ok(FlowState::Advancing { label: found.label });
        }
        if let Some(found) = find_control(document, self.flow.opener).await? {
            if self.click(&found).await? {
                self.tempo.settle(self.timing.opener_settle()).await;
            }
            return Ok(FlowState::Searching);
        }
        if self.searches >= self.flow.search_budget {
            return Ok(self.stall().await);
        }
        self.tempo.settle(self.timing.retry()).await;
        Ok(FlowState::Searching)
    }

    async fn advance(&mut self, label: &'static str) -> Result<FlowState, FlowError> {
        self.refill().await;
        self.tempo.settle(self.timing.advance_settle()).await;
        if let Some(control) = self.resolve(label).await? {
            if self.click(&control).await? {
                self.tempo.settle(self.timing.step_settle()).await;
            }
        }
        Ok(FlowState::Searching)
    }

    async fn submit(&mut self, label: &'static str) -> Result<FlowState, FlowError> {
        let portal = self.portal();
        self.deps
            .notices
            .show(Notice::info("Submitting application..."))
            .await;
        self.tempo.settle(self.timing.submit_settle()).await;

        let Some(control) = self.resolve(label).await? else {
            return Ok(FlowState::Searching);
        };
        let listing =
            scrape_listing(self.deps.document.as_ref(), &self.adapter.spec().listing).await;
        if !self.click(&control).await? {
            return Ok(FlowState::Searching);
        }

        self.deps
            .notices
            .show(Notice::success(format!(
                "Application submitted on {}!",
                portal.display_name()
            )))
            .await;
        self.bus
            .publish(BridgeMessage::ApplicationSubmitted {
                job_title: listing.job_title.clone(),
                company: listing.company.clone(),
                portal,
            })
            .await
            .map_err(FlowError::Publish)?;
        self.bus
            .publish(BridgeMessage::TrackApplication { portal })
            .await
            .map_err(FlowError::Publish)?;
        info!(
            target: "submission-flow",
            %portal,
            job_title = %listing.job_title,
            "application submitted"
        );
        self.listing = Some(listing);
        Ok(FlowState::Submitted)
    }

    async fn stall(&self) -> FlowState {
        warn!(
            target: "submission-flow",
            searches = self.searches,
            "no actionable control found"
        );
        self.deps
            .notices
            .show(Notice::warn(self.flow.stall_hint))
            .await;
        FlowState::Stalled
    }

    /// Fill pass over the current step. Adapter faults are reported to the
    /// user and otherwise ignored.
    async fn refill(&self) -> Option<FillAttempt> {
        match self.adapter.fill(&self.deps, &self.profile).await {
            Ok(attempt) => Some(attempt),
            Err(err) => {
                warn!(target: "submission-flow", "step fill failed: {}", err);
                self.deps
                    .notices
                    .show(Notice::warn("Error filling form"))
                    .await;
                None
            }
        }
    }

    /// Looks the control up again right before acting on it.
    async fn resolve(&self, label: &'static str) -> Result<Option<ControlMatch>, FlowError> {
        Ok(find_control(self.deps.document.as_ref(), &[label]).await?)
    }

    /// Clicks `control`; `false` when it vanished in the meantime.
    async fn click(&self, control: &ControlMatch) -> Result<bool, FlowError> {
        match self.deps.document.click(&control.handle).await {
            Ok(()) => {
                debug!(target: "submission-flow", label = control.label, "clicked");
                Ok(true)
            }
            Err(DomError::Detached(_)) => {
                debug!(target: "submission-flow", label = control.label, "control vanished");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }
}
