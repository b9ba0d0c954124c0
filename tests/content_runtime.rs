use std::sync::Arc;
use std::time::Duration;

use autoapply::{
    BridgeMessage, Command, CommandResponse, ContentRuntime, MemoryProfileStore, Portal, Profile,
    RuntimeConfig, RuntimePorts, Settings,
};
use autoapply_event_bus::{EventBus, InMemoryBus};
use dom_port::{MemoryDocument, NodeSpec, NoticeKind, VirtualTempo};
use modal_observer::MutationTick;
use submission_flow::FlowState;
use tokio::sync::broadcast::Receiver;
use tokio::sync::mpsc;

struct Page {
    doc: Arc<MemoryDocument>,
    tempo: Arc<VirtualTempo>,
    bus: Arc<InMemoryBus<BridgeMessage>>,
    store: Arc<MemoryProfileStore>,
    events: Receiver<BridgeMessage>,
}

impl Page {
    fn new() -> Self {
        let bus = InMemoryBus::<BridgeMessage>::new(16);
        let events = bus.subscribe();
        Self {
            doc: Arc::new(MemoryDocument::new()),
            tempo: Arc::new(VirtualTempo::new()),
            bus,
            store: Arc::new(MemoryProfileStore::with_profile(&asha())),
            events,
        }
    }

    fn settings(&self, settings: Settings) -> &Self {
        self.store.put_settings(&settings);
        self
    }

    fn runtime(&self, host: &str) -> ContentRuntime {
        self.runtime_with(host, RuntimeConfig::default())
    }

    fn runtime_with(&self, host: &str, config: RuntimeConfig) -> ContentRuntime {
        let ports = RuntimePorts {
            document: self.doc.clone(),
            notices: self.doc.clone(),
            tempo: self.tempo.clone(),
            bus: self.bus.clone(),
            store: self.store.clone(),
        };
        ContentRuntime::new(host, ports, config).unwrap()
    }

    fn drain(&mut self) -> Vec<BridgeMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = self.events.try_recv() {
            out.push(msg);
        }
        out
    }

    fn last_notice(&self) -> (NoticeKind, String) {
        let notice = self.doc.notices().pop().expect("a notice was shown");
        (notice.kind, notice.message)
    }
}

fn asha() -> Profile {
    Profile {
        name: Some("Asha Rao".into()),
        email: Some("a@x.com".into()),
        phone: Some("9999999999".into()),
        experience: Some("3".into()),
        ..Profile::default()
    }
}

fn manual() -> Settings {
    Settings {
        auto_submit: false,
        ..Settings::default()
    }
}

fn ms(values: &[u64]) -> Vec<Duration> {
    values.iter().map(|v| Duration::from_millis(*v)).collect()
}

fn linkedin_modal(page: &Page) -> dom_port::ElementHandle {
    let modal = page
        .doc
        .insert(NodeSpec::new("div").attr("class", "jobs-easy-apply-modal"));
    page.doc
        .insert_under(&modal, NodeSpec::text_input("firstName"));
    modal
}

async fn wait_for(mut ready: impl FnMut() -> bool) {
    for _ in 0..10_000 {
        if ready() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}

#[tokio::test]
async fn fill_form_fills_the_generic_page_without_submitting() {
    let page = Page::new();
    page.settings(manual());
    for name in [
        "first_name",
        "last_name",
        "email",
        "phone",
        "years_of_experience",
    ] {
        page.doc.insert(NodeSpec::text_input(name));
    }
    let mut config = RuntimeConfig::default();
    config.notice_ttl_ms = 4000;
    let runtime = page.runtime_with("careers.example.org", config);
    assert_eq!(runtime.portal(), Portal::Generic);

    let (response, flow) = runtime.handle_command(Command::FillForm).await;

    assert_eq!(
        response,
        CommandResponse::Filled {
            success: true,
            filled: 5
        }
    );
    assert!(flow.is_none());
    assert_eq!(page.doc.value_by_name("first_name").as_deref(), Some("Asha"));
    assert_eq!(page.doc.value_by_name("last_name").as_deref(), Some("Rao"));
    assert_eq!(page.doc.value_by_name("email").as_deref(), Some("a@x.com"));
    assert_eq!(page.doc.value_by_name("phone").as_deref(), Some("9999999999"));
    assert_eq!(
        page.doc.value_by_name("years_of_experience").as_deref(),
        Some("3")
    );
    let notices = page.doc.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Filled 5 fields!");
    assert_eq!(notices[0].ttl, Duration::from_millis(4000));
    assert!(page.doc.clicked_labels().is_empty());
}

#[tokio::test]
async fn fill_form_with_auto_submit_starts_the_machine() {
    let mut page = Page::new();
    page.doc.insert(NodeSpec::text_input("email"));
    page.doc.insert(NodeSpec::button("Apply Now"));
    let runtime = page.runtime("careers.example.org");

    let (response, flow) = runtime.handle_command(Command::FillForm).await;
    assert!(response.success());

    let outcome = flow.expect("machine started").await.unwrap().unwrap();
    assert_eq!(outcome.state, FlowState::Submitted);
    assert_eq!(outcome.initial_fill, None);
    assert_eq!(page.doc.clicked_labels(), vec!["Apply Now".to_string()]);
    assert_eq!(
        page.drain(),
        vec![
            BridgeMessage::ApplicationSubmitted {
                job_title: "Job".into(),
                company: "Company".into(),
                portal: Portal::Generic,
            },
            BridgeMessage::TrackApplication {
                portal: Portal::Generic
            },
        ]
    );
}

#[tokio::test]
async fn missing_profile_short_circuits_before_touching_the_page() {
    let page = Page::new();
    page.store.remove(autoapply::store::PROFILE_KEY);
    page.doc.insert(NodeSpec::text_input("email"));
    let runtime = page.runtime("www.naukri.com");

    let (response, flow) = runtime.handle_command(Command::FillForm).await;
    assert_eq!(
        response,
        CommandResponse::Filled {
            success: false,
            filled: 0
        }
    );
    assert!(flow.is_none());
    assert_eq!(
        page.last_notice(),
        (
            NoticeKind::Warn,
            "Set up your profile in the extension first!".to_string()
        )
    );

    let (response, flow) = runtime.handle_command(Command::FullApply).await;
    assert_eq!(response, CommandResponse::Applied { success: false });
    assert!(flow.is_none());
    assert_eq!(page.doc.notices().len(), 1);
    assert!(page.doc.records().is_empty());
}

#[tokio::test]
async fn unreadable_store_behaves_like_a_missing_profile() {
    let page = Page::new();
    page.store.set_unavailable(Some("extension context invalidated"));
    let runtime = page.runtime("careers.example.org");

    let (response, _) = runtime.handle_command(Command::FillForm).await;
    assert!(!response.success());
    assert!(page.doc.records().is_empty());
}

#[tokio::test]
async fn malformed_settings_still_fill_with_the_stored_profile() {
    let page = Page::new();
    page.store.put_raw(
        autoapply::store::SETTINGS_KEY,
        serde_json::json!({"auto_submit": "sometimes"}),
    );
    page.doc.insert(NodeSpec::text_input("email"));
    let runtime = page.runtime("careers.example.org");

    let (response, flow) = runtime.handle_command(Command::FillForm).await;
    assert_eq!(
        response,
        CommandResponse::Filled {
            success: true,
            filled: 1
        }
    );
    // Default settings apply, so auto-submit is on.
    assert!(flow.is_some());
    assert_eq!(page.doc.value_by_name("email").as_deref(), Some("a@x.com"));
    assert!(page
        .doc
        .notices()
        .iter()
        .all(|n| !n.message.starts_with("Set up your profile")));
}

#[tokio::test]
async fn full_apply_submits_even_when_auto_submit_is_off() {
    let mut page = Page::new();
    page.settings(manual());
    page.doc.insert(NodeSpec::text_input("email"));
    page.doc.insert(NodeSpec::button("Submit"));
    let runtime = page.runtime("careers.example.org");

    let (response, flow) = runtime.handle_command(Command::FullApply).await;
    assert_eq!(response, CommandResponse::Applied { success: true });

    let outcome = flow.expect("forced machine").await.unwrap().unwrap();
    assert_eq!(outcome.state, FlowState::Submitted);
    assert_eq!(outcome.initial_fill.map(|a| a.filled), Some(1));
    assert_eq!(page.doc.value_by_name("email").as_deref(), Some("a@x.com"));
    assert_eq!(page.drain().len(), 2);
}

#[tokio::test]
async fn adapter_failure_is_reported_as_zero_fills() {
    let page = Page::new();
    page.settings(manual());
    page.doc.insert(NodeSpec::text_input("email"));
    page.doc.fail_queries(Some("renderer crashed"));
    let runtime = page.runtime("careers.example.org");

    let (response, flow) = runtime.handle_command(Command::FillForm).await;

    assert_eq!(
        response,
        CommandResponse::Filled {
            success: false,
            filled: 0
        }
    );
    assert!(flow.is_none());
    assert_eq!(
        page.last_notice(),
        (NoticeKind::Warn, "Error filling form".to_string())
    );
}

#[tokio::test]
async fn explicit_commands_ignore_portal_toggles() {
    let page = Page::new();
    let mut settings = manual();
    settings.portals.insert("linkedin".into(), false);
    page.settings(settings);
    page.doc.insert(NodeSpec::text_input("firstName"));
    let runtime = page.runtime("www.linkedin.com");

    let (response, _) = runtime.handle_command(Command::FillForm).await;
    assert_eq!(
        response,
        CommandResponse::Filled {
            success: true,
            filled: 1
        }
    );
}

#[tokio::test]
async fn reinserted_dialog_gets_a_fresh_fill_pass() {
    let page = Page::new();
    page.settings(manual());
    let runtime = page.runtime("www.linkedin.com");
    let (tx, rx) = mpsc::channel(8);

    let driver = async {
        let first = linkedin_modal(&page);
        tx.send(MutationTick).await.unwrap();
        wait_for(|| page.doc.value_by_name("firstName").as_deref() == Some("Asha")).await;

        // the pass's own writes must not re-trigger it
        tx.send(MutationTick).await.unwrap();
        page.doc.remove(&first);
        tx.send(MutationTick).await.unwrap();

        let second = linkedin_modal(&page);
        tx.send(MutationTick).await.unwrap();
        tx.send(MutationTick).await.unwrap();
        drop(tx);
        (first, second)
    };

    let (passes, (first, second)) = tokio::join!(runtime.observe(rx), driver);
    let passes = passes.unwrap();

    assert_eq!(passes.len(), 2);
    assert_eq!(passes[0].modal, first);
    assert_eq!(passes[1].modal, second);
    assert!(passes.iter().all(|p| p.filled == 1 && p.flow.is_none()));
    assert_eq!(page.doc.value_by_name("firstName").as_deref(), Some("Asha"));
    assert_eq!(page.tempo.delays(), ms(&[2000, 800, 800]));
    assert_eq!(
        page.last_notice(),
        (NoticeKind::Info, "ApplyAI auto-filled 1 fields".to_string())
    );
}

#[tokio::test]
async fn disabled_portal_marks_dialogs_without_filling() {
    let page = Page::new();
    let mut settings = Settings::default();
    settings.portals.insert("linkedin".into(), false);
    page.settings(settings);
    let runtime = page.runtime("www.linkedin.com");

    linkedin_modal(&page);
    let (tx, rx) = mpsc::channel(2);
    tx.send(MutationTick).await.unwrap();
    drop(tx);

    let passes = runtime.observe(rx).await.unwrap();
    assert!(passes.is_empty());
    assert!(page.doc.records().is_empty());
    assert_eq!(page.tempo.delays(), ms(&[2000]));
}

#[tokio::test]
async fn auto_fill_switch_gates_the_observer() {
    let page = Page::new();
    page.settings(Settings {
        auto_fill: false,
        ..Settings::default()
    });
    let runtime = page.runtime("www.linkedin.com");

    linkedin_modal(&page);
    let (tx, rx) = mpsc::channel(2);
    tx.send(MutationTick).await.unwrap();
    drop(tx);

    assert!(runtime.observe(rx).await.unwrap().is_empty());
    assert!(page.doc.writes().is_empty());
}

#[tokio::test]
async fn observed_dialog_with_auto_submit_runs_to_submission() {
    let mut page = Page::new();
    let runtime = page.runtime("www.linkedin.com");
    let modal = linkedin_modal(&page);
    page.doc
        .insert_under(&modal, NodeSpec::button("Submit application"));

    let (tx, rx) = mpsc::channel(2);
    tx.send(MutationTick).await.unwrap();
    drop(tx);

    let mut passes = runtime.observe(rx).await.unwrap();
    assert_eq!(passes.len(), 1);
    let flow = passes.remove(0).flow.expect("machine started");
    let outcome = flow.await.unwrap().unwrap();

    assert_eq!(outcome.state, FlowState::Submitted);
    assert_eq!(
        page.drain(),
        vec![
            BridgeMessage::ApplicationSubmitted {
                job_title: "LinkedIn Job".into(),
                company: "Company".into(),
                portal: Portal::LinkedIn,
            },
            BridgeMessage::TrackApplication {
                portal: Portal::LinkedIn
            },
        ]
    );
}

#[tokio::test]
async fn portals_without_dialogs_are_not_observed() {
    let page = Page::new();
    let runtime = page.runtime("in.indeed.com");
    let (_tx, rx) = mpsc::channel(1);
    assert!(runtime.observe(rx).await.unwrap().is_empty());
    assert!(page.tempo.delays().is_empty());
}

#[tokio::test]
async fn configured_search_budget_applies_to_started_machines() {
    let page = Page::new();
    page.doc.insert(NodeSpec::text_input("firstName"));
    let mut config = RuntimeConfig::default();
    config.search_budgets.insert("linkedin".into(), 2);
    let runtime = page.runtime_with("www.linkedin.com", config);

    let (_, flow) = runtime.handle_command(Command::FillForm).await;
    let outcome = flow.expect("auto-submit on").await.unwrap().unwrap();

    assert_eq!(outcome.state, FlowState::Stalled);
    assert_eq!(outcome.searches, 2);
    assert_eq!(page.tempo.delays(), ms(&[1500, 1000]));
}
