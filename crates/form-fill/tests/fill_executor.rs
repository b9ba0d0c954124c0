use std::sync::Arc;
use std::time::Duration;

use dom_port::{
    DocumentPort, DomEvent, DomRecord, MemoryDocument, NodeSpec, FILL_EVENT_SEQUENCE,
};
use form_fill::{FillError, FillExecutor, FillExecutorBuilder, FillKind, FillPolicyView};

fn executor(doc: &Arc<MemoryDocument>) -> Arc<dyn FillExecutor> {
    FillExecutorBuilder::new(FillPolicyView::default())
        .with_document(doc.clone())
        .build()
        .unwrap()
}

#[tokio::test]
async fn text_write_dispatches_events_in_order_then_highlights() {
    let doc = Arc::new(MemoryDocument::new());
    let email = doc.insert(NodeSpec::text_input("email"));
    let report = executor(&doc).fill_text(&email, "a@x.com").await.unwrap();

    assert_eq!(report.kind, FillKind::Text);
    assert!(report.highlighted);
    assert_eq!(doc.value(&email).as_deref(), Some("a@x.com"));
    assert_eq!(doc.events_for(&email), FILL_EVENT_SEQUENCE.to_vec());
    assert_eq!(
        doc.records(),
        vec![
            DomRecord::Write {
                handle: email.clone(),
                value: "a@x.com".into()
            },
            DomRecord::Event {
                handle: email.clone(),
                event: DomEvent::Input
            },
            DomRecord::Event {
                handle: email.clone(),
                event: DomEvent::Change
            },
            DomRecord::Event {
                handle: email.clone(),
                event: DomEvent::Blur
            },
            DomRecord::Highlight {
                handle: email,
                ttl: Duration::from_millis(3000)
            },
        ]
    );
}

#[tokio::test]
async fn empty_value_is_never_written_or_highlighted() {
    let doc = Arc::new(MemoryDocument::new());
    let city = doc.insert(NodeSpec::text_input("city"));
    let err = executor(&doc).fill_text(&city, "  ").await.unwrap_err();
    assert!(matches!(err, FillError::EmptyValue));
    assert!(doc.records().is_empty());
    assert!(!doc.is_highlighted(&city));
}

#[tokio::test]
async fn disabled_readonly_and_detached_are_refused() {
    let doc = Arc::new(MemoryDocument::new());
    let exec = executor(&doc);
    let disabled = doc.insert(NodeSpec::text_input("a").disabled());
    let read_only = doc.insert(NodeSpec::text_input("b").read_only());
    let gone = doc.insert(NodeSpec::text_input("c"));
    doc.remove(&gone);

    assert!(matches!(
        exec.fill_text(&disabled, "x").await,
        Err(FillError::DisabledField)
    ));
    assert!(matches!(
        exec.fill_text(&read_only, "x").await,
        Err(FillError::ReadOnly)
    ));
    let err = exec.fill_text(&gone, "x").await.unwrap_err();
    assert!(matches!(err, FillError::Detached(_)));
    assert!(err.is_element_local());
    assert!(doc.writes().is_empty());
}

#[tokio::test]
async fn select_takes_option_value() {
    let doc = Arc::new(MemoryDocument::new());
    let select = doc.insert(
        NodeSpec::select("exp")
            .option("", "Choose")
            .option("2", "2 years")
            .option("3", "3 years"),
    );
    let snap = doc.snapshot(&select).await.unwrap();
    let report = executor(&doc)
        .fill_choice(&select, &snap.options[2])
        .await
        .unwrap();
    assert_eq!(report.kind, FillKind::Select);
    assert_eq!(doc.value(&select).as_deref(), Some("3"));
}

#[tokio::test]
async fn radio_option_is_clicked() {
    let doc = Arc::new(MemoryDocument::new());
    let group = doc.insert(NodeSpec::new("fieldset").text("Are you authorized to work?"));
    doc.insert_under(&group, NodeSpec::radio("auth", "No"));
    let yes = doc.insert_under(&group, NodeSpec::radio("auth", "Yes"));
    let snap = doc.snapshot(&group).await.unwrap();

    let report = executor(&doc)
        .fill_choice(&group, &snap.options[1])
        .await
        .unwrap();
    assert_eq!(report.kind, FillKind::Radio);
    assert_eq!(report.events, vec![DomEvent::Change]);
    assert_eq!(doc.events_for(&yes), vec![DomEvent::Change]);
    assert!(doc.snapshot(&yes).await.unwrap().checked);
    assert!(doc.is_highlighted(&group));
}

#[tokio::test]
async fn host_failure_is_not_element_local() {
    let doc = Arc::new(MemoryDocument::new());
    let name = doc.insert(NodeSpec::text_input("name"));
    doc.fail_queries(Some("frame gone"));
    let err = executor(&doc).fill_text(&name, "Asha").await.unwrap_err();
    assert!(!err.is_element_local());
}

#[test]
fn builder_requires_a_document() {
    assert!(FillExecutorBuilder::new(FillPolicyView::default())
        .build()
        .is_err());
}
