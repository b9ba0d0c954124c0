use tracing::{debug, instrument, warn};

use dom_port::{ChoiceOption, DocumentPort, DomEvent, ElementHandle, FILL_EVENT_SEQUENCE};

use crate::errors::FillError;
use crate::model::{FillKind, FillReport};
use crate::policy::FillPolicyView;
use crate::precheck;

pub struct RuntimeDeps<'a> {
    pub document: &'a dyn DocumentPort,
    pub policy: &'a FillPolicyView,
}

#[instrument(skip_all, fields(handle = %handle))]
pub async fn execute_text(
    handle: &ElementHandle,
    value: &str,
    deps: RuntimeDeps<'_>,
) -> Result<FillReport, FillError> {
    if value.trim().is_empty() {
        return Err(FillError::EmptyValue);
    }
    if value.chars().count() > deps.policy.max_text_len {
        return Err(FillError::TextTooLong(deps.policy.max_text_len));
    }
    precheck::run_precheck(deps.document, handle, deps.policy).await?;

    deps.document.write_value(handle, value).await?;
    let events = notify(deps.document, handle, &FILL_EVENT_SEQUENCE).await?;
    let highlighted = highlight(&deps, handle).await;
    debug!(target: "form-fill", "text written");
    Ok(FillReport {
        handle: handle.clone(),
        kind: FillKind::Text,
        value: value.to_string(),
        events,
        highlighted,
    })
}

#[instrument(skip_all, fields(handle = %handle, option = %option.value))]
pub async fn execute_choice(
    handle: &ElementHandle,
    option: &ChoiceOption,
    deps: RuntimeDeps<'_>,
) -> Result<FillReport, FillError> {
    let target = precheck::run_precheck(deps.document, handle, deps.policy).await?;

    let (kind, events) = if target.is_select() {
        if option.value.trim().is_empty() {
            return Err(FillError::EmptyValue);
        }
        deps.document.write_value(handle, &option.value).await?;
        let events = notify(deps.document, handle, &FILL_EVENT_SEQUENCE).await?;
        (FillKind::Select, events)
    } else {
        let radio = option
            .handle
            .as_ref()
            .ok_or_else(|| FillError::UnselectableOption(option.value.clone()))?;
        deps.document.click(radio).await?;
        let events = notify(deps.document, radio, &[DomEvent::Change]).await?;
        (FillKind::Radio, events)
    };

    let highlighted = highlight(&deps, handle).await;
    debug!(target: "form-fill", ?kind, "choice selected");
    Ok(FillReport {
        handle: handle.clone(),
        kind,
        value: option.value.clone(),
        events,
        highlighted,
    })
}

async fn notify(
    document: &dyn DocumentPort,
    handle: &ElementHandle,
    sequence: &[DomEvent],
) -> Result<Vec<DomEvent>, FillError> {
    for event in sequence {
        document.dispatch(handle, *event).await?;
    }
    Ok(sequence.to_vec())
}

async fn highlight(deps: &RuntimeDeps<'_>, handle: &ElementHandle) -> bool {
    match deps
        .document
        .highlight(handle, deps.policy.highlight_ttl())
        .await
    {
        Ok(()) => true,
        Err(err) => {
            warn!(target: "form-fill", %handle, "highlight skipped: {}", err);
            false
        }
    }
}
