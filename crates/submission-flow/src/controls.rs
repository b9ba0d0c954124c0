use dom_port::{DocumentPort, DomError, ElementHandle, ElementSnapshot};

/// Elements that can act as apply controls.
pub const CONTROL_SELECTOR: &str = r#"button, input[type="submit"], a[role="button"]"#;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlMatch {
    pub handle: ElementHandle,
    /// The declared label that matched.
    pub label: &'static str,
}

/// Exact, case-insensitive match on trimmed text, value or aria-label.
pub fn label_matches(el: &ElementSnapshot, label: &str) -> bool {
    let wanted = label.trim();
    [Some(el.text.as_str()), el.attr("value"), el.aria_label()]
        .into_iter()
        .flatten()
        .any(|candidate| candidate.trim().eq_ignore_ascii_case(wanted))
}

/// First visible, enabled control matching the earliest label in `labels`.
/// Label order wins over document order.
pub async fn find_control(
    document: &dyn DocumentPort,
    labels: &[&'static str],
) -> Result<Option<ControlMatch>, DomError> {
    if labels.is_empty() {
        return Ok(None);
    }
    let controls = document.query_all(CONTROL_SELECTOR).await?;
    for &label in labels {
        if let Some(el) = controls
            .iter()
            .find(|el| label_matches(el, label) && el.visible && !el.disabled)
        {
            return Ok(Some(ControlMatch {
                handle: el.handle.clone(),
                label,
            }));
        }
    }
    Ok(None)
}
