use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque reference to a live node, issued by the host.
///
/// A handle is only meaningful until the host replaces the node; a
/// re-inserted subtree gets fresh handles even when it looks identical.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ElementHandle(pub String);

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Notifications dispatched after a value write.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DomEvent {
    Input,
    Change,
    Blur,
}

impl DomEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomEvent::Input => "input",
            DomEvent::Change => "change",
            DomEvent::Blur => "blur",
        }
    }
}

/// Order reactive pages expect after a programmatic value change.
pub const FILL_EVENT_SEQUENCE: [DomEvent; 3] = [DomEvent::Input, DomEvent::Change, DomEvent::Blur];

/// One selectable option of a select or radio group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub text: String,
    /// Radio options are nodes of their own; select options are not.
    pub handle: Option<ElementHandle>,
}

/// Detached, read-only copy of an element's identifying state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub handle: ElementHandle,
    /// Lowercase tag name.
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    /// Live value (not the `value` attribute).
    pub value: String,
    /// Trimmed visible text content.
    pub text: String,
    pub disabled: bool,
    pub read_only: bool,
    /// Live checked state of a radio or checkbox, not the `checked`
    /// attribute, which only holds the initial state.
    pub checked: bool,
    /// Rendered and laid out (`offsetParent` present).
    pub visible: bool,
    /// Text of the label associated through `for` or `aria-labelledby`.
    pub label_text: Option<String>,
    /// Text of the nearest ancestor carrying text.
    pub ancestor_text: Option<String>,
    pub options: Vec<ChoiceOption>,
}

impl ElementSnapshot {
    pub fn new(handle: ElementHandle, tag: impl Into<String>) -> Self {
        Self {
            handle,
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            value: String::new(),
            text: String::new(),
            disabled: false,
            read_only: false,
            checked: false,
            visible: true,
            label_text: None,
            ancestor_text: None,
            options: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.attr("name")
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.attr("placeholder")
    }

    pub fn aria_label(&self) -> Option<&str> {
        self.attr("aria-label")
    }

    /// Lowercase `type` of an input, defaulting to `text` like the DOM does.
    pub fn input_type(&self) -> Option<String> {
        if self.tag != "input" {
            return None;
        }
        Some(
            self.attr("type")
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "text".to_string()),
        )
    }

    pub fn is_hidden(&self) -> bool {
        !self.visible || self.input_type().as_deref() == Some("hidden")
    }

    pub fn is_textarea(&self) -> bool {
        self.tag == "textarea"
    }

    pub fn is_select(&self) -> bool {
        self.tag == "select"
    }

    /// Free-text entry: textareas and inputs that take typed text.
    pub fn is_text_entry(&self) -> bool {
        if self.is_textarea() {
            return true;
        }
        match self.input_type().as_deref() {
            Some("hidden" | "submit" | "button" | "reset" | "image" | "checkbox" | "radio"
            | "file") => false,
            Some(_) => true,
            None => false,
        }
    }

    pub fn has_value(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// Can take a value without the user losing anything.
    pub fn is_blank_and_writable(&self) -> bool {
        !self.disabled && !self.read_only && !self.has_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(ty: Option<&str>) -> ElementSnapshot {
        let mut el = ElementSnapshot::new(ElementHandle("n1".into()), "INPUT");
        if let Some(ty) = ty {
            el.attributes.insert("type".into(), ty.into());
        }
        el
    }

    #[test]
    fn input_type_defaults_to_text() {
        assert_eq!(input(None).input_type().as_deref(), Some("text"));
        assert_eq!(input(Some("TEL")).input_type().as_deref(), Some("tel"));
    }

    #[test]
    fn text_entry_excludes_buttons_and_toggles() {
        assert!(input(None).is_text_entry());
        assert!(input(Some("email")).is_text_entry());
        assert!(!input(Some("submit")).is_text_entry());
        assert!(!input(Some("checkbox")).is_text_entry());
        assert!(!input(Some("hidden")).is_text_entry());
    }

    #[test]
    fn blank_and_writable_rejects_prefilled() {
        let mut el = input(None);
        assert!(el.is_blank_and_writable());
        el.value = "a@x.com".into();
        assert!(!el.is_blank_and_writable());
        el.value.clear();
        el.read_only = true;
        assert!(!el.is_blank_and_writable());
    }
}
