use std::fmt;

use dom_port::ElementSnapshot;

/// Which identifying parts of an element feed the signal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SignalScope {
    /// id, name, placeholder and aria-label only.
    Attributes,
    /// The most specific human-readable label available.
    Label,
}

/// Normalized lowercase fingerprint of an element.
///
/// camelCase boundaries are split and every run of non-alphanumerics becomes
/// a single space, so `firstName`, `first_name` and `first-name` all read
/// `first name`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Signal(String);

impl Signal {
    pub fn normalize(raw: &str) -> Self {
        let mut out = String::with_capacity(raw.len());
        let mut prev: Option<char> = None;
        let mut pending_space = false;
        for ch in raw.chars() {
            if ch.is_alphanumeric() {
                let camel_break = ch.is_uppercase()
                    && prev.map_or(false, |p| p.is_lowercase() || p.is_ascii_digit());
                if (pending_space || camel_break) && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.extend(ch.to_lowercase());
            } else {
                pending_space = true;
            }
            prev = Some(ch);
        }
        Self(out)
    }

    pub fn from_element(el: &ElementSnapshot, scope: SignalScope) -> Self {
        match scope {
            SignalScope::Attributes => Self::normalize(&attribute_parts(el).join(" ")),
            SignalScope::Label => Self::normalize(label_text(el).unwrap_or_default()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|needle| self.0.contains(needle))
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn attribute_parts(el: &ElementSnapshot) -> Vec<&str> {
    [el.id(), el.name(), el.placeholder(), el.aria_label()]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect()
}

/// Explicit label, then accessible name, then a group legend, then
/// placeholder and name, finally the nearest ancestor text.
fn label_text(el: &ElementSnapshot) -> Option<&str> {
    let legend = (el.tag == "fieldset").then_some(el.text.as_str());
    [
        el.label_text.as_deref(),
        el.aria_label(),
        legend,
        el.placeholder(),
        el.name(),
        el.ancestor_text.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find(|candidate| !candidate.trim().is_empty())
}
