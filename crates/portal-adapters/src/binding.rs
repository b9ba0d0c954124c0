//! Explicit bindings and their resolution chain

use std::collections::HashSet;

use tracing::{debug, warn};

use autoapply_core_types::{Profile, ProfileField};
use dom_port::{DocumentPort, DomError, ElementHandle, ElementSnapshot};
use field_classifier::FieldClassifier;

/// What a binding writes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BindingValue {
    Field(ProfileField),
    Literal(&'static str),
}

impl BindingValue {
    /// Concrete value for this pass, or `None` when there is nothing to write.
    pub fn resolve(&self, classifier: &FieldClassifier, profile: &Profile) -> Option<String> {
        match self {
            BindingValue::Field(field) => classifier.value_for(*field, profile),
            BindingValue::Literal(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
        }
    }
}

/// Alternative selectors for one element, tried in order.
#[derive(Clone, Copy, Debug)]
pub struct Binding {
    pub selectors: &'static [&'static str],
    pub value: BindingValue,
}

impl Binding {
    pub const fn field(selectors: &'static [&'static str], field: ProfileField) -> Self {
        Self {
            selectors,
            value: BindingValue::Field(field),
        }
    }

    pub const fn literal(selectors: &'static [&'static str], text: &'static str) -> Self {
        Self {
            selectors,
            value: BindingValue::Literal(text),
        }
    }
}

/// An element a binding may write into: attached, enabled, rendered and
/// taking typed text.
pub fn is_bindable(el: &ElementSnapshot) -> bool {
    !el.disabled && !el.is_hidden() && el.is_text_entry()
}

/// Walks the alternatives of `binding` and returns the first bindable
/// element not already written in this pass.
///
/// A malformed or unsupported alternative is skipped; any other document
/// fault is returned.
pub async fn locate(
    document: &dyn DocumentPort,
    binding: &Binding,
    touched: &HashSet<ElementHandle>,
) -> Result<Option<ElementSnapshot>, DomError> {
    for selector in binding.selectors {
        match document.query_all(selector).await {
            Ok(candidates) => {
                if let Some(found) = candidates
                    .into_iter()
                    .find(|el| is_bindable(el) && !touched.contains(&el.handle))
                {
                    debug!(target: "portal-adapters", selector, handle = %found.handle, "binding resolved");
                    return Ok(Some(found));
                }
            }
            Err(err) if err.is_selector_failure() => {
                warn!(target: "portal-adapters", selector, "selector skipped: {}", err);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(None)
}
