//! Sweeps run after the explicit bindings.
//!
//! None of them ever writes into an element that already carries a value,
//! is disabled or read-only, or is hidden.

use std::collections::HashSet;

use tracing::debug;

use autoapply_core_types::{Profile, ProfileField};
use dom_port::{ChoiceOption, DocumentPort, DomError, ElementHandle, ElementSnapshot};
use field_classifier::{FieldClassifier, Signal, SignalScope};
use form_fill::{FillError, FillExecutor};

use crate::errors::AdapterError;

pub const COVER_LETTER_CUES: [&str; 4] = ["summary", "cover", "message", "additional"];
pub const CONSENT_CUES: [&str; 4] = ["authorized", "eligible", "agree", "legally"];
pub const EXPERIENCE_CUES: [&str; 2] = ["experience", "years"];

const AFFIRMATIVE: [&str; 3] = ["yes", "true", "1"];

/// Free-text snippet for cover-letter style areas.
pub fn cover_snippet(profile: &Profile) -> String {
    let experience = profile
        .value_of(ProfileField::Experience)
        .unwrap_or_else(|| "3".to_string());
    let title = profile
        .value_of(ProfileField::JobTitle)
        .unwrap_or_else(|| "developer".to_string());
    let skills = profile.top_skills(3);
    let skills = if skills.is_empty() {
        "software development".to_string()
    } else {
        skills.join(", ")
    };
    format!(
        "I am a {experience}-year experienced {title} with expertise in {skills}. \
         I am excited about this opportunity and believe my background is a strong match. \
         Please find my details attached."
    )
}

pub fn affirmative_option(options: &[ChoiceOption]) -> Option<&ChoiceOption> {
    options.iter().find(|opt| {
        AFFIRMATIVE.iter().any(|yes| {
            opt.value.trim().eq_ignore_ascii_case(yes) || opt.text.trim().eq_ignore_ascii_case(yes)
        })
    })
}

/// First option whose visible text carries `years` as a whole number.
pub fn experience_option(options: &[ChoiceOption], years: u32) -> Option<&ChoiceOption> {
    options.iter().find(|opt| {
        opt.text
            .split(|c: char| !c.is_ascii_digit())
            .filter(|token| !token.is_empty())
            .any(|token| token.parse::<u32>() == Ok(years))
    })
}

/// Shared state of one pass: the executor, every handle written so far and
/// the running count.
pub struct SweepCtx<'a> {
    pub document: &'a dyn DocumentPort,
    pub executor: &'a dyn FillExecutor,
    pub touched: &'a mut HashSet<ElementHandle>,
    pub filled: usize,
}

impl SweepCtx<'_> {
    fn skip(&self, el: &ElementSnapshot) -> bool {
        self.touched.contains(&el.handle) || el.is_hidden() || !el.is_blank_and_writable()
    }

    fn record(&mut self, handle: &ElementHandle) {
        self.touched.insert(handle.clone());
        self.filled += 1;
    }

    /// Counts a successful write; element-local refusals are skipped.
    pub(crate) fn settle(
        &mut self,
        handle: &ElementHandle,
        outcome: Result<(), FillError>,
    ) -> Result<(), FillError> {
        match outcome {
            Ok(()) => {
                self.record(handle);
                Ok(())
            }
            Err(err) if err.is_element_local() => {
                debug!(target: "portal-adapters", %handle, "element skipped: {}", err);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

pub async fn cover_letter_sweep(
    ctx: &mut SweepCtx<'_>,
    profile: &Profile,
) -> Result<(), AdapterError> {
    let areas = ctx.document.query_all("textarea").await?;
    let snippet = cover_snippet(profile);
    for area in areas {
        if ctx.skip(&area) {
            continue;
        }
        if !Signal::from_element(&area, SignalScope::Label).contains_any(&COVER_LETTER_CUES) {
            continue;
        }
        let outcome = ctx
            .executor
            .fill_text(&area.handle, &snippet)
            .await
            .map(|_| ());
        ctx.settle(&area.handle, outcome)?;
    }
    Ok(())
}

pub async fn screener_sweep(
    ctx: &mut SweepCtx<'_>,
    profile: &Profile,
) -> Result<(), AdapterError> {
    let groups = ctx.document.query_all("select, fieldset").await?;
    let years = profile.experience_years();
    for group in groups {
        if ctx.touched.contains(&group.handle)
            || group.disabled
            || group.read_only
            || group.is_hidden()
            || answered(ctx.document, &group).await?
        {
            continue;
        }
        let label = Signal::from_element(&group, SignalScope::Label);
        let choice = if label.contains_any(&CONSENT_CUES) {
            affirmative_option(&group.options)
        } else if label.contains_any(&EXPERIENCE_CUES) {
            years.and_then(|years| experience_option(&group.options, years))
        } else {
            None
        };
        let Some(choice) = choice else { continue };
        let outcome = ctx
            .executor
            .fill_choice(&group.handle, choice)
            .await
            .map(|_| ());
        ctx.settle(&group.handle, outcome)?;
    }
    Ok(())
}

/// Whether the user (or the page) already picked something. A select still
/// on its first option counts as unanswered.
async fn answered(document: &dyn DocumentPort, group: &ElementSnapshot) -> Result<bool, DomError> {
    if group.is_select() {
        let first = group.options.first().map(|o| o.value.as_str()).unwrap_or("");
        return Ok(group.has_value() && group.value != first);
    }
    for option in &group.options {
        if let Some(handle) = &option.handle {
            if document.snapshot(handle).await?.checked {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Fallback for unknown markup: every blank text entry classified by its
/// own attributes.
pub async fn generic_sweep(
    ctx: &mut SweepCtx<'_>,
    classifier: &FieldClassifier,
    profile: &Profile,
) -> Result<(), AdapterError> {
    let inputs = ctx.document.query_all("input, textarea").await?;
    for el in inputs {
        if !el.is_text_entry() || ctx.skip(&el) {
            continue;
        }
        // Attributes only: surrounding text on free-form pages names
        // neighbouring fields as often as this one.
        let signal = Signal::from_element(&el, SignalScope::Attributes);
        let Some(hit) = classifier.resolve(&signal, profile) else {
            continue;
        };
        let outcome = ctx
            .executor
            .fill_text(&el.handle, &hit.value)
            .await
            .map(|_| ());
        ctx.settle(&el.handle, outcome)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(value: &str, text: &str) -> ChoiceOption {
        ChoiceOption {
            value: value.into(),
            text: text.into(),
            handle: None,
        }
    }

    #[test]
    fn cover_snippet_uses_profile_or_defaults() {
        let empty = cover_snippet(&Profile::default());
        assert!(empty.starts_with(
            "I am a 3-year experienced developer with expertise in software development."
        ));
        let profile = Profile {
            experience: Some("5".into()),
            job_title: Some("backend engineer".into()),
            skills: vec!["Rust".into(), "Go".into(), "SQL".into(), "Kafka".into()],
            ..Profile::default()
        };
        let snippet = cover_snippet(&profile);
        assert!(snippet.starts_with(
            "I am a 5-year experienced backend engineer with expertise in Rust, Go, SQL."
        ));
        assert!(snippet.ends_with("Please find my details attached."));
    }

    #[test]
    fn affirmative_matches_value_or_text() {
        let options = [opt("", "Select"), opt("N", "No"), opt("Y", "Yes")];
        assert_eq!(affirmative_option(&options).map(|o| o.value.as_str()), Some("Y"));
        let numeric = [opt("0", "Nope"), opt("1", "Sure")];
        assert_eq!(affirmative_option(&numeric).map(|o| o.value.as_str()), Some("1"));
        assert!(affirmative_option(&[opt("no", "No")]).is_none());
    }

    #[test]
    fn experience_option_needs_whole_number() {
        let options = [
            opt("a", "Select"),
            opt("b", "13 years"),
            opt("c", "3 years"),
            opt("d", "3-5 years"),
        ];
        assert_eq!(experience_option(&options, 3).map(|o| o.value.as_str()), Some("c"));
        assert_eq!(experience_option(&options, 5).map(|o| o.value.as_str()), Some("d"));
        assert!(experience_option(&options, 7).is_none());
    }
}
