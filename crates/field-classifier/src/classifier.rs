use autoapply_core_types::{Profile, ProfileField};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::rules::{self, FieldRule};
use crate::signal::Signal;

/// Fallback values used when the profile omits an attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierDefaults {
    /// Written into notice-period fields when the profile has none. `None`
    /// leaves those fields empty.
    pub notice_period: Option<String>,
}

impl Default for ClassifierDefaults {
    fn default() -> Self {
        Self {
            notice_period: Some("30".to_string()),
        }
    }
}

impl ClassifierDefaults {
    pub fn disabled() -> Self {
        Self {
            notice_period: None,
        }
    }
}

/// A rule hit resolved to a concrete non-empty value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub rule: &'static str,
    pub field: ProfileField,
    pub value: String,
}

#[derive(Clone, Debug, Default)]
pub struct FieldClassifier {
    defaults: ClassifierDefaults,
}

impl FieldClassifier {
    pub fn new(defaults: ClassifierDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ClassifierDefaults {
        &self.defaults
    }

    pub fn classify(&self, signal: &Signal) -> Option<&'static FieldRule> {
        rules::first_match(signal)
    }

    /// Classifies `signal` and resolves the winning rule against `profile`.
    ///
    /// A rule whose value is absent yields `None`; later rules are not
    /// consulted.
    pub fn resolve(&self, signal: &Signal, profile: &Profile) -> Option<Classification> {
        let rule = self.classify(signal)?;
        let value = self.value_for(rule.field, profile);
        trace!(
            target: "field-classifier",
            signal = %signal,
            rule = rule.id,
            resolved = value.is_some(),
            "rule matched"
        );
        value.map(|value| Classification {
            rule: rule.id,
            field: rule.field,
            value,
        })
    }

    /// Profile value for `field` with configured defaults applied.
    pub fn value_for(&self, field: ProfileField, profile: &Profile) -> Option<String> {
        profile.value_of(field).or_else(|| match field {
            ProfileField::NoticePeriod => self
                .defaults
                .notice_period
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asha() -> Profile {
        Profile {
            name: Some("Asha Rao".into()),
            email: Some("a@x.com".into()),
            phone: Some("9999999999".into()),
            experience: Some("3".into()),
            ..Profile::default()
        }
    }

    fn resolve(raw: &str, profile: &Profile) -> Option<String> {
        FieldClassifier::default()
            .resolve(&Signal::normalize(raw), profile)
            .map(|c| c.value)
    }

    #[test]
    fn generic_page_scenario_signals() {
        let profile = asha();
        assert_eq!(resolve("first_name", &profile).as_deref(), Some("Asha"));
        assert_eq!(resolve("last_name", &profile).as_deref(), Some("Rao"));
        assert_eq!(resolve("email", &profile).as_deref(), Some("a@x.com"));
        assert_eq!(resolve("phone", &profile).as_deref(), Some("9999999999"));
        assert_eq!(resolve("years_of_experience", &profile).as_deref(), Some("3"));
    }

    #[test]
    fn first_name_signals_never_yield_full_name() {
        let profile = Profile {
            name: Some("Asha Devi Rao".into()),
            ..Profile::default()
        };
        for raw in ["first_name", "firstName", "First Name", "given-name", "fname"] {
            assert_eq!(resolve(raw, &profile).as_deref(), Some("Asha"), "signal `{raw}`");
        }
        assert_eq!(resolve("last_name", &profile).as_deref(), Some("Devi Rao"));
        assert_eq!(resolve("full name", &profile).as_deref(), Some("Asha Devi Rao"));
    }

    #[test]
    fn empty_value_does_not_fall_through() {
        // "lastName" matches the last-name rule; a single-token name has no
        // last name and the generic name rule must not take over.
        let profile = Profile {
            name: Some("Asha".into()),
            ..Profile::default()
        };
        assert_eq!(resolve("lastName", &profile), None);

        let blank = Profile {
            email: Some("   ".into()),
            ..Profile::default()
        };
        assert_eq!(resolve("email", &blank), None);
    }

    #[test]
    fn salary_kinds_resolve_to_their_own_values() {
        let profile = Profile {
            current_salary: Some("1200000".into()),
            expected_salary: Some("1500000".into()),
            ..Profile::default()
        };
        assert_eq!(resolve("current_ctc", &profile).as_deref(), Some("1200000"));
        assert_eq!(resolve("expected_ctc", &profile).as_deref(), Some("1500000"));
        assert_eq!(resolve("desired salary", &profile).as_deref(), Some("1500000"));
        assert_eq!(resolve("salary", &profile).as_deref(), Some("1500000"));
    }

    #[test]
    fn notice_period_default_is_configurable() {
        let profile = Profile::default();
        assert_eq!(resolve("notice_period", &profile).as_deref(), Some("30"));

        let custom = FieldClassifier::new(ClassifierDefaults {
            notice_period: Some("60".into()),
        });
        let hit = custom
            .resolve(&Signal::normalize("noticePeriod"), &profile)
            .unwrap();
        assert_eq!(hit.value, "60");
        assert_eq!(hit.rule, "notice_period");

        let off = FieldClassifier::new(ClassifierDefaults::disabled());
        assert!(off
            .resolve(&Signal::normalize("notice period"), &profile)
            .is_none());

        let stated = Profile {
            notice_period: Some("15".into()),
            ..Profile::default()
        };
        assert_eq!(resolve("notice period", &stated).as_deref(), Some("15"));
    }

    #[test]
    fn defaults_deserialize_with_missing_fields() {
        let defaults: ClassifierDefaults = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, ClassifierDefaults::default());
        let off: ClassifierDefaults =
            serde_json::from_str(r#"{"notice_period": null}"#).unwrap();
        assert_eq!(off.notice_period, None);
    }
}
