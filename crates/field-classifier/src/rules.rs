//! Ordered field-intent rules.
//!
//! Rules run top to bottom over a normalized [`Signal`] and the first match
//! wins, so order is precedence: specific name parts before the generic
//! name, specific salary kinds before the generic salary.

use autoapply_core_types::ProfileField;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::signal::Signal;

pub struct FieldRule {
    pub id: &'static str,
    pub field: ProfileField,
    include: Regex,
    exclude: Option<Regex>,
}

impl FieldRule {
    fn new(id: &'static str, field: ProfileField, include: &str, exclude: Option<&str>) -> Self {
        Self {
            id,
            field,
            include: compile(include),
            exclude: exclude.map(compile),
        }
    }

    pub fn matches(&self, signal: &Signal) -> bool {
        self.include.is_match(signal.as_str())
            && !self
                .exclude
                .as_ref()
                .map_or(false, |ex| ex.is_match(signal.as_str()))
    }
}

impl std::fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule")
            .field("id", &self.id)
            .field("field", &self.field)
            .field("include", &self.include.as_str())
            .finish()
    }
}

fn compile(pattern: &str) -> Regex {
    // Patterns are literals below and covered by tests.
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid field rule `{pattern}`: {err}"))
}

const SALARY: &str = r"(salary|ctc|compensation|pay)";

static FIELD_RULES: Lazy<Vec<FieldRule>> = Lazy::new(|| {
    vec![
        FieldRule::new(
            "first_name",
            ProfileField::FirstName,
            r"\bfirst ?name\b|\bfname\b|\bgiven name\b",
            None,
        ),
        FieldRule::new(
            "last_name",
            ProfileField::LastName,
            r"\blast ?name\b|\blname\b|\bsurname\b|\bfamily name\b",
            None,
        ),
        FieldRule::new(
            "full_name",
            ProfileField::FullName,
            r"\bname\b",
            Some(r"\b(company|org\w*|school|college|university|user|middle)\b"),
        ),
        FieldRule::new("email", ProfileField::Email, r"\be ?mail\b", None),
        FieldRule::new(
            "phone",
            ProfileField::Phone,
            r"phone|mobile|contact|\btel\b|\bcell\b",
            None,
        ),
        FieldRule::new("location", ProfileField::Location, r"\b(location|city)\b", None),
        FieldRule::new(
            "experience",
            ProfileField::Experience,
            r"\bexperience\b|\bexp\b|\byoe\b",
            None,
        ),
        FieldRule::new(
            "current_salary",
            ProfileField::CurrentSalary,
            &format!(r"\bcurrent\b.*\b{SALARY}\b|\b{SALARY}\b.*\bcurrent\b"),
            None,
        ),
        FieldRule::new(
            "expected_salary",
            ProfileField::ExpectedSalary,
            &format!(
                r"\bexpected\b.*\b{SALARY}\b|\b{SALARY}\b.*\bexpect(ed|ation|ations)?\b|\bdesired\b"
            ),
            None,
        ),
        FieldRule::new(
            "salary",
            ProfileField::ExpectedSalary,
            &format!(r"\b{SALARY}\b"),
            None,
        ),
        FieldRule::new(
            "notice_period",
            ProfileField::NoticePeriod,
            r"\bnotice ?period\b",
            None,
        ),
    ]
});

/// The rule table in evaluation order.
pub fn rule_table() -> &'static [FieldRule] {
    FIELD_RULES.as_slice()
}

/// First rule matching `signal`.
pub fn first_match(signal: &Signal) -> Option<&'static FieldRule> {
    if signal.is_empty() {
        return None;
    }
    rule_table().iter().find(|rule| rule.matches(signal))
}
