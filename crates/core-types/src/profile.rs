use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Profile attributes an element can be bound to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    FirstName,
    LastName,
    FullName,
    Email,
    Phone,
    Location,
    Experience,
    CurrentSalary,
    ExpectedSalary,
    NoticePeriod,
    JobTitle,
}

impl ProfileField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::FirstName => "first_name",
            ProfileField::LastName => "last_name",
            ProfileField::FullName => "full_name",
            ProfileField::Email => "email",
            ProfileField::Phone => "phone",
            ProfileField::Location => "location",
            ProfileField::Experience => "experience",
            ProfileField::CurrentSalary => "current_salary",
            ProfileField::ExpectedSalary => "expected_salary",
            ProfileField::NoticePeriod => "notice_period",
            ProfileField::JobTitle => "job_title",
        }
    }
}

/// Structured user profile as stored by the extension.
///
/// Scalar attributes accept either JSON strings or numbers because the
/// popup stores experience and salaries inconsistently.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub experience: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub current_salary: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub expected_salary: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub notice_period: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub job_title: Option<String>,
    pub skills: Vec<String>,
}

impl Profile {
    /// Value for `field`, or `None` when absent or blank. Never returns an
    /// empty string.
    pub fn value_of(&self, field: ProfileField) -> Option<String> {
        let raw = match field {
            ProfileField::FirstName => return self.first_name(),
            ProfileField::LastName => return self.last_name(),
            ProfileField::FullName => self.name.as_deref(),
            ProfileField::Email => self.email.as_deref(),
            ProfileField::Phone => self.phone.as_deref(),
            ProfileField::Location => self.location.as_deref(),
            ProfileField::Experience => self.experience.as_deref(),
            ProfileField::CurrentSalary => self.current_salary.as_deref(),
            ProfileField::ExpectedSalary => self.expected_salary.as_deref(),
            ProfileField::NoticePeriod => self.notice_period.as_deref(),
            ProfileField::JobTitle => self.job_title.as_deref(),
        };
        non_blank(raw)
    }

    /// First whitespace-separated token of the name.
    pub fn first_name(&self) -> Option<String> {
        self.name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
            .map(str::to_string)
    }

    /// Every token after the first, joined by single spaces.
    pub fn last_name(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        let rest: Vec<&str> = name.split_whitespace().skip(1).collect();
        if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        }
    }

    /// Leading integer of the experience attribute ("3", "3 years", "3.5").
    pub fn experience_years(&self) -> Option<u32> {
        let raw = self.experience.as_deref()?.trim();
        let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    pub fn top_skills(&self, count: usize) -> Vec<&str> {
        self.skills
            .iter()
            .map(|skill| skill.trim())
            .filter(|skill| !skill.is_empty())
            .take(count)
            .collect()
    }
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> Profile {
        Profile {
            name: Some(name.to_string()),
            ..Profile::default()
        }
    }

    #[test]
    fn splits_first_and_last_name() {
        let p = profile("Asha  Rao Kumar");
        assert_eq!(p.value_of(ProfileField::FirstName).as_deref(), Some("Asha"));
        assert_eq!(
            p.value_of(ProfileField::LastName).as_deref(),
            Some("Rao Kumar")
        );
        assert_eq!(
            p.value_of(ProfileField::FullName).as_deref(),
            Some("Asha  Rao Kumar")
        );
    }

    #[test]
    fn single_token_name_has_no_last_name() {
        assert_eq!(profile("Asha").value_of(ProfileField::LastName), None);
    }

    #[test]
    fn blank_values_are_absent() {
        let p = Profile {
            email: Some("   ".into()),
            ..Profile::default()
        };
        assert_eq!(p.value_of(ProfileField::Email), None);
        assert_eq!(p.value_of(ProfileField::Phone), None);
    }

    #[test]
    fn deserializes_numbers_as_strings() {
        let p: Profile = serde_json::from_str(
            r#"{"name":"Asha Rao","phone":9999999999,"experience":3,"currentSalary":"12 LPA","skills":["Rust"]}"#,
        )
        .unwrap();
        assert_eq!(p.phone.as_deref(), Some("9999999999"));
        assert_eq!(p.experience.as_deref(), Some("3"));
        assert_eq!(p.current_salary.as_deref(), Some("12 LPA"));
        assert_eq!(p.experience_years(), Some(3));
    }

    #[test]
    fn experience_years_reads_leading_integer() {
        let mut p = Profile::default();
        p.experience = Some("5+ years".into());
        assert_eq!(p.experience_years(), Some(5));
        p.experience = Some("about five".into());
        assert_eq!(p.experience_years(), None);
    }

    #[test]
    fn top_skills_skips_blank_entries() {
        let p = Profile {
            skills: vec!["Rust".into(), " ".into(), "Go".into(), "SQL".into(), "K8s".into()],
            ..Profile::default()
        };
        assert_eq!(p.top_skills(3), vec!["Rust", "Go", "SQL"]);
    }
}
