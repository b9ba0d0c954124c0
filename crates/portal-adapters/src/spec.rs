use std::time::Duration;

use autoapply_core_types::{Portal, ProfileField};

use crate::binding::Binding;

/// Which sweeps run after the explicit bindings.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SweepSwitches {
    pub cover_letter: bool,
    pub screeners: bool,
}

/// Labels the submission machine looks for, in priority order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FlowProfile {
    pub submit: &'static [&'static str],
    pub advance: &'static [&'static str],
    pub opener: &'static [&'static str],
    /// Searching iterations before the machine stalls.
    pub search_budget: u32,
    pub stall_hint: &'static str,
}

impl FlowProfile {
    pub fn is_multi_step(&self) -> bool {
        !self.advance.is_empty()
    }
}

/// Where the job title and company are shown, and what to report when
/// they are not.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ListingSpec {
    pub title: &'static [&'static str],
    pub company: &'static [&'static str],
    pub default_title: &'static str,
    pub default_company: &'static str,
}

/// Dynamically inserted apply dialogs watched by the change observer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ModalSpec {
    pub selectors: &'static [&'static str],
    pub fill_delay_ms: u64,
}

impl ModalSpec {
    pub fn fill_delay(&self) -> Duration {
        Duration::from_millis(self.fill_delay_ms)
    }
}

#[derive(Clone, Debug)]
pub struct PortalSpec {
    pub portal: Portal,
    pub bindings: Vec<Binding>,
    pub sweeps: SweepSwitches,
    pub flow: FlowProfile,
    pub listing: ListingSpec,
    pub modal: Option<ModalSpec>,
}

const SINGLE_SHOT_HINT: &str = "Click Apply button to submit";

impl PortalSpec {
    pub fn for_portal(portal: Portal) -> Self {
        match portal {
            Portal::LinkedIn => linkedin(),
            Portal::Naukri => naukri(),
            Portal::Foundit => foundit(),
            Portal::Indeed => indeed(),
            Portal::Internshala => internshala(),
            Portal::Generic => generic(),
        }
    }

    /// Confirmation shown once per fill pass.
    pub fn fill_notice(&self, filled: usize) -> String {
        match self.portal {
            Portal::Generic => format!("Filled {filled} fields!"),
            portal => format!("Filled {filled} fields on {}!", portal.display_name()),
        }
    }
}

fn single_shot(submit: &'static [&'static str]) -> FlowProfile {
    FlowProfile {
        submit,
        advance: &[],
        opener: &[],
        search_budget: 1,
        stall_hint: SINGLE_SHOT_HINT,
    }
}

fn linkedin() -> PortalSpec {
    use ProfileField::*;
    PortalSpec {
        portal: Portal::LinkedIn,
        bindings: vec![
            Binding::field(
                &[
                    r#"input[id*="firstName"]"#,
                    r#"input[aria-label*="First name" i]"#,
                    r#"input[placeholder*="First name" i]"#,
                ],
                FirstName,
            ),
            Binding::field(
                &[
                    r#"input[id*="lastName"]"#,
                    r#"input[aria-label*="Last name" i]"#,
                    r#"input[placeholder*="Last name" i]"#,
                ],
                LastName,
            ),
            Binding::field(
                &[
                    r#"input[id*="phoneNumber"]"#,
                    r#"input[name*="phone"]"#,
                    r#"input[type="tel"]"#,
                    r#"input[aria-label*="Phone" i]"#,
                ],
                Phone,
            ),
            Binding::field(
                &[
                    r#"input[id*="city"]"#,
                    r#"input[name*="city"]"#,
                    r#"input[aria-label*="City" i]"#,
                    r#"input[placeholder*="City" i]"#,
                ],
                Location,
            ),
        ],
        sweeps: SweepSwitches {
            cover_letter: true,
            screeners: true,
        },
        flow: FlowProfile {
            submit: &["Submit application", "Submit"],
            advance: &["Next", "Continue", "Review your application", "Review"],
            opener: &["Easy Apply", "Apply"],
            search_budget: 8,
            stall_hint: "Could not find the next step, please continue manually",
        },
        listing: ListingSpec {
            title: &[
                ".job-details-jobs-unified-top-card__job-title",
                ".jobs-unified-top-card__job-title",
            ],
            company: &[
                ".job-details-jobs-unified-top-card__company-name",
                ".jobs-unified-top-card__company-name",
            ],
            default_title: "LinkedIn Job",
            default_company: "Company",
        },
        modal: Some(ModalSpec {
            selectors: &[".jobs-easy-apply-modal", "[data-test-modal]"],
            fill_delay_ms: 800,
        }),
    }
}

fn naukri() -> PortalSpec {
    use ProfileField::*;
    PortalSpec {
        portal: Portal::Naukri,
        bindings: vec![
            Binding::field(
                &["#name", r#"[name="name"]"#, r#"[placeholder*="name" i]"#],
                FullName,
            ),
            Binding::field(
                &["#email", r#"[name="email"]"#, r#"[placeholder*="email" i]"#],
                Email,
            ),
            Binding::field(
                &[
                    "#mobile",
                    r#"[name="mobile"]"#,
                    r#"[placeholder*="mobile" i]"#,
                    r#"[placeholder*="phone" i]"#,
                ],
                Phone,
            ),
            Binding::field(
                &[
                    r#"[name="experience"]"#,
                    r#"[placeholder*="experience" i]"#,
                    r#"[id*="experience"]"#,
                ],
                Experience,
            ),
            Binding::field(
                &[
                    r#"[name="currentSalary"]"#,
                    r#"[placeholder*="current salary" i]"#,
                ],
                CurrentSalary,
            ),
            Binding::field(
                &[
                    r#"[name="expectedSalary"]"#,
                    r#"[placeholder*="expected salary" i]"#,
                ],
                ExpectedSalary,
            ),
            Binding::field(
                &[r#"[name="noticePeriod"]"#, r#"[placeholder*="notice" i]"#],
                NoticePeriod,
            ),
            Binding::field(
                &[r#"[placeholder*="location" i]"#, r#"[placeholder*="city" i]"#],
                Location,
            ),
        ],
        sweeps: SweepSwitches::default(),
        flow: single_shot(&["Apply", "Apply Now", "Quick Apply", "Submit", "Send Application"]),
        listing: ListingSpec {
            title: &[".jd-header-title", "h1.title"],
            company: &[".jd-header-comp-name", ".comp-name"],
            default_title: "Naukri Job",
            default_company: "Company",
        },
        modal: Some(ModalSpec {
            selectors: &[
                ".apply-modal",
                ".naukri-apply-widget",
                r#"[class*="applyModal"]"#,
            ],
            fill_delay_ms: 700,
        }),
    }
}

fn foundit() -> PortalSpec {
    use ProfileField::*;
    PortalSpec {
        portal: Portal::Foundit,
        bindings: vec![
            Binding::field(
                &[
                    r#"input[name="name"]"#,
                    r#"[placeholder*="name" i]"#,
                    r#"[id*="name"]"#,
                ],
                FullName,
            ),
            Binding::field(
                &[r#"input[type="email"]"#, r#"[placeholder*="email" i]"#],
                Email,
            ),
            Binding::field(
                &[
                    r#"input[type="tel"]"#,
                    r#"[placeholder*="phone" i]"#,
                    r#"[placeholder*="mobile" i]"#,
                ],
                Phone,
            ),
            Binding::field(
                &[
                    r#"input[placeholder*="experience" i]"#,
                    r#"[name*="experience"]"#,
                ],
                Experience,
            ),
            Binding::field(
                &[
                    r#"input[placeholder*="location" i]"#,
                    r#"[placeholder*="city" i]"#,
                ],
                Location,
            ),
            Binding::field(
                &[r#"input[placeholder*="salary" i]"#, r#"[name*="salary"]"#],
                ExpectedSalary,
            ),
        ],
        sweeps: SweepSwitches::default(),
        flow: single_shot(&["Apply", "Apply Now", "Quick Apply", "Submit"]),
        listing: ListingSpec {
            title: &["h1", ".job-title"],
            company: &[".company-name", ".comp-name"],
            default_title: "Foundit Job",
            default_company: "Company",
        },
        modal: Some(ModalSpec {
            selectors: &[
                r#"[class*="applyModal"]"#,
                r#"[class*="quick-apply"]"#,
                r#"[class*="apply-modal"]"#,
            ],
            fill_delay_ms: 700,
        }),
    }
}

fn indeed() -> PortalSpec {
    use ProfileField::*;
    PortalSpec {
        portal: Portal::Indeed,
        bindings: vec![
            Binding::field(
                &[
                    r#"[name="applicant.name"]"#,
                    r#"[id*="applicantName"]"#,
                    r#"[aria-label*="name" i]"#,
                ],
                FullName,
            ),
            Binding::field(
                &[
                    r#"[name="applicant.email"]"#,
                    r#"[id*="email"]"#,
                    r#"[aria-label*="email" i]"#,
                ],
                Email,
            ),
            Binding::field(
                &[
                    r#"[name="applicant.phoneNumber"]"#,
                    r#"[id*="phone"]"#,
                    r#"[aria-label*="phone" i]"#,
                ],
                Phone,
            ),
        ],
        sweeps: SweepSwitches::default(),
        flow: single_shot(&["Submit your application", "Submit", "Apply Now"]),
        listing: ListingSpec {
            title: &[],
            company: &[],
            default_title: "Indeed Job",
            default_company: "Company",
        },
        modal: None,
    }
}

fn internshala() -> PortalSpec {
    use ProfileField::*;
    PortalSpec {
        portal: Portal::Internshala,
        bindings: vec![
            Binding::field(
                &[r#"input[name="name"]"#, r#"[placeholder*="name" i]"#],
                FullName,
            ),
            Binding::field(&[r#"input[name="email"]"#, r#"[type="email"]"#], Email),
            Binding::field(&[r#"input[name="mobile"]"#, r#"[type="tel"]"#], Phone),
        ],
        sweeps: SweepSwitches::default(),
        flow: single_shot(&["Submit", "Apply"]),
        listing: ListingSpec {
            title: &[],
            company: &[],
            default_title: "Internshala Job",
            default_company: "Company",
        },
        modal: None,
    }
}

fn generic() -> PortalSpec {
    PortalSpec {
        portal: Portal::Generic,
        bindings: Vec::new(),
        sweeps: SweepSwitches::default(),
        flow: single_shot(&[
            "Submit application",
            "Submit",
            "Apply Now",
            "Apply",
            "Send Application",
            "Quick Apply",
        ]),
        listing: ListingSpec {
            title: &["h1"],
            company: &[],
            default_title: "Job",
            default_company: "Company",
        },
        modal: None,
    }
}
