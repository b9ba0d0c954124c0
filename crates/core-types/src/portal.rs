use std::fmt;

use serde::{Deserialize, Serialize};

/// One job-listing site with its own document structure.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    LinkedIn,
    Naukri,
    Foundit,
    Indeed,
    Internshala,
    Generic,
}

impl Portal {
    pub const ALL: [Portal; 6] = [
        Portal::LinkedIn,
        Portal::Naukri,
        Portal::Foundit,
        Portal::Indeed,
        Portal::Internshala,
        Portal::Generic,
    ];

    /// Detects the portal from a page host name. Order matters: the first
    /// matching marker wins.
    pub fn from_host(host: &str) -> Portal {
        let host = host.to_ascii_lowercase();
        if host.contains("naukri.com") {
            Portal::Naukri
        } else if host.contains("linkedin.com") {
            Portal::LinkedIn
        } else if host.contains("foundit.in") {
            Portal::Foundit
        } else if host.contains("indeed") {
            Portal::Indeed
        } else if host.contains("internshala") {
            Portal::Internshala
        } else {
            Portal::Generic
        }
    }

    /// Storage/wire key.
    pub fn key(&self) -> &'static str {
        match self {
            Portal::LinkedIn => "linkedin",
            Portal::Naukri => "naukri",
            Portal::Foundit => "foundit",
            Portal::Indeed => "indeed",
            Portal::Internshala => "internshala",
            Portal::Generic => "generic",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Portal::LinkedIn => "LinkedIn",
            Portal::Naukri => "Naukri",
            Portal::Foundit => "Foundit",
            Portal::Indeed => "Indeed",
            Portal::Internshala => "Internshala",
            Portal::Generic => "Generic",
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
