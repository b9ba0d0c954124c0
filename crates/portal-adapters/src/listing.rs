use serde::{Deserialize, Serialize};
use tracing::debug;

use dom_port::DocumentPort;

use crate::spec::ListingSpec;

/// Job title and company as shown on the listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingInfo {
    pub job_title: String,
    pub company: String,
}

/// Best-effort scrape; any miss or fault falls back to the listing defaults.
pub async fn scrape_listing(document: &dyn DocumentPort, spec: &ListingSpec) -> ListingInfo {
    ListingInfo {
        job_title: first_text(document, spec.title)
            .await
            .unwrap_or_else(|| spec.default_title.to_string()),
        company: first_text(document, spec.company)
            .await
            .unwrap_or_else(|| spec.default_company.to_string()),
    }
}

async fn first_text(document: &dyn DocumentPort, selectors: &[&str]) -> Option<String> {
    for selector in selectors {
        match document.query_first(selector).await {
            Ok(Some(el)) if !el.text.trim().is_empty() => {
                return Some(el.text.trim().to_string())
            }
            Ok(_) => {}
            Err(err) => {
                debug!(target: "portal-adapters", selector, "listing lookup failed: {}", err)
            }
        }
    }
    None
}
