//! Wire shapes exchanged with the background worker and the popup.

use serde::{Deserialize, Serialize};

use autoapply_core_types::Portal;

/// Events sent from the page to the background worker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BridgeMessage {
    ApplicationSubmitted {
        job_title: String,
        company: String,
        portal: Portal,
    },
    UpdateBadge {
        count: u32,
    },
    TrackApplication {
        portal: Portal,
    },
}

/// Commands received from the popup.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    /// Fill only; auto-submit still follows the stored settings.
    FillForm,
    /// Fill, then submit regardless of settings.
    FullApply,
}

/// Replies to [`Command`]s.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandResponse {
    Filled { success: bool, filled: usize },
    Applied { success: bool },
}

impl CommandResponse {
    pub fn success(&self) -> bool {
        match self {
            CommandResponse::Filled { success, .. } | CommandResponse::Applied { success } => {
                *success
            }
        }
    }
}
