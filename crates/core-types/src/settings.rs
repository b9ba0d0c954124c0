use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Portal;

/// User settings read at the start of every fill pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Submits automatically after a fill unless explicitly disabled.
    pub auto_submit: bool,
    /// Allows observer-triggered passes when an apply dialog appears.
    pub auto_fill: bool,
    /// Per-portal switches keyed by [`Portal::key`]; missing keys are enabled.
    pub portals: BTreeMap<String, bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_submit: true,
            auto_fill: true,
            portals: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn portal_enabled(&self, portal: Portal) -> bool {
        self.portals.get(portal.key()).copied().unwrap_or(true)
    }
}
