use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillPolicyView {
    pub highlight_ttl_ms: u64,
    pub max_text_len: usize,
    /// Explicit portal bindings are trusted but still never touch
    /// read-only controls unless this is set.
    pub allow_read_only: bool,
}

impl FillPolicyView {
    pub fn highlight_ttl(&self) -> Duration {
        Duration::from_millis(self.highlight_ttl_ms)
    }
}

impl Default for FillPolicyView {
    fn default() -> Self {
        Self {
            highlight_ttl_ms: 3000,
            max_text_len: 4000,
            allow_read_only: false,
        }
    }
}
