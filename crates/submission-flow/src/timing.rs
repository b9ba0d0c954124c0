use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed delays between a click and the next read of the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowTiming {
    pub initial_ms: u64,
    pub advance_settle_ms: u64,
    pub step_settle_ms: u64,
    pub opener_settle_ms: u64,
    pub retry_ms: u64,
    pub submit_settle_ms: u64,
}

impl Default for FlowTiming {
    fn default() -> Self {
        Self {
            initial_ms: 1500,
            advance_settle_ms: 800,
            step_settle_ms: 1800,
            opener_settle_ms: 1200,
            retry_ms: 1000,
            submit_settle_ms: 600,
        }
    }
}

impl FlowTiming {
    pub fn initial(&self) -> Duration {
        Duration::from_millis(self.initial_ms)
    }

    pub fn advance_settle(&self) -> Duration {
        Duration::from_millis(self.advance_settle_ms)
    }

    pub fn step_settle(&self) -> Duration {
        Duration::from_millis(self.step_settle_ms)
    }

    pub fn opener_settle(&self) -> Duration {
        Duration::from_millis(self.opener_settle_ms)
    }

    pub fn retry(&self) -> Duration {
        Duration::from_millis(self.retry_ms)
    }

    pub fn submit_settle(&self) -> Duration {
        Duration::from_millis(self.submit_settle_ms)
    }
}
