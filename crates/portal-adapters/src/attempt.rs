use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use autoapply_core_types::{PassId, Portal};

/// Record of one fill pass. Lives only in memory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillAttempt {
    pub pass_id: PassId,
    pub portal: Portal,
    pub filled: usize,
    pub at: DateTime<Utc>,
}

impl FillAttempt {
    pub fn new(pass_id: PassId, portal: Portal, filled: usize) -> Self {
        Self {
            pass_id,
            portal,
            filled,
            at: Utc::now(),
        }
    }
}
