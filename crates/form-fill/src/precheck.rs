use dom_port::{DocumentPort, ElementHandle, ElementSnapshot};

use crate::errors::FillError;
use crate::policy::FillPolicyView;

/// Re-reads the element right before writing; nothing observed earlier in
/// the pass is trusted.
pub async fn run_precheck(
    document: &dyn DocumentPort,
    handle: &ElementHandle,
    policy: &FillPolicyView,
) -> Result<ElementSnapshot, FillError> {
    let snapshot = document.snapshot(handle).await?;
    if snapshot.disabled {
        return Err(FillError::DisabledField);
    }
    if snapshot.read_only && !policy.allow_read_only {
        return Err(FillError::ReadOnly);
    }
    Ok(snapshot)
}
