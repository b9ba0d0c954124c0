//! Submission flow
//!
//! Drives a portal's apply controls after a fill pass: look for a submit
//! control, otherwise advance the wizard (re-filling every new step), or
//! open the application, all within a bounded number of searches.

pub mod controls;
pub mod errors;
pub mod machine;
pub mod timing;

pub use controls::{find_control, ControlMatch, CONTROL_SELECTOR};
pub use errors::FlowError;
pub use machine::{FlowOutcome, FlowState, SubmissionMachine};
pub use portal_adapters::FlowProfile;
pub use timing::FlowTiming;
