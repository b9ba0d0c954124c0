//! Change observer for dynamically inserted apply dialogs.
//!
//! Every dialog node is processed at most once while it stays attached.
//! Marks are pruned as soon as their node leaves the document, so a dialog
//! that is closed and opened again counts as a fresh instance.

pub mod errors;
pub mod marks;
pub mod observer;

pub use errors::ObserverError;
pub use marks::ProcessedMarks;
pub use observer::{ModalInstance, ModalObserver, MutationTick};
