//! Portal adapters
//!
//! Every supported portal is a declarative [`PortalSpec`]:
//! - explicit bindings tried in order, first qualifying element wins
//! - optional cover-letter and screener sweeps
//! - a generic classifier sweep when the bindings fill nothing
//! - flow labels, listing selectors and modal selectors used by the
//!   submission machine and the change observer

pub mod adapter;
pub mod attempt;
pub mod binding;
pub mod errors;
pub mod listing;
pub mod spec;
pub mod sweeps;

pub use adapter::{adapter_for, DeclarativeAdapter, FillDeps, PortalAdapter};
pub use attempt::FillAttempt;
pub use binding::{Binding, BindingValue};
pub use errors::AdapterError;
pub use listing::{scrape_listing, ListingInfo};
pub use spec::{FlowProfile, ListingSpec, ModalSpec, PortalSpec, SweepSwitches};
