//! AutoApply runtime
//!
//! Wires the fill kernel crates into one page-embedded runtime: popup
//! commands, the apply-dialog observer, settings and profile storage,
//! configuration and logging.

pub mod config;
pub mod logging;
pub mod notices;
pub mod runtime;
pub mod store;

pub use crate::config::{load_config, LoadedConfig, RuntimeConfig};
pub use logging::init_logging;
pub use notices::TtlNotices;
pub use runtime::{ContentRuntime, FlowHandle, ModalPass, RuntimePorts};
pub use store::{MemoryProfileStore, ProfileStore, StoreError, StoredState};

pub use autoapply_core_types::{ApplyError, ErrorKind, Portal, Profile, Settings};
pub use autoapply_event_bus::{BridgeMessage, Command, CommandResponse};
