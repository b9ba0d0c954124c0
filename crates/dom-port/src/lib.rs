//! Host document contract for the form-fill kernel.
//!
//! The kernel never owns the page. Everything it learns about the document
//! comes through [`DocumentPort`] as detached [`ElementSnapshot`]s, and every
//! suspension between a mutation and the next read goes through
//! [`TempoPort`] so tests can run on virtual time.

pub mod errors;
pub mod memory;
pub mod model;
pub mod ports;
pub mod selector;
pub mod tempo;

pub use errors::{DomError, SelectorError};
pub use memory::{DomRecord, MemoryDocument, MemoryDom, NodeSpec};
pub use model::{ChoiceOption, DomEvent, ElementHandle, ElementSnapshot, FILL_EVENT_SEQUENCE};
pub use ports::{DocumentPort, Notice, NoticeKind, NoticePort};
pub use selector::Selector;
pub use tempo::{TempoPort, TokioTempo, VirtualTempo};
