use serde::{Deserialize, Serialize};

use dom_port::{DomEvent, ElementHandle};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FillKind {
    Text,
    Select,
    Radio,
}

/// What one successful fill did to the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillReport {
    pub handle: ElementHandle,
    pub kind: FillKind,
    pub value: String,
    pub events: Vec<DomEvent>,
    /// False when the host refused the outline; the fill still counts.
    pub highlighted: bool,
}
