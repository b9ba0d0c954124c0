//! In-memory document used by tests and offline replays.
//!
//! Nodes live in document order in a flat arena with parent links. Handles
//! are never reused, so removing and re-inserting a subtree yields new
//! identities exactly like a live page does.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::errors::DomError;
use crate::model::{ChoiceOption, DomEvent, ElementHandle, ElementSnapshot};
use crate::ports::{DocumentPort, Notice, NoticePort};
use crate::selector::Selector;

/// Declarative description of a node to insert.
#[derive(Clone, Debug, Default)]
pub struct NodeSpec {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub value: String,
    pub text: String,
    pub disabled: bool,
    pub read_only: bool,
    pub hidden: bool,
    /// Live checked state; a click on a radio sets it.
    pub checked: bool,
    /// `(value, text)` pairs of a select.
    pub options: Vec<(String, String)>,
}

impl NodeSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn input(input_type: &str) -> Self {
        Self::new("input").attr("type", input_type)
    }

    /// Text input carrying `name` (and the same `id`).
    pub fn text_input(name: &str) -> Self {
        Self::input("text").attr("name", name).attr("id", name)
    }

    pub fn textarea(name: &str) -> Self {
        Self::new("textarea").attr("name", name).attr("id", name)
    }

    pub fn select(name: &str) -> Self {
        Self::new("select").attr("name", name).attr("id", name)
    }

    pub fn button(text: &str) -> Self {
        Self::new("button").text(text)
    }

    pub fn label(for_id: &str, text: &str) -> Self {
        Self::new("label").attr("for", for_id).text(text)
    }

    pub fn radio(name: &str, value: &str) -> Self {
        Self::input("radio").attr("name", name).attr("value", value)
    }

    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn option(mut self, value: &str, text: &str) -> Self {
        self.options.push((value.to_string(), text.to_string()));
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }
}

#[derive(Clone, Debug)]
struct MemoryNode {
    handle: ElementHandle,
    parent: Option<ElementHandle>,
    spec: NodeSpec,
    highlighted: bool,
}

/// The mutable tree behind a [`MemoryDocument`].
#[derive(Debug, Default)]
pub struct MemoryDom {
    nodes: Vec<MemoryNode>,
    next_id: u64,
}

impl MemoryDom {
    pub fn insert(&mut self, spec: NodeSpec) -> ElementHandle {
        self.insert_node(None, spec)
    }

    pub fn insert_under(&mut self, parent: &ElementHandle, spec: NodeSpec) -> ElementHandle {
        self.insert_node(Some(parent.clone()), spec)
    }

    fn insert_node(&mut self, parent: Option<ElementHandle>, spec: NodeSpec) -> ElementHandle {
        self.next_id += 1;
        let handle = ElementHandle(format!("node-{}", self.next_id));
        self.nodes.push(MemoryNode {
            handle: handle.clone(),
            parent,
            spec,
            highlighted: false,
        });
        handle
    }

    /// Removes the node and its whole subtree.
    pub fn remove(&mut self, handle: &ElementHandle) {
        let mut doomed = vec![handle.clone()];
        let mut idx = 0;
        while idx < doomed.len() {
            let current = doomed[idx].clone();
            doomed.extend(
                self.nodes
                    .iter()
                    .filter(|n| n.parent.as_ref() == Some(&current))
                    .map(|n| n.handle.clone()),
            );
            idx += 1;
        }
        self.nodes.retain(|n| !doomed.contains(&n.handle));
    }

    /// Removes every node matching `selector` (and their subtrees).
    pub fn remove_matching(&mut self, selector: &str) {
        let Ok(selector) = Selector::parse(selector) else {
            return;
        };
        let doomed: Vec<ElementHandle> = self
            .nodes
            .iter()
            .map(|n| self.snapshot_of(n))
            .filter(|snap| selector.matches(snap))
            .map(|snap| snap.handle)
            .collect();
        for handle in doomed {
            self.remove(&handle);
        }
    }

    pub fn contains(&self, handle: &ElementHandle) -> bool {
        self.node(handle).is_some()
    }

    pub fn set_value(&mut self, handle: &ElementHandle, value: &str) -> bool {
        match self.node_mut(handle) {
            Some(node) => {
                node.spec.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_attr(&mut self, handle: &ElementHandle, key: &str, value: &str) -> bool {
        match self.node_mut(handle) {
            Some(node) => {
                node.spec
                    .attributes
                    .insert(key.to_ascii_lowercase(), value.to_string());
                true
            }
            None => false,
        }
    }

    /// Checks a radio and unchecks the rest of its `name` group.
    pub fn check_radio(&mut self, handle: &ElementHandle) -> bool {
        let Some(name) = self
            .node(handle)
            .map(|n| n.spec.attributes.get("name").cloned())
        else {
            return false;
        };
        for node in &mut self.nodes {
            if node.handle == *handle {
                node.spec.checked = true;
            } else if name.is_some()
                && node.spec.attributes.get("type").map(String::as_str) == Some("radio")
                && node.spec.attributes.get("name") == name.as_ref()
            {
                node.spec.checked = false;
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, handle: &ElementHandle) -> Option<&MemoryNode> {
        self.nodes.iter().find(|n| &n.handle == handle)
    }

    fn node_mut(&mut self, handle: &ElementHandle) -> Option<&mut MemoryNode> {
        self.nodes.iter_mut().find(|n| &n.handle == handle)
    }

    fn ancestors<'a>(&'a self, node: &'a MemoryNode) -> impl Iterator<Item = &'a MemoryNode> {
        let mut next = node.parent.clone();
        std::iter::from_fn(move || {
            let current = self.node(next.as_ref()?)?;
            next = current.parent.clone();
            Some(current)
        })
    }

    fn text_of_id(&self, id: &str) -> Option<String> {
        self.nodes
            .iter()
            .find(|n| n.spec.attributes.get("id").map(String::as_str) == Some(id))
            .map(|n| n.spec.text.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    fn label_for(&self, node: &MemoryNode) -> Option<String> {
        let id = node.spec.attributes.get("id");
        let explicit = id.and_then(|id| {
            self.nodes
                .iter()
                .find(|n| {
                    n.spec.tag == "label" && n.spec.attributes.get("for") == Some(id)
                })
                .map(|n| n.spec.text.trim().to_string())
                .filter(|t| !t.is_empty())
        });
        explicit.or_else(|| {
            node.spec
                .attributes
                .get("aria-labelledby")
                .and_then(|target| self.text_of_id(target))
        })
    }

    fn snapshot_of(&self, node: &MemoryNode) -> ElementSnapshot {
        let mut snap = ElementSnapshot::new(node.handle.clone(), node.spec.tag.clone());
        snap.attributes = node.spec.attributes.clone();
        snap.value = node.spec.value.clone();
        snap.text = node.spec.text.trim().to_string();
        snap.disabled = node.spec.disabled || self.ancestors(node).any(|a| a.spec.disabled);
        snap.read_only = node.spec.read_only;
        snap.checked = node.spec.checked;
        snap.visible = !node.spec.hidden && !self.ancestors(node).any(|a| a.spec.hidden);
        snap.label_text = self.label_for(node);
        snap.ancestor_text = self
            .ancestors(node)
            .map(|a| a.spec.text.trim())
            .find(|t| !t.is_empty())
            .map(str::to_string);
        snap.options = if node.spec.tag == "select" {
            node.spec
                .options
                .iter()
                .map(|(value, text)| ChoiceOption {
                    value: value.clone(),
                    text: text.clone(),
                    handle: None,
                })
                .collect()
        } else {
            self.nodes
                .iter()
                .filter(|n| {
                    n.spec.tag == "input"
                        && n.spec.attributes.get("type").map(String::as_str) == Some("radio")
                        && self.ancestors(n).any(|a| a.handle == node.handle)
                })
                .map(|radio| {
                    let value = radio.spec.attributes.get("value").cloned().unwrap_or_default();
                    let text = self
                        .label_for(radio)
                        .or_else(|| {
                            let own = radio.spec.text.trim();
                            (!own.is_empty()).then(|| own.to_string())
                        })
                        .unwrap_or_else(|| value.clone());
                    ChoiceOption {
                        value,
                        text,
                        handle: Some(radio.handle.clone()),
                    }
                })
                .collect()
        };
        snap
    }
}

/// Everything the kernel did to the document, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum DomRecord {
    Write { handle: ElementHandle, value: String },
    Event { handle: ElementHandle, event: DomEvent },
    Click { handle: ElementHandle, label: String },
    Highlight { handle: ElementHandle, ttl: Duration },
}

type ClickHook = Box<dyn FnMut(&mut MemoryDom) + Send>;

/// [`DocumentPort`] and [`NoticePort`] over a [`MemoryDom`].
#[derive(Default)]
pub struct MemoryDocument {
    dom: Mutex<MemoryDom>,
    records: Mutex<Vec<DomRecord>>,
    notices: Mutex<Vec<Notice>>,
    hooks: Mutex<HashMap<String, ClickHook>>,
    host_failure: Mutex<Option<String>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `edit` against the tree, e.g. to insert or remove nodes.
    pub fn edit<R>(&self, edit: impl FnOnce(&mut MemoryDom) -> R) -> R {
        edit(&mut *self.dom.lock())
    }

    pub fn insert(&self, spec: NodeSpec) -> ElementHandle {
        self.dom.lock().insert(spec)
    }

    pub fn insert_under(&self, parent: &ElementHandle, spec: NodeSpec) -> ElementHandle {
        self.dom.lock().insert_under(parent, spec)
    }

    pub fn remove(&self, handle: &ElementHandle) {
        self.dom.lock().remove(handle)
    }

    /// Installs `hook` to run whenever a control whose label (text, value
    /// or aria-label) equals `label` is clicked.
    pub fn on_click(&self, label: &str, hook: impl FnMut(&mut MemoryDom) + Send + 'static) {
        self.hooks
            .lock()
            .insert(label.trim().to_lowercase(), Box::new(hook));
    }

    /// Makes every subsequent query fail as if the host were broken.
    pub fn fail_queries(&self, reason: Option<&str>) {
        *self.host_failure.lock() = reason.map(str::to_string);
    }

    pub fn records(&self) -> Vec<DomRecord> {
        self.records.lock().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn writes(&self) -> Vec<(ElementHandle, String)> {
        self.records
            .lock()
            .iter()
            .filter_map(|r| match r {
                DomRecord::Write { handle, value } => Some((handle.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn events_for(&self, handle: &ElementHandle) -> Vec<DomEvent> {
        self.records
            .lock()
            .iter()
            .filter_map(|r| match r {
                DomRecord::Event { handle: h, event } if h == handle => Some(*event),
                _ => None,
            })
            .collect()
    }

    pub fn highlights(&self) -> Vec<ElementHandle> {
        self.records
            .lock()
            .iter()
            .filter_map(|r| match r {
                DomRecord::Highlight { handle, .. } => Some(handle.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clicked_labels(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter_map(|r| match r {
                DomRecord::Click { label, .. } => Some(label.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn value(&self, handle: &ElementHandle) -> Option<String> {
        let dom = self.dom.lock();
        dom.node(handle).map(|n| n.spec.value.clone())
    }

    /// Current value of the first element whose `name` attribute equals `name`.
    pub fn value_by_name(&self, name: &str) -> Option<String> {
        let dom = self.dom.lock();
        dom.nodes
            .iter()
            .find(|n| n.spec.attributes.get("name").map(String::as_str) == Some(name))
            .map(|n| n.spec.value.clone())
    }

    pub fn is_highlighted(&self, handle: &ElementHandle) -> bool {
        let dom = self.dom.lock();
        dom.node(handle).map(|n| n.highlighted).unwrap_or(false)
    }

    fn check_host(&self) -> Result<(), DomError> {
        match self.host_failure.lock().as_ref() {
            Some(reason) => Err(DomError::Host(reason.clone())),
            None => Ok(()),
        }
    }

    fn record(&self, record: DomRecord) {
        self.records.lock().push(record);
    }
}

fn control_label(snap: &ElementSnapshot) -> String {
    if !snap.text.is_empty() {
        return snap.text.clone();
    }
    snap.attr("value")
        .or_else(|| snap.aria_label())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl DocumentPort for MemoryDocument {
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>, DomError> {
        self.check_host()?;
        let selector = Selector::parse(selector)?;
        let dom = self.dom.lock();
        Ok(dom
            .nodes
            .iter()
            .map(|n| dom.snapshot_of(n))
            .filter(|snap| selector.matches(snap))
            .collect())
    }

    async fn snapshot(&self, handle: &ElementHandle) -> Result<ElementSnapshot, DomError> {
        self.check_host()?;
        let dom = self.dom.lock();
        dom.node(handle)
            .map(|n| dom.snapshot_of(n))
            .ok_or_else(|| DomError::Detached(handle.clone()))
    }

    async fn contains(&self, handle: &ElementHandle) -> bool {
        self.dom.lock().contains(handle)
    }

    async fn write_value(&self, handle: &ElementHandle, value: &str) -> Result<(), DomError> {
        if !self.dom.lock().set_value(handle, value) {
            return Err(DomError::Detached(handle.clone()));
        }
        self.record(DomRecord::Write {
            handle: handle.clone(),
            value: value.to_string(),
        });
        Ok(())
    }

    async fn dispatch(&self, handle: &ElementHandle, event: DomEvent) -> Result<(), DomError> {
        if !self.dom.lock().contains(handle) {
            return Err(DomError::Detached(handle.clone()));
        }
        self.record(DomRecord::Event {
            handle: handle.clone(),
            event,
        });
        Ok(())
    }

    async fn click(&self, handle: &ElementHandle) -> Result<(), DomError> {
        let label = {
            let mut dom = self.dom.lock();
            let snap = dom
                .node(handle)
                .map(|n| dom.snapshot_of(n))
                .ok_or_else(|| DomError::Detached(handle.clone()))?;
            if snap.input_type().as_deref() == Some("radio") {
                dom.check_radio(handle);
            }
            control_label(&snap)
        };
        debug!(target: "memory-document", %handle, %label, "click");
        self.record(DomRecord::Click {
            handle: handle.clone(),
            label: label.clone(),
        });
        let key = label.trim().to_lowercase();
        let mut hooks = self.hooks.lock();
        if let Some(hook) = hooks.get_mut(&key) {
            hook(&mut *self.dom.lock());
        }
        Ok(())
    }

    async fn highlight(&self, handle: &ElementHandle, ttl: Duration) -> Result<(), DomError> {
        match self.dom.lock().node_mut(handle) {
            Some(node) => node.highlighted = true,
            None => return Err(DomError::Detached(handle.clone())),
        }
        self.record(DomRecord::Highlight {
            handle: handle.clone(),
            ttl,
        });
        Ok(())
    }
}

#[async_trait]
impl NoticePort for MemoryDocument {
    async fn show(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
