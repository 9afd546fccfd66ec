// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory document that implements the host traits.
//!
//! ## Dispatch
//!
//! Listeners live on the window and the document only. For an event targeted
//! at an element, [`HeadlessDom::dispatch`] runs:
//!
//! 1. capture listeners on the window, then on the document;
//! 2. if the event bubbles, non-capture listeners on the document, then on the window.
//!
//! Events targeted at the document run window capture listeners, then every
//! document listener (at-target), then window bubble listeners. Events targeted
//! at the window run every window listener.
//!
//! The listener list of each target is snapshotted before it runs. A listener
//! removed by an earlier one does not run; listeners added during dispatch wait
//! for the next event. `once` listeners are detached before they are invoked.
//! Elements that are not connected to the document reach no listener.
//!
//! ## Time
//!
//! The clock starts at the wall-clock time of construction and only moves when
//! [`HeadlessDom::advance`] is called, which also runs due timers in
//! (due time, scheduling order).

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use craftui_selector::{SelectorError, SelectorQuery};
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::host::{EventHost, NativeListener, StyleHost, TimerTask};
use crate::tree::ElementTree;
use crate::types::{
    ElementId, EventTargetRef, ListenerId, ListenerOptions, ListenerTarget, NativeEvent,
    StyleScope, TimerId,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Capture,
    AtTarget,
    Bubble,
}

impl Phase {
    fn accepts(self, options: ListenerOptions) -> bool {
        match self {
            Self::Capture => options.capture,
            Self::AtTarget => true,
            Self::Bubble => !options.capture,
        }
    }
}

struct ListenerEntry {
    id: ListenerId,
    target: ListenerTarget,
    event: String,
    options: ListenerOptions,
    listener: NativeListener,
}

#[derive(Default)]
struct Listeners {
    entries: Vec<ListenerEntry>,
    next_id: u64,
}

impl Listeners {
    fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}

#[derive(Default)]
struct Timers {
    queue: BTreeMap<(u64, u64), TimerTask>,
    due: HashMap<u64, u64>,
    next_id: u64,
}

/// Headless document, window, and timer queue.
///
/// ## Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use craftui_host::{
///     EventHost, EventTargetRef, HeadlessDom, ListenerOptions, ListenerTarget, NativeEvent,
///     SelectorQuery,
/// };
///
/// let dom = HeadlessDom::new();
/// let button = dom.create_element("button");
/// dom.append_child(dom.body(), button);
///
/// let buttons = SelectorQuery::parse("button:not(.disabled)").unwrap();
/// let hits = Rc::new(Cell::new(0));
/// let seen = hits.clone();
/// dom.add_listener(
///     ListenerTarget::Document,
///     "click",
///     Rc::new(move |host: &dyn EventHost, ev: &NativeEvent| {
///         let el = ev.target_element().unwrap();
///         if host.matches(el, &buttons) {
///             seen.set(seen.get() + 1);
///         }
///     }),
///     ListenerOptions::default(),
/// );
///
/// dom.dispatch(&NativeEvent::new("click", EventTargetRef::Element(button)));
/// assert_eq!(hits.get(), 1);
/// ```
pub struct HeadlessDom {
    tree: RefCell<ElementTree>,
    html: ElementId,
    body: ElementId,
    listeners: RefCell<Listeners>,
    timers: RefCell<Timers>,
    properties: RefCell<HashMap<(StyleScope, String), String>>,
    epoch_ms: u64,
    elapsed_ms: Cell<u64>,
}

impl core::fmt::Debug for HeadlessDom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HeadlessDom")
            .field("listeners", &self.listeners.borrow().entries.len())
            .field("pending_timers", &self.timers.borrow().queue.len())
            .field("now_ms", &self.now_ms())
            .finish_non_exhaustive()
    }
}

impl Default for HeadlessDom {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDom {
    /// A document containing `<html><body></body></html>`, clocked from the current time.
    pub fn new() -> Self {
        let epoch = web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        Self::with_epoch(epoch)
    }

    /// Like [`HeadlessDom::new`] with a fixed clock origin (milliseconds since the Unix epoch).
    pub fn with_epoch(epoch_ms: u64) -> Self {
        let mut tree = ElementTree::default();
        let html = tree.create("html");
        let body = tree.create("body");
        tree.append_child(html, body);
        Self {
            tree: RefCell::new(tree),
            html,
            body,
            listeners: RefCell::default(),
            timers: RefCell::default(),
            properties: RefCell::default(),
            epoch_ms,
            elapsed_ms: Cell::new(0),
        }
    }

    /// The `<html>` element.
    pub fn document_element(&self) -> ElementId {
        self.html
    }

    /// The `<body>` element.
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> ElementId {
        self.tree.borrow_mut().create(tag)
    }

    /// Create an element with a `class` attribute and append it to `parent`.
    pub fn create_child(&self, parent: ElementId, tag: &str, class: &str) -> ElementId {
        let mut tree = self.tree.borrow_mut();
        let id = tree.create(tag);
        if !class.is_empty() {
            tree.set_attribute(id, "class", class);
        }
        tree.append_child(parent, id);
        id
    }

    /// Move `child` under `parent`. Returns `false` for stale ids or cycles.
    pub fn append_child(&self, parent: ElementId, child: ElementId) -> bool {
        self.tree.borrow_mut().append_child(parent, child)
    }

    /// Remove an element and its subtree; their ids become stale.
    pub fn remove_element(&self, id: ElementId) {
        if id == self.html || id == self.body {
            log::warn!("refusing to remove the document or body element");
            return;
        }
        self.tree.borrow_mut().remove(id);
    }

    /// Whether `id` is live and attached under the document element.
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.tree.borrow().ancestors_inclusive(id).last() == Some(self.html)
    }

    /// Set an attribute.
    pub fn set_attribute(&self, id: ElementId, name: &str, value: &str) {
        self.tree.borrow_mut().set_attribute(id, name, value);
    }

    /// Read an attribute.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.tree.borrow().attribute(id, name).map(str::to_owned)
    }

    /// Lower-case tag name of a live element.
    pub fn tag_name(&self, id: ElementId) -> Option<String> {
        self.tree.borrow().tag(id).map(str::to_owned)
    }

    /// Parent of a live element.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.tree.borrow().parent(id)
    }

    /// Children of a live element, in order.
    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.tree.borrow().children(id).to_vec()
    }

    /// Add a class to an element.
    pub fn add_element_class(&self, id: ElementId, class: &str) {
        self.tree.borrow_mut().add_class(id, class);
    }

    /// Remove a class from an element.
    pub fn remove_element_class(&self, id: ElementId, class: &str) {
        self.tree.borrow_mut().remove_class(id, class);
    }

    /// Whether an element carries `class`.
    pub fn element_has_class(&self, id: ElementId, class: &str) -> bool {
        self.tree.borrow().has_class(id, class)
    }

    /// All connected elements matching `selector`, in document order.
    pub fn query_all(&self, selector: &str) -> Result<Vec<ElementId>, SelectorError> {
        let query = SelectorQuery::parse(selector)?;
        let tree = self.tree.borrow();
        Ok(tree
            .descendants_inclusive(self.html)
            .into_iter()
            .filter(|id| tree.matches(*id, &query))
            .collect())
    }

    /// The first connected element matching `selector`.
    pub fn query(&self, selector: &str) -> Result<Option<ElementId>, SelectorError> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    /// Number of attached listeners for `event` on `target`.
    pub fn listener_count(&self, target: ListenerTarget, event: &str) -> usize {
        self.listeners
            .borrow()
            .entries
            .iter()
            .filter(|e| e.target == target && e.event == event)
            .count()
    }

    /// Number of attached listeners overall.
    pub fn total_listeners(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    /// Options a listener was attached with.
    pub fn listener_options(&self, id: ListenerId) -> Option<ListenerOptions> {
        self.listeners
            .borrow()
            .entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.options)
    }

    /// Inline style property previously set through [`StyleHost::set_property`].
    pub fn property(&self, scope: StyleScope, name: &str) -> Option<String> {
        self.properties
            .borrow()
            .get(&(scope, name.to_owned()))
            .cloned()
    }

    /// Dispatch `event` and return how many listeners ran.
    pub fn dispatch(&self, event: &NativeEvent) -> usize {
        let mut ran = 0;
        match event.target {
            EventTargetRef::Window => {
                ran += self.run_phase(ListenerTarget::Window, Phase::AtTarget, event);
            }
            EventTargetRef::Document => {
                ran += self.run_phase(ListenerTarget::Window, Phase::Capture, event);
                ran += self.run_phase(ListenerTarget::Document, Phase::AtTarget, event);
                if event.bubbles {
                    ran += self.run_phase(ListenerTarget::Window, Phase::Bubble, event);
                }
            }
            EventTargetRef::Element(id) => {
                if !self.is_connected(id) {
                    log::trace!("`{}` targeted a disconnected element", event.kind);
                    return 0;
                }
                ran += self.run_phase(ListenerTarget::Window, Phase::Capture, event);
                ran += self.run_phase(ListenerTarget::Document, Phase::Capture, event);
                if event.bubbles {
                    ran += self.run_phase(ListenerTarget::Document, Phase::Bubble, event);
                    ran += self.run_phase(ListenerTarget::Window, Phase::Bubble, event);
                }
            }
        }
        ran
    }

    fn run_phase(&self, target: ListenerTarget, phase: Phase, event: &NativeEvent) -> usize {
        let batch: SmallVec<[(ListenerId, bool, NativeListener); 4]> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .filter(|e| e.target == target && e.event == event.kind && phase.accepts(e.options))
            .map(|e| (e.id, e.options.once, e.listener.clone()))
            .collect();
        let mut ran = 0;
        for (id, once, listener) in batch {
            if !self.listeners.borrow().contains(id) {
                continue;
            }
            if once {
                self.remove_listener(id);
            }
            listener(self as &dyn EventHost, event);
            ran += 1;
        }
        ran
    }

    /// Move the clock forward by `ms`, running every timer that falls due.
    ///
    /// Returns the number of timers that ran.
    pub fn advance(&self, ms: u64) -> usize {
        let until = self.elapsed_ms.get().saturating_add(ms);
        let mut ran = 0;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                match timers.queue.first_key_value() {
                    Some((&(due, id), _)) if due <= until => {
                        timers.due.remove(&id);
                        timers.queue.remove(&(due, id)).map(|task| (due, task))
                    }
                    _ => None,
                }
            };
            let Some((due, task)) = next else {
                break;
            };
            self.elapsed_ms.set(due);
            task();
            ran += 1;
        }
        self.elapsed_ms.set(until);
        ran
    }

    /// Number of scheduled, not yet run timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().queue.len()
    }
}

impl EventHost for HeadlessDom {
    fn add_listener(
        &self,
        target: ListenerTarget,
        event: &str,
        listener: NativeListener,
        options: ListenerOptions,
    ) -> ListenerId {
        let mut listeners = self.listeners.borrow_mut();
        listeners.next_id += 1;
        let id = ListenerId(listeners.next_id);
        listeners.entries.push(ListenerEntry {
            id,
            target,
            event: event.to_owned(),
            options,
            listener,
        });
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.entries.len();
        listeners.entries.retain(|e| e.id != id);
        listeners.entries.len() != before
    }

    fn matches(&self, element: ElementId, query: &SelectorQuery) -> bool {
        self.tree.borrow().matches(element, query)
    }

    fn set_timeout(&self, delay_ms: u32, task: TimerTask) -> TimerId {
        let mut timers = self.timers.borrow_mut();
        timers.next_id += 1;
        let id = timers.next_id;
        let due = self.elapsed_ms.get().saturating_add(u64::from(delay_ms));
        timers.queue.insert((due, id), task);
        timers.due.insert(id, due);
        TimerId(id)
    }

    fn clear_timeout(&self, id: TimerId) -> bool {
        let mut timers = self.timers.borrow_mut();
        match timers.due.remove(&id.0) {
            Some(due) => timers.queue.remove(&(due, id.0)).is_some(),
            None => false,
        }
    }

    fn now_ms(&self) -> u64 {
        self.epoch_ms.saturating_add(self.elapsed_ms.get())
    }

    fn dispatch_event(&self, event: &NativeEvent) -> usize {
        self.dispatch(event)
    }
}

impl StyleHost for HeadlessDom {
    fn add_class(&self, scope: StyleScope, class: &str) {
        self.add_element_class(self.scope_element(scope), class);
    }

    fn remove_class(&self, scope: StyleScope, class: &str) {
        self.remove_element_class(self.scope_element(scope), class);
    }

    fn has_class(&self, scope: StyleScope, class: &str) -> bool {
        self.element_has_class(self.scope_element(scope), class)
    }

    fn set_property(&self, scope: StyleScope, name: &str, value: &str) {
        self.properties
            .borrow_mut()
            .insert((scope, name.to_owned()), value.to_owned());
    }
}

impl HeadlessDom {
    fn scope_element(&self, scope: StyleScope) -> ElementId {
        match scope {
            StyleScope::Root => self.html,
            StyleScope::Body => self.body,
        }
    }
}
