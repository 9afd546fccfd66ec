// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The command registry: callback sets keyed by `(command type, selector)`.

use core::fmt;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use craftui_host::{EventHost, ListenerId, TimerId};
use craftui_selector::SelectorTable;
use hashbrown::HashMap;
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::binder::{Filter, NativeBinding};
use crate::callback::{Callback, contain};
use crate::effect::EffectSink;
use crate::key::{CommandKey, KeyMatch};
use crate::names;
use crate::params::{CommandData, CommandParams};
use crate::synthetic::{Binding, SyntheticCommand};

/// A native listener attached on behalf of one callback.
struct Bound {
    callback: Callback,
    listener: ListenerId,
    serial: u64,
}

/// A delayed trigger that has not run yet.
struct Pending {
    callback: Callback,
    timer: TimerId,
    serial: u64,
}

#[derive(Default)]
struct Registration {
    callbacks: SmallVec<[Callback; 2]>,
    bindings: SmallVec<[Bound; 2]>,
    pending: Vec<Pending>,
}

impl Registration {
    fn contains(&self, callback: &Callback) -> bool {
        self.callbacks.iter().any(|c| c.ptr_eq(callback))
    }

    fn insert(&mut self, callback: &Callback) {
        if !self.contains(callback) {
            self.callbacks.push(callback.clone());
        }
    }

    /// Drop `callback` with its bindings and pending triggers.
    ///
    /// Returns `false` if it was not a member.
    fn detach(&mut self, callback: &Callback, released: &mut Released) -> bool {
        let Some(pos) = self.callbacks.iter().position(|c| c.ptr_eq(callback)) else {
            return false;
        };
        self.callbacks.remove(pos);
        self.bindings.retain(|b| {
            let keep = !b.callback.ptr_eq(callback);
            if !keep {
                released.listeners.push(b.listener);
            }
            keep
        });
        self.pending.retain(|p| {
            let keep = !p.callback.ptr_eq(callback);
            if !keep {
                released.timers.push(p.timer);
            }
            keep
        });
        true
    }

    fn release(self, released: &mut Released) {
        released
            .listeners
            .extend(self.bindings.into_iter().map(|b| b.listener));
        released
            .timers
            .extend(self.pending.into_iter().map(|p| p.timer));
    }
}

/// Host resources to give back once the state borrow has ended.
#[derive(Default)]
struct Released {
    listeners: SmallVec<[ListenerId; 4]>,
    timers: SmallVec<[TimerId; 4]>,
}

impl Released {
    fn apply(self, host: &dyn EventHost) {
        for id in self.listeners {
            host.remove_listener(id);
        }
        for id in self.timers {
            host.clear_timeout(id);
        }
    }
}

struct State {
    registry: IndexMap<CommandKey, Registration>,
    /// Command type to the selectors registered under it, in insertion order.
    by_type: HashMap<String, Vec<String>>,
    selectors: SelectorTable,
    next_serial: u64,
}

impl State {
    fn serial(&mut self) -> u64 {
        self.next_serial += 1;
        self.next_serial
    }

    fn entry(&mut self, key: &CommandKey) -> &mut Registration {
        if !self.registry.contains_key(key) {
            self.by_type
                .entry(key.command_type.clone())
                .or_default()
                .push(key.selector.clone());
        }
        self.registry.entry(key.clone()).or_default()
    }

    /// Snapshot of the keys `pattern` selects.
    ///
    /// Family lookups go through the type index; everything else scans.
    fn select(&self, key_match: KeyMatch, pattern: &str) -> Vec<CommandKey> {
        match key_match {
            KeyMatch::Prefix => self
                .registry
                .keys()
                .filter(|k| key_match.selects(k, pattern))
                .cloned()
                .collect(),
            KeyMatch::Family => self.by_type.get(pattern).map_or_else(Vec::new, |selectors| {
                selectors
                    .iter()
                    .map(|s| CommandKey::new(pattern, s.as_str()))
                    .collect()
            }),
        }
    }

    fn take(&mut self, key: &CommandKey) -> Option<Registration> {
        let registration = self.registry.shift_remove(key)?;
        if let Some(selectors) = self.by_type.get_mut(&key.command_type) {
            selectors.retain(|s| *s != key.selector);
            if selectors.is_empty() {
                self.by_type.remove(&key.command_type);
            }
        }
        Some(registration)
    }

    /// Remove `callback` from `key`, dropping the key when its set empties.
    fn detach(&mut self, key: &CommandKey, callback: &Callback, released: &mut Released) -> bool {
        let Some(registration) = self.registry.get_mut(key) else {
            return false;
        };
        let removed = registration.detach(callback, released);
        if registration.callbacks.is_empty()
            && let Some(registration) = self.take(key)
        {
            registration.release(released);
        }
        removed
    }
}

pub(crate) struct Shared {
    host: Rc<dyn EventHost>,
    effects: Option<Rc<dyn EffectSink>>,
    key_match: KeyMatch,
    state: RefCell<State>,
}

impl Shared {
    /// A `once` listener fired; the host has already detached it.
    pub(crate) fn forget_binding(&self, key: &CommandKey, serial: u64) {
        let mut released = Released::default();
        {
            let mut state = self.state.borrow_mut();
            let Some(registration) = state.registry.get_mut(key) else {
                return;
            };
            let Some(pos) = registration.bindings.iter().position(|b| b.serial == serial) else {
                return;
            };
            let bound = registration.bindings.remove(pos);
            let still_bound = registration
                .bindings
                .iter()
                .any(|b| b.callback.ptr_eq(&bound.callback));
            if !still_bound {
                log::trace!("`{key}` consumed its once binding");
                state.detach(key, &bound.callback, &mut released);
            }
        }
        released.apply(&*self.host);
    }

    /// Remove a pending trigger record. Returns `false` if it was cancelled.
    fn finish_pending(&self, key: &CommandKey, serial: u64) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(registration) = state.registry.get_mut(key) else {
            return false;
        };
        let Some(pos) = registration.pending.iter().position(|p| p.serial == serial) else {
            return false;
        };
        registration.pending.remove(pos);
        true
    }

    pub(crate) fn notify(&self, command: SyntheticCommand) {
        if let Some(sink) = &self.effects {
            contain(command.command_type(), || sink.effect(command.effect()));
        }
    }

    fn unsubscribe(&self, key: &CommandKey, callback: &Callback) -> bool {
        let mut released = Released::default();
        let removed = self
            .state
            .borrow_mut()
            .detach(key, callback, &mut released);
        released.apply(&*self.host);
        removed
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let mut released = Released::default();
        for (_, registration) in self.state.get_mut().registry.drain(..) {
            registration.release(&mut released);
        }
        released.apply(&*self.host);
    }
}

/// Registry of command callbacks bound to native events of an [`EventHost`].
///
/// Cloning yields another handle to the same registry. Dropping the last
/// handle detaches every native listener and cancels pending delayed triggers.
///
/// ## Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use craftui_commands::{CommandData, CommandParams, CommandSystem};
/// use craftui_host::{EventTargetRef, HeadlessDom, NativeEvent};
///
/// let dom = Rc::new(HeadlessDom::new());
/// let commands = CommandSystem::new(dom.clone());
///
/// let button = dom.create_child(dom.body(), "button", "mc-button");
/// let clicks = Rc::new(Cell::new(0));
/// let seen = clicks.clone();
/// let sub = commands.add(
///     "mouse:click",
///     "@all-buttons",
///     move |_: &CommandData| seen.set(seen.get() + 1),
///     CommandParams::new(),
/// );
///
/// dom.dispatch(&NativeEvent::new("click", EventTargetRef::Element(button)));
/// assert_eq!(clicks.get(), 1);
///
/// sub.unsubscribe();
/// dom.dispatch(&NativeEvent::new("click", EventTargetRef::Element(button)));
/// assert_eq!(clicks.get(), 1);
/// assert!(commands.is_empty());
/// ```
#[derive(Clone)]
pub struct CommandSystem {
    shared: Rc<Shared>,
}

impl fmt::Debug for CommandSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSystem")
            .field("key_match", &self.shared.key_match)
            .field("commands", &self.active_commands())
            .finish_non_exhaustive()
    }
}

impl CommandSystem {
    /// A registry with the built-in selector groups, prefix key matching and no
    /// effect sink.
    pub fn new(host: Rc<dyn EventHost>) -> Self {
        Self::builder(host).build()
    }

    /// Start configuring a registry.
    pub fn builder(host: Rc<dyn EventHost>) -> CommandSystemBuilder {
        CommandSystemBuilder {
            host,
            effects: None,
            key_match: KeyMatch::default(),
            selectors: None,
        }
    }

    /// How command-type arguments select registrations.
    pub fn key_match(&self) -> KeyMatch {
        self.shared.key_match
    }

    /// Register `callback` for `command_type` events on elements matching `selector`.
    ///
    /// `params.selector` replaces `selector` when set. Every call attaches its own
    /// native listener, even when the callback is already in the key's set.
    /// Unknown `mc:` command types are recorded (so [`CommandSystem::trigger`]
    /// reaches them) but get no native binding.
    pub fn add(
        &self,
        command_type: &str,
        selector: &str,
        callback: impl Into<Callback>,
        params: CommandParams,
    ) -> Subscription {
        let callback = callback.into();
        let selector = params.selector.as_deref().unwrap_or(selector);
        let key = CommandKey::new(command_type, selector);

        let (serial, resolved) = {
            let mut state = self.shared.state.borrow_mut();
            state.entry(&key).insert(&callback);
            let resolved = state.selectors.resolve(selector).to_owned();
            (state.serial(), resolved)
        };
        log::debug!("registered `{key}` (resolves to `{resolved}`)");

        let (event, synthetic) = match Binding::classify(command_type) {
            Binding::Primitive => (names::translate(command_type), None),
            Binding::Synthetic(command) => (command.native_event(), Some(command)),
            Binding::UnknownSynthetic => {
                log::warn!("unknown synthetic command `{command_type}`");
                return self.subscription(key, callback);
            }
        };
        if event.is_empty() || resolved.is_empty() {
            log::debug!("`{key}` has nothing to bind");
            return self.subscription(key, callback);
        }

        let options = params.listener_options();
        let binding = NativeBinding {
            key: key.clone(),
            callback: callback.clone(),
            serial,
            filter: Filter::new(&resolved, &key),
            params,
            synthetic,
        };
        let target = binding.listener_target();
        let listener = binding.into_listener(Rc::downgrade(&self.shared));
        let id = self
            .shared
            .host
            .add_listener(target, event, listener, options);

        let recorded = {
            let mut state = self.shared.state.borrow_mut();
            match state.registry.get_mut(&key) {
                Some(registration) if registration.contains(&callback) => {
                    registration.bindings.push(Bound {
                        callback: callback.clone(),
                        listener: id,
                        serial,
                    });
                    true
                }
                _ => false,
            }
        };
        if !recorded {
            self.shared.host.remove_listener(id);
        }
        self.subscription(key, callback)
    }

    fn subscription(&self, key: CommandKey, callback: Callback) -> Subscription {
        Subscription {
            shared: Rc::downgrade(&self.shared),
            key,
            callback,
            active: Cell::new(true),
        }
    }

    /// Remove registrations selected by `pattern`.
    ///
    /// Without a callback every selected registration is dropped. With one, it
    /// leaves every selected set, and sets that become empty are dropped.
    /// Native listeners and pending delayed triggers go with them.
    pub fn remove(&self, pattern: &str, callback: Option<&Callback>) {
        let mut released = Released::default();
        let count = {
            let mut state = self.shared.state.borrow_mut();
            let keys = state.select(self.shared.key_match, pattern);
            match callback {
                None => {
                    for key in &keys {
                        if let Some(registration) = state.take(key) {
                            registration.release(&mut released);
                        }
                    }
                    keys.len()
                }
                Some(callback) => keys
                    .iter()
                    .filter(|key| state.detach(key, callback, &mut released))
                    .count(),
            }
        };
        log::debug!("removed {count} registration(s) for `{pattern}`");
        released.apply(&*self.shared.host);
    }

    /// Drop every registration selected by `pattern` without invoking anything.
    pub fn clear(&self, pattern: &str) {
        let mut released = Released::default();
        let count = {
            let mut state = self.shared.state.borrow_mut();
            let keys = state.select(self.shared.key_match, pattern);
            for key in &keys {
                if let Some(registration) = state.take(key) {
                    registration.release(&mut released);
                }
            }
            keys.len()
        };
        log::debug!("cleared {count} registration(s) for `{pattern}`");
        released.apply(&*self.shared.host);
    }

    /// Invoke every callback of every registration selected by `pattern`.
    ///
    /// Callbacks receive a [`CommandData`] without a native event. With a
    /// non-zero `params.delay` each invocation is scheduled as its own host
    /// timer, which removing the callback cancels. Otherwise callbacks run now,
    /// in registration order. A callback removed by an earlier one does not run.
    ///
    /// Returns the number of callbacks invoked or scheduled.
    pub fn trigger(&self, pattern: &str, params: CommandParams) -> usize {
        let keys = self
            .shared
            .state
            .borrow()
            .select(self.shared.key_match, pattern);
        let delay = params.effective_delay();
        let mut count = 0;
        for key in keys {
            let callbacks: SmallVec<[Callback; 4]> = match self.shared.state.borrow().registry.get(&key) {
                Some(registration) => registration.callbacks.iter().cloned().collect(),
                None => continue,
            };
            for callback in callbacks {
                let member = self
                    .shared
                    .state
                    .borrow()
                    .registry
                    .get(&key)
                    .is_some_and(|r| r.contains(&callback));
                if !member {
                    continue;
                }
                let data = CommandData {
                    element: None,
                    event: None,
                    selector: key.selector.clone(),
                    params: params.clone(),
                    timestamp: self.shared.host.now_ms(),
                    action: None,
                };
                count += 1;
                match delay {
                    Some(ms) => self.schedule(&key, callback, data, ms),
                    None => {
                        contain(&key.command_type, || callback.call(&data));
                    }
                }
            }
        }
        log::trace!("triggered {count} callback(s) for `{pattern}`");
        count
    }

    fn schedule(&self, key: &CommandKey, callback: Callback, data: CommandData, delay_ms: u32) {
        let serial = self.shared.state.borrow_mut().serial();
        let weak = Rc::downgrade(&self.shared);
        let task_key = key.clone();
        let task_callback = callback.clone();
        let timer = self.shared.host.set_timeout(
            delay_ms,
            Box::new(move || {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                if !shared.finish_pending(&task_key, serial) {
                    return;
                }
                drop(shared);
                contain(&task_key.command_type, || task_callback.call(&data));
            }),
        );
        log::trace!("scheduled `{key}` in {delay_ms}ms");
        let recorded = {
            let mut state = self.shared.state.borrow_mut();
            match state.registry.get_mut(key) {
                Some(registration) => {
                    registration.pending.push(Pending {
                        callback,
                        timer,
                        serial,
                    });
                    true
                }
                None => false,
            }
        };
        if !recorded {
            self.shared.host.clear_timeout(timer);
        }
    }

    /// Registered keys, optionally restricted to those `filter` selects.
    pub fn list(&self, filter: Option<&str>) -> Vec<CommandKey> {
        let state = self.shared.state.borrow();
        match filter {
            Some(pattern) => state.select(self.shared.key_match, pattern),
            None => state.registry.keys().cloned().collect(),
        }
    }

    /// Serialized `"<type>:<selector>"` form of every registered key.
    pub fn active_commands(&self) -> Vec<String> {
        self.shared
            .state
            .borrow()
            .registry
            .keys()
            .map(ToString::to_string)
            .collect()
    }

    /// Callback-set size per serialized key, in registration order.
    pub fn stats(&self) -> IndexMap<String, usize> {
        self.shared
            .state
            .borrow()
            .registry
            .iter()
            .map(|(key, registration)| (key.to_string(), registration.callbacks.len()))
            .collect()
    }

    /// Size of the callback set for one key; zero if unregistered.
    pub fn callback_count(&self, command_type: &str, selector: &str) -> usize {
        self.shared
            .state
            .borrow()
            .registry
            .get(&CommandKey::new(command_type, selector))
            .map_or(0, |r| r.callbacks.len())
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.shared.state.borrow().registry.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Define or replace a symbolic selector group. Affects later `add` calls only.
    pub fn add_selector(&self, name: &str, literal: &str) -> Option<String> {
        self.shared
            .state
            .borrow_mut()
            .selectors
            .add_selector(name, literal)
    }

    /// What `selector` resolves to under the current table.
    pub fn resolve_selector(&self, selector: &str) -> String {
        self.shared
            .state
            .borrow()
            .selectors
            .resolve(selector)
            .to_owned()
    }

    /// A handle that does not keep the registry alive.
    pub fn downgrade(&self) -> WeakCommandSystem {
        WeakCommandSystem {
            shared: Rc::downgrade(&self.shared),
        }
    }
}

/// Configures a [`CommandSystem`].
pub struct CommandSystemBuilder {
    host: Rc<dyn EventHost>,
    effects: Option<Rc<dyn EffectSink>>,
    key_match: KeyMatch,
    selectors: Option<SelectorTable>,
}

impl fmt::Debug for CommandSystemBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSystemBuilder")
            .field("effects", &self.effects.is_some())
            .field("key_match", &self.key_match)
            .field("selectors", &self.selectors)
            .finish_non_exhaustive()
    }
}

impl CommandSystemBuilder {
    /// Notify `sink` whenever a synthetic command fires natively.
    pub fn effects(mut self, sink: Rc<dyn EffectSink>) -> Self {
        self.effects = Some(sink);
        self
    }

    /// Choose how command-type arguments select registrations.
    pub fn key_match(mut self, key_match: KeyMatch) -> Self {
        self.key_match = key_match;
        self
    }

    /// Start from `table` instead of the built-in selector groups.
    pub fn selectors(mut self, table: SelectorTable) -> Self {
        self.selectors = Some(table);
        self
    }

    /// Finish.
    pub fn build(self) -> CommandSystem {
        CommandSystem {
            shared: Rc::new(Shared {
                host: self.host,
                effects: self.effects,
                key_match: self.key_match,
                state: RefCell::new(State {
                    registry: IndexMap::new(),
                    by_type: HashMap::new(),
                    selectors: self.selectors.unwrap_or_default(),
                    next_serial: 0,
                }),
            }),
        }
    }
}

/// Non-owning handle to a [`CommandSystem`], for callbacks that call back into it.
#[derive(Clone, Debug, Default)]
pub struct WeakCommandSystem {
    shared: Weak<Shared>,
}

impl WeakCommandSystem {
    /// The registry, if it is still alive.
    pub fn upgrade(&self) -> Option<CommandSystem> {
        self.shared.upgrade().map(|shared| CommandSystem { shared })
    }
}

/// Returned by [`CommandSystem::add`]; undoes exactly that registration.
///
/// Dropping a `Subscription` does not unsubscribe.
pub struct Subscription {
    shared: Weak<Shared>,
    key: CommandKey,
    callback: Callback,
    active: Cell<bool>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("active", &self.active.get())
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// The key the callback was registered under.
    pub fn key(&self) -> &CommandKey {
        &self.key
    }

    /// The registered callback.
    pub fn callback(&self) -> &Callback {
        &self.callback
    }

    /// Whether [`Subscription::unsubscribe`] has not been called yet.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Remove the callback from its set, detach its native listeners on this key
    /// and cancel its pending delayed triggers.
    ///
    /// Idempotent. Returns `true` if the callback was still registered.
    pub fn unsubscribe(&self) -> bool {
        if !self.active.replace(false) {
            return false;
        }
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        let removed = shared.unsubscribe(&self.key, &self.callback);
        if removed {
            log::debug!("unsubscribed from `{}`", self.key);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Effect;
    use craftui_host::{
        EventTargetRef, HeadlessDom, ListenerTarget, Modifiers, NativeEvent, Point,
    };
    use std::cell::RefCell;

    const EPOCH: u64 = 1_700_000_000_000;

    fn setup() -> (Rc<HeadlessDom>, CommandSystem) {
        let dom = Rc::new(HeadlessDom::with_epoch(EPOCH));
        let commands = CommandSystem::new(dom.clone());
        (dom, commands)
    }

    fn counter() -> (Rc<Cell<u32>>, Callback) {
        let hits = Rc::new(Cell::new(0));
        let seen = hits.clone();
        (hits, Callback::new(move |_| seen.set(seen.get() + 1)))
    }

    fn recorder() -> (Rc<RefCell<Vec<CommandData>>>, Callback) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        (log, Callback::new(move |d| sink.borrow_mut().push(d.clone())))
    }

    fn click(el: craftui_host::ElementId) -> NativeEvent {
        NativeEvent::new("click", EventTargetRef::Element(el))
    }

    #[test]
    fn unsubscribe_stops_only_that_callback() {
        let (dom, commands) = setup();
        let button = dom.create_child(dom.body(), "button", "mc-button");
        let (a_hits, a) = counter();
        let (b_hits, b) = counter();
        let sub_a = commands.add("mouse:click", "@all-buttons", a, CommandParams::new());
        commands.add("mouse:click", "@all-buttons", b, CommandParams::new());

        dom.dispatch(&click(button));
        assert_eq!((a_hits.get(), b_hits.get()), (1, 1));

        assert!(sub_a.unsubscribe());
        assert!(!sub_a.unsubscribe());
        assert!(!sub_a.is_active());
        dom.dispatch(&click(button));
        assert_eq!((a_hits.get(), b_hits.get()), (1, 2));
        assert_eq!(dom.listener_count(ListenerTarget::Document, "click"), 1);
        assert_eq!(commands.callback_count("mouse:click", "@all-buttons"), 1);
    }

    #[test]
    fn prefix_remove_and_clear_cross_type_names() {
        let (_dom, commands) = setup();
        let (_, cb) = counter();
        commands.add("a", "x", cb.clone(), CommandParams::new());
        commands.add("ab", "y", cb.clone(), CommandParams::new());
        commands.add("b", "z", cb.clone(), CommandParams::new());
        commands.remove("a", None);
        assert_eq!(commands.active_commands(), ["b:z"]);

        commands.add("a", "x", cb.clone(), CommandParams::new());
        commands.add("ab", "y", cb, CommandParams::new());
        commands.clear("a");
        assert_eq!(commands.active_commands(), ["b:z"]);
    }

    #[test]
    fn family_matching_uses_exact_type() {
        let dom = Rc::new(HeadlessDom::new());
        let commands = CommandSystem::builder(dom.clone())
            .key_match(KeyMatch::Family)
            .build();
        let (_, cb) = counter();
        commands.add("a", "x", cb.clone(), CommandParams::new());
        commands.add("a", "w", cb.clone(), CommandParams::new());
        commands.add("ab", "y", cb, CommandParams::new());
        assert_eq!(commands.list(Some("a")).len(), 2);
        commands.remove("a", None);
        assert_eq!(commands.active_commands(), ["ab:y"]);
    }

    #[test]
    fn listing_agrees_with_key_match_policy() {
        for key_match in [KeyMatch::Prefix, KeyMatch::Family] {
            let dom = Rc::new(HeadlessDom::new());
            let commands = CommandSystem::builder(dom).key_match(key_match).build();
            let (_, cb) = counter();
            for (ty, sel) in [("a", "x"), ("ab", "y"), ("a", "w"), ("mouse:click", "@all-links")] {
                commands.add(ty, sel, cb.clone(), CommandParams::new());
            }
            let all = commands.list(None);
            for pattern in ["", "a", "ab", "a:x", "mouse", "mouse:click", "mouse:click:@all"] {
                let expected: Vec<_> = all
                    .iter()
                    .filter(|k| key_match.selects(k, pattern))
                    .cloned()
                    .collect();
                assert_eq!(
                    commands.list(Some(pattern)),
                    expected,
                    "{key_match:?} with {pattern:?}"
                );
            }
        }
    }

    #[test]
    fn remove_with_callback_prunes_empty_sets() {
        let (dom, commands) = setup();
        let (_, a) = counter();
        let (_, b) = counter();
        commands.add("mouse:enter", "@all-cards", a.clone(), CommandParams::new());
        commands.add("mouse:enter", "@all-links", a.clone(), CommandParams::new());
        commands.add("mouse:enter", "@all-links", b, CommandParams::new());
        assert_eq!(dom.listener_count(ListenerTarget::Document, "mouseenter"), 3);

        commands.remove("mouse:enter", Some(&a));
        assert_eq!(commands.active_commands(), ["mouse:enter:@all-links"]);
        assert_eq!(commands.callback_count("mouse:enter", "@all-links"), 1);
        assert_eq!(dom.listener_count(ListenerTarget::Document, "mouseenter"), 1);
    }

    #[test]
    fn trigger_has_no_native_event() {
        let (dom, commands) = setup();
        let (log, cb) = recorder();
        commands.add("mouse:enter", "@all-cards", cb, CommandParams::new());
        dom.advance(5);
        assert_eq!(commands.trigger("mouse:enter", CommandParams::new()), 1);

        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert!(log[0].is_synthetic());
        assert_eq!(log[0].element, None);
        assert_eq!(log[0].selector, "@all-cards");
        assert_eq!(log[0].timestamp, EPOCH + 5);
    }

    #[test]
    fn delayed_trigger_does_not_block_other_keys() {
        let (dom, commands) = setup();
        let order = Rc::new(RefCell::new(Vec::new()));
        let push = |tag: &'static str| {
            let order = order.clone();
            Callback::new(move |_| order.borrow_mut().push(tag))
        };
        commands.add("slow", "document", push("slow-1"), CommandParams::new());
        commands.add("slow", "document", push("slow-2"), CommandParams::new());
        commands.add("fast", "document", push("fast"), CommandParams::new());

        assert_eq!(commands.trigger("slow", CommandParams::new().with_delay(50)), 2);
        commands.trigger("fast", CommandParams::new());
        assert_eq!(*order.borrow(), ["fast"]);
        assert_eq!(dom.pending_timers(), 2);

        dom.advance(49);
        assert_eq!(*order.borrow(), ["fast"]);
        dom.advance(1);
        assert_eq!(*order.borrow(), ["fast", "slow-1", "slow-2"]);
    }

    #[test]
    fn zero_delay_runs_synchronously() {
        let (dom, commands) = setup();
        let (hits, cb) = counter();
        commands.add("fast", "document", cb, CommandParams::new());
        commands.trigger("fast", CommandParams::new().with_delay(0));
        assert_eq!(hits.get(), 1);
        assert_eq!(dom.pending_timers(), 0);
    }

    #[test]
    fn removal_cancels_delayed_triggers() {
        let (dom, commands) = setup();
        let (hits, cb) = counter();
        let sub = commands.add("slow", "document", cb.clone(), CommandParams::new());
        commands.trigger("slow", CommandParams::new().with_delay(20));
        sub.unsubscribe();
        assert_eq!(dom.pending_timers(), 0);
        dom.advance(100);
        assert_eq!(hits.get(), 0);

        commands.add("slow", "document", cb, CommandParams::new());
        commands.trigger("slow", CommandParams::new().with_delay(20));
        commands.clear("slow");
        dom.advance(100);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn unknown_group_matches_nothing() {
        let (dom, commands) = setup();
        let card = dom.create_child(dom.body(), "div", "mc-card");
        let (hits, cb) = counter();
        assert_eq!(commands.resolve_selector("@unknown-group"), "@unknown-group");
        commands.add("mouse:click", "@unknown-group", cb, CommandParams::new());
        dom.dispatch(&click(card));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn structural_pseudo_classes_filter_targets() {
        let (dom, commands) = setup();
        let first = dom.create_child(dom.body(), "button", "mc-btn");
        let disabled = dom.create_child(dom.body(), "button", "mc-btn disabled");
        let (enabled_hits, enabled) = counter();
        let (first_hits, leading) = counter();
        commands.add("mouse:click", "button:not(.disabled)", enabled, CommandParams::new());
        commands.add("mouse:click", "button:first-child", leading, CommandParams::new());

        dom.dispatch(&click(first));
        assert_eq!((enabled_hits.get(), first_hits.get()), (1, 1));
        dom.dispatch(&click(disabled));
        assert_eq!((enabled_hits.get(), first_hits.get()), (1, 1));
    }

    #[test]
    fn malformed_selectors_bind_but_never_fire() {
        let (dom, commands) = setup();
        let button = dom.create_child(dom.body(), "button", "mc-btn");
        let (hits, cb) = counter();
        commands.add("mouse:click", "button:hover", cb, CommandParams::new());
        assert_eq!(commands.callback_count("mouse:click", "button:hover"), 1);
        dom.dispatch(&click(button));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn inventory_toggle_refines_key() {
        let (dom, commands) = setup();
        let (hits, cb) = counter();
        commands.add("mc:inventory-toggle", "document", cb, CommandParams::new());
        assert_eq!(commands.active_commands(), ["mc:inventory-toggle:document"]);

        let key = |k: &str| NativeEvent::keyboard("keydown", EventTargetRef::Document, k);
        dom.dispatch(&key("e"));
        assert_eq!(hits.get(), 1);
        dom.dispatch(&key("f"));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn stats_count_callbacks() {
        let (_dom, commands) = setup();
        let cbs: Vec<Callback> = (0..3).map(|_| counter().1).collect();
        for cb in &cbs {
            commands.add("mouse:click", "@all-buttons", cb.clone(), CommandParams::new());
        }
        commands.remove("mouse:click", Some(&cbs[1]));
        assert_eq!(commands.stats().get("mouse:click:@all-buttons"), Some(&2));
    }

    #[test]
    fn readding_a_callback_attaches_another_listener() {
        let (dom, commands) = setup();
        let button = dom.create_child(dom.body(), "button", "");
        let (hits, cb) = counter();
        commands.add("mouse:click", "button", cb.clone(), CommandParams::new());
        commands.add("mouse:click", "button", cb.clone(), CommandParams::new());
        assert_eq!(commands.callback_count("mouse:click", "button"), 1);
        dom.dispatch(&click(button));
        assert_eq!(hits.get(), 2);

        commands.remove("mouse:click", Some(&cb));
        assert_eq!(dom.total_listeners(), 0);
    }

    #[test]
    fn listener_options_and_targets() {
        let (dom, commands) = setup();
        let (_, cb) = counter();
        commands.add(
            "mouse:click",
            "document",
            cb.clone(),
            CommandParams::new().with_bubbles(false).with_passive(false),
        );
        commands.add("doc:resize", "window", cb, CommandParams::new());
        assert_eq!(dom.listener_count(ListenerTarget::Document, "click"), 1);
        assert_eq!(dom.listener_count(ListenerTarget::Window, "resize"), 1);
    }

    #[test]
    fn once_forgets_binding_on_first_delivery() {
        let (dom, commands) = setup();
        let button = dom.create_child(dom.body(), "button", "");
        let span = dom.create_child(dom.body(), "span", "");
        let (hits, cb) = counter();
        commands.add("mouse:click", "button", cb, CommandParams::new().with_once(true));

        dom.dispatch(&click(span));
        assert_eq!(hits.get(), 0);
        assert!(commands.is_empty());
        dom.dispatch(&click(button));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn params_selector_overrides_positional() {
        let (dom, commands) = setup();
        let link = dom.create_child(dom.body(), "a", "");
        let (log, cb) = recorder();
        commands.add(
            "mouse:click",
            "@all-buttons",
            cb,
            CommandParams::new().with_selector("@all-links"),
        );
        assert_eq!(commands.active_commands(), ["mouse:click:@all-links"]);
        dom.dispatch(&click(link));
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].element, Some(link));
        assert_eq!(log[0].selector, "@all-links");
        assert_eq!(log[0].params.selector.as_deref(), Some("@all-links"));
    }

    #[test]
    fn panicking_callback_does_not_stop_the_rest() {
        let (_dom, commands) = setup();
        let (hits, cb) = counter();
        commands.add("x", "document", Callback::new(|_| panic!("boom")), CommandParams::new());
        commands.add("x", "document", cb, CommandParams::new());
        assert_eq!(commands.trigger("x", CommandParams::new()), 2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn unknown_synthetic_is_recorded_without_binding() {
        let (dom, commands) = setup();
        let (hits, cb) = counter();
        commands.add("mc:fly", "document", cb, CommandParams::new());
        assert_eq!(dom.total_listeners(), 0);
        commands.trigger("mc:fly", CommandParams::new());
        assert_eq!(hits.get(), 1);
    }

    #[derive(Default)]
    struct Effects(RefCell<Vec<Effect>>);

    impl EffectSink for Effects {
        fn effect(&self, effect: Effect) {
            self.0.borrow_mut().push(effect);
        }
    }

    #[test]
    fn block_commands_split_on_shift_and_notify_sink() {
        let dom = Rc::new(HeadlessDom::new());
        let effects = Rc::new(Effects::default());
        let commands = CommandSystem::builder(dom.clone())
            .effects(effects.clone())
            .build();
        let block = dom.create_child(dom.body(), "div", "block");
        let (places, place_cb) = recorder();
        let (breaks, break_cb) = counter();
        commands.add("mc:block-place", ".block", place_cb, CommandParams::new());
        commands.add("mc:block-break", ".block", break_cb, CommandParams::new());

        let down = NativeEvent::pointer("mousedown", EventTargetRef::Element(block), Point::ZERO);
        dom.dispatch(&down.clone().with_modifiers(Modifiers::SHIFT));
        dom.dispatch(&down);

        assert_eq!(places.borrow().len(), 1);
        assert_eq!(places.borrow()[0].action, Some(SyntheticCommand::BlockPlace));
        assert_eq!(breaks.get(), 1);
        assert_eq!(*effects.0.borrow(), [Effect::BlockPlace, Effect::BlockBreak]);
    }

    #[test]
    fn callbacks_may_reenter_through_weak_handle() {
        let (_dom, commands) = setup();
        let weak = commands.downgrade();
        commands.add(
            "x",
            "document",
            Callback::new(move |_| {
                if let Some(commands) = weak.upgrade() {
                    commands.clear("x");
                }
            }),
            CommandParams::new(),
        );
        let (hits, cb) = counter();
        commands.add("x", "document", cb, CommandParams::new());
        assert_eq!(commands.trigger("x", CommandParams::new()), 1);
        assert_eq!(hits.get(), 0);
        assert!(commands.is_empty());
    }

    #[test]
    fn dropping_the_registry_detaches_listeners() {
        let (dom, commands) = setup();
        let (_, cb) = counter();
        commands.add("mouse:click", "document", cb.clone(), CommandParams::new());
        commands.trigger("mouse:click", CommandParams::new().with_delay(10));
        assert_eq!(dom.total_listeners(), 1);
        drop(commands);
        assert_eq!(dom.total_listeners(), 0);
        assert_eq!(dom.pending_timers(), 0);
    }

    #[test]
    fn custom_selector_groups_apply_to_later_adds() {
        let (dom, commands) = setup();
        let slot = dom.create_child(dom.body(), "div", "slot");
        assert_eq!(commands.add_selector("@hotbar", ".slot"), None);
        let (hits, cb) = counter();
        commands.add("mouse:click", "@hotbar", cb, CommandParams::new());
        dom.dispatch(&click(slot));
        assert_eq!(hits.get(), 1);
    }
}
