// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed publish/subscribe.

use core::fmt;
use core::hash::Hash;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use craftui_commands::contain;
use indexmap::IndexMap;
use smallvec::SmallVec;

/// An emitter callback with reference identity.
pub struct Listener<T>(Rc<dyn Fn(&T)>);

impl<T> Listener<T> {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&T) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Whether `self` and `other` are the same listener.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

struct Entry<T> {
    listener: Listener<T>,
    once: bool,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            listener: self.listener.clone(),
            once: self.once,
        }
    }
}

type Table<K, T> = RefCell<IndexMap<K, SmallVec<[Entry<T>; 2]>>>;

/// Listeners of payload `T`, grouped by event key `K`.
///
/// A listener panicking during [`EventEmitter::emit`] is logged with the event
/// key and the remaining listeners still run. Registering the same listener
/// twice under one key with [`EventEmitter::on`] keeps a single membership.
///
/// ## Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use craftui::{EventEmitter, Listener};
///
/// let emitter: EventEmitter<&str, u32> = EventEmitter::new();
/// let total = Rc::new(Cell::new(0));
/// let sum = total.clone();
/// let sub = emitter.on("score", Listener::new(move |n: &u32| sum.set(sum.get() + n)));
///
/// emitter.emit(&"score", &5);
/// sub.unsubscribe();
/// emitter.emit(&"score", &5);
/// assert_eq!(total.get(), 5);
/// assert_eq!(emitter.listener_count(&"score"), 0);
/// ```
pub struct EventEmitter<K, T> {
    table: Rc<Table<K, T>>,
}

impl<K, T> fmt::Debug for EventEmitter<K, T>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.borrow();
        f.debug_map()
            .entries(table.iter().map(|(k, v)| (k, v.len())))
            .finish()
    }
}

impl<K, T> Default for EventEmitter<K, T> {
    fn default() -> Self {
        Self {
            table: Rc::new(RefCell::new(IndexMap::new())),
        }
    }
}

impl<K, T> EventEmitter<K, T>
where
    K: Hash + Eq + Clone + fmt::Display,
{
    /// An emitter without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, key: K, listener: Listener<T>, once: bool) -> EventSubscription<K, T> {
        let mut table = self.table.borrow_mut();
        let entries = table.entry(key.clone()).or_default();
        if !entries.iter().any(|e| e.listener.ptr_eq(&listener)) {
            entries.push(Entry {
                listener: listener.clone(),
                once,
            });
        }
        EventSubscription {
            table: Rc::downgrade(&self.table),
            key,
            listener,
        }
    }

    /// Call `listener` for every emission of `key` until unsubscribed.
    pub fn on(&self, key: K, listener: Listener<T>) -> EventSubscription<K, T> {
        self.insert(key, listener, false)
    }

    /// Call `listener` for the next emission of `key` only.
    ///
    /// The listener is stored under a fresh identity, so it never merges with an
    /// [`EventEmitter::on`] registration of the same listener, and
    /// [`EventEmitter::off`] with the original does not cancel it. Use the
    /// returned subscription instead.
    pub fn once(&self, key: K, listener: Listener<T>) -> EventSubscription<K, T>
    where
        T: 'static,
    {
        let wrapped = Listener(Rc::new(move |payload: &T| (listener.0)(payload)));
        self.insert(key, wrapped, true)
    }

    /// Deliver `payload` to every listener of `key`, in subscription order.
    ///
    /// Returns how many listeners ran.
    pub fn emit(&self, key: &K, payload: &T) -> usize {
        let snapshot: SmallVec<[Entry<T>; 4]> = match self.table.borrow().get(key) {
            Some(entries) => entries.iter().cloned().collect(),
            None => return 0,
        };
        let origin = key.to_string();
        let mut ran = 0;
        for entry in snapshot {
            let registered = self
                .table
                .borrow()
                .get(key)
                .is_some_and(|entries| entries.iter().any(|e| e.listener.ptr_eq(&entry.listener)));
            if !registered {
                continue;
            }
            if entry.once {
                remove(&self.table, key, &entry.listener);
            }
            contain(&origin, || (entry.listener.0)(payload));
            ran += 1;
        }
        ran
    }

    /// Remove one listener of `key`, or all of them.
    pub fn off(&self, key: &K, listener: Option<&Listener<T>>) {
        match listener {
            Some(listener) => remove(&self.table, key, listener),
            None => {
                self.table.borrow_mut().shift_remove(key);
            }
        }
    }

    /// Remove every listener.
    pub fn clear(&self) {
        self.table.borrow_mut().clear();
    }

    /// Number of listeners of `key`.
    pub fn listener_count(&self, key: &K) -> usize {
        self.table.borrow().get(key).map_or(0, SmallVec::len)
    }
}

fn remove<K: Hash + Eq, T>(table: &Table<K, T>, key: &K, listener: &Listener<T>) {
    let mut table = table.borrow_mut();
    let Some(entries) = table.get_mut(key) else {
        return;
    };
    entries.retain(|e| !e.listener.ptr_eq(listener));
    if entries.is_empty() {
        table.shift_remove(key);
    }
}

/// Returned by [`EventEmitter::on`] and [`EventEmitter::once`].
pub struct EventSubscription<K, T> {
    table: Weak<Table<K, T>>,
    key: K,
    listener: Listener<T>,
}

impl<K: fmt::Debug, T> fmt::Debug for EventSubscription<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSubscription")
            .field("key", &self.key)
            .field("listener", &self.listener)
            .finish_non_exhaustive()
    }
}

impl<K: Hash + Eq, T> EventSubscription<K, T> {
    /// The subscribed listener.
    pub fn listener(&self) -> &Listener<T> {
        &self.listener
    }

    /// Remove the listener. Safe to call more than once.
    pub fn unsubscribe(&self) {
        if let Some(table) = self.table.upgrade() {
            remove(&table, &self.key, &self.listener);
        }
    }
}
