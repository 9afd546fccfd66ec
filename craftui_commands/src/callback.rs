// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Callback handles and panic containment at the dispatch boundary.

use core::fmt;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::params::CommandData;

/// A command callback with reference identity.
///
/// Clones share identity: registering a clone of a callback that is already in a
/// set does not add a second member, and `remove` with any clone removes it.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&CommandData)>);

impl Callback {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&CommandData) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Whether `self` and `other` are the same callback.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Invoke the callback without panic containment.
    pub fn call(&self, data: &CommandData) {
        (self.0)(data);
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

impl<F: Fn(&CommandData) + 'static> From<F> for Callback {
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

/// Run `f`, logging instead of unwinding if it panics.
///
/// `origin` names the event or command the work belongs to. Returns `false` if
/// `f` panicked.
pub fn contain(origin: &str, f: impl FnOnce()) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => true,
        Err(payload) => {
            log::error!(
                "error in callback for `{origin}`: {}",
                panic_message(payload.as_ref())
            );
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
