// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native listener construction for registered commands.

use std::rc::{Rc, Weak};

use craftui_host::{EventHost, ListenerTarget, NativeEvent, NativeListener};
use craftui_selector::{DOCUMENT, SelectorQuery, WINDOW};

use crate::callback::{Callback, contain};
use crate::key::CommandKey;
use crate::params::{CommandData, CommandParams};
use crate::registry::Shared;
use crate::synthetic::SyntheticCommand;

/// Target filter derived once from a resolved selector.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Filter {
    /// `document`: every event admitted.
    Document,
    /// `window`: every event admitted, listener on the window.
    Window,
    /// Events whose target element matches the query.
    Query(SelectorQuery),
    /// Unparseable selector: nothing admitted.
    Invalid,
}

impl Filter {
    /// Classify `resolved`, parsing it at most once.
    pub(crate) fn new(resolved: &str, key: &CommandKey) -> Self {
        match resolved {
            DOCUMENT => Self::Document,
            WINDOW => Self::Window,
            _ => match SelectorQuery::parse(resolved) {
                Ok(query) => Self::Query(query),
                Err(err) => {
                    log::warn!("`{key}` will never fire: {err}");
                    Self::Invalid
                }
            },
        }
    }
}

/// Everything one native listener needs to filter and wrap an event.
pub(crate) struct NativeBinding {
    pub(crate) key: CommandKey,
    pub(crate) callback: Callback,
    pub(crate) serial: u64,
    pub(crate) filter: Filter,
    pub(crate) params: CommandParams,
    pub(crate) synthetic: Option<SyntheticCommand>,
}

impl NativeBinding {
    /// The object the listener is attached to.
    pub(crate) fn listener_target(&self) -> ListenerTarget {
        if self.filter == Filter::Window {
            ListenerTarget::Window
        } else {
            ListenerTarget::Document
        }
    }

    fn admits(&self, host: &dyn EventHost, event: &NativeEvent) -> bool {
        match &self.filter {
            Filter::Document | Filter::Window => true,
            Filter::Query(query) => event
                .target_element()
                .is_some_and(|element| host.matches(element, query)),
            Filter::Invalid => false,
        }
    }

    /// Turn the binding into a listener that reports back through `shared`.
    pub(crate) fn into_listener(self, shared: Weak<Shared>) -> NativeListener {
        Rc::new(move |host: &dyn EventHost, event: &NativeEvent| {
            let shared = shared.upgrade();
            if self.params.once == Some(true)
                && let Some(shared) = &shared
            {
                shared.forget_binding(&self.key, self.serial);
            }
            if !self.admits(host, event) {
                return;
            }
            if let Some(command) = self.synthetic
                && !command.refine(event)
            {
                return;
            }
            let data = CommandData {
                element: event.target_element(),
                event: Some(event.clone()),
                selector: self.key.selector.clone(),
                params: self.params.clone(),
                timestamp: host.now_ms(),
                action: self.synthetic,
            };
            contain(&event.kind, || self.callback.call(&data));
            if let Some(command) = self.synthetic
                && let Some(shared) = &shared
            {
                shared.notify(command);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(selector: &str) -> CommandKey {
        CommandKey::new("click", selector)
    }

    #[test]
    fn filters_are_classified_at_bind_time() {
        assert_eq!(Filter::new(DOCUMENT, &key(DOCUMENT)), Filter::Document);
        assert_eq!(Filter::new(WINDOW, &key(WINDOW)), Filter::Window);
        let Filter::Query(query) = Filter::new(".mc-btn:not(.disabled)", &key("@all-buttons"))
        else {
            panic!("expected a parsed query");
        };
        assert_eq!(query.source(), ".mc-btn:not(.disabled)");
    }

    #[test]
    fn malformed_selectors_become_inert() {
        assert_eq!(Filter::new(".slot >", &key(".slot >")), Filter::Invalid);
        assert_eq!(Filter::new("[[[", &key("[[[")), Filter::Invalid);
    }
}
