// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-type to native event name translation.

/// Symbolic command types and the native events they stand for.
///
/// The table is fixed; command types that are not listed are used verbatim as
/// event names (see [`translate`]).
pub const EVENT_NAMES: &[(&str, &str)] = &[
    // Mouse
    ("mouse:click", "click"),
    ("mouse:dblclick", "dblclick"),
    ("mouse:down", "mousedown"),
    ("mouse:up", "mouseup"),
    ("mouse:move", "mousemove"),
    ("mouse:over", "mouseover"),
    ("mouse:out", "mouseout"),
    ("mouse:enter", "mouseenter"),
    ("mouse:leave", "mouseleave"),
    ("mouse:wheel", "wheel"),
    ("mouse:context", "contextmenu"),
    // Keyboard
    ("key:down", "keydown"),
    ("key:up", "keyup"),
    ("key:press", "keypress"),
    // Forms
    ("form:input", "input"),
    ("form:change", "change"),
    ("form:submit", "submit"),
    ("form:reset", "reset"),
    ("form:focus", "focus"),
    ("form:blur", "blur"),
    ("form:select", "select"),
    ("form:invalid", "invalid"),
    // Document
    ("doc:load", "DOMContentLoaded"),
    ("doc:ready", "readystatechange"),
    ("doc:scroll", "scroll"),
    ("doc:resize", "resize"),
    ("doc:beforeunload", "beforeunload"),
    ("doc:unload", "unload"),
    // Media
    ("media:play", "play"),
    ("media:pause", "pause"),
    ("media:ended", "ended"),
    ("media:timeupdate", "timeupdate"),
    ("media:volumechange", "volumechange"),
    ("media:waiting", "waiting"),
    ("media:canplay", "canplay"),
    // Drag and drop
    ("drag:start", "dragstart"),
    ("drag:end", "dragend"),
    ("drag:enter", "dragenter"),
    ("drag:leave", "dragleave"),
    ("drag:over", "dragover"),
    ("drag:drop", "drop"),
    // Touch
    ("touch:start", "touchstart"),
    ("touch:move", "touchmove"),
    ("touch:end", "touchend"),
    ("touch:cancel", "touchcancel"),
    // Animation
    ("anim:start", "animationstart"),
    ("anim:end", "animationend"),
    ("anim:iteration", "animationiteration"),
    // Transition
    ("transition:start", "transitionstart"),
    ("transition:end", "transitionend"),
    ("transition:run", "transitionrun"),
    ("transition:cancel", "transitioncancel"),
    // Clipboard
    ("clipboard:copy", "copy"),
    ("clipboard:cut", "cut"),
    ("clipboard:paste", "paste"),
    // Visibility
    ("visibility:change", "visibilitychange"),
    ("page:show", "pageshow"),
    ("page:hide", "pagehide"),
];

/// Translate a command type to the native event name it listens for.
///
/// Lookup is exact; unknown command types are returned unchanged.
pub fn translate(command_type: &str) -> &str {
    EVENT_NAMES
        .iter()
        .find(|(symbolic, _)| *symbolic == command_type)
        .map_or(command_type, |(_, native)| *native)
}

/// Whether `command_type` has an entry in [`EVENT_NAMES`].
pub fn is_mapped(command_type: &str) -> bool {
    EVENT_NAMES.iter().any(|(symbolic, _)| *symbolic == command_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_translate() {
        assert_eq!(translate("mouse:enter"), "mouseenter");
        assert_eq!(translate("form:submit"), "submit");
        assert_eq!(translate("doc:load"), "DOMContentLoaded");
        assert!(is_mapped("page:hide"));
    }

    #[test]
    fn unknown_types_pass_through() {
        assert_eq!(translate("gamepad:connected"), "gamepad:connected");
        assert_eq!(translate("click"), "click");
        assert!(!is_mapped("click"));
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(translate("mouse:"), "mouse:");
        assert_eq!(translate("MOUSE:CLICK"), "MOUSE:CLICK");
        assert_eq!(translate("mouse:click "), "mouse:click ");
    }

    #[test]
    fn table_has_no_duplicate_keys() {
        for (i, (a, _)) in EVENT_NAMES.iter().enumerate() {
            assert!(
                EVENT_NAMES[i + 1..].iter().all(|(b, _)| a != b),
                "duplicate entry for {a}"
            );
        }
    }
}
