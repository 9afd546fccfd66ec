// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Theme switching on the document element.

use std::collections::BTreeMap;

use craftui_host::{EventTargetRef, NativeEvent, StyleHost, StyleScope};
use indexmap::IndexMap;

/// Themes styled entirely by a `mc-theme-<name>` root class.
pub const BUILTIN_THEMES: [&str; 3] = ["default", "dark", "neon"];

/// Native event dispatched on the document after a theme switch.
pub const THEME_CHANGE_EVENT: &str = "themechange";

/// Root class for a built-in theme.
fn theme_class(name: &str) -> String {
    format!("mc-theme-{name}")
}

/// Palette of a registered theme. Each entry becomes a `--mc-<name>` property.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThemeColors {
    /// Accent color.
    pub primary: String,
    /// Secondary accent.
    pub secondary: String,
    /// Page background.
    pub background: String,
    /// Panel background.
    pub surface: String,
    /// Body text.
    pub text: String,
    /// Outlines.
    pub border: String,
}

impl ThemeColors {
    /// `(name, value)` pairs in declaration order.
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("primary", self.primary.as_str()),
            ("secondary", self.secondary.as_str()),
            ("background", self.background.as_str()),
            ("surface", self.surface.as_str()),
            ("text", self.text.as_str()),
            ("border", self.border.as_str()),
        ]
    }
}

/// A theme applied through inline custom properties.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ThemeConfig {
    /// Display name.
    pub name: String,
    /// Palette.
    pub colors: ThemeColors,
    /// Extra properties set verbatim, e.g. `--mc-border-width`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub custom_properties: BTreeMap<String, String>,
}

/// Outcome of a successful [`ThemeManager::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeChange {
    /// The theme now active.
    pub theme: String,
    /// The theme active before.
    pub previous: String,
}

impl ThemeChange {
    /// The [`THEME_CHANGE_EVENT`] announcing this change, targeted at the
    /// document with `theme` and `previousTheme` detail fields.
    pub fn native_event(&self) -> NativeEvent {
        NativeEvent::new(THEME_CHANGE_EVENT, EventTargetRef::Document)
            .with_detail("theme", self.theme.as_str())
            .with_detail("previousTheme", self.previous.as_str())
    }
}

/// Tracks the active theme and the registered custom ones.
#[derive(Clone, Debug)]
pub struct ThemeManager {
    current: String,
    custom: IndexMap<String, ThemeConfig>,
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self {
            current: BUILTIN_THEMES[0].to_owned(),
            custom: IndexMap::new(),
        }
    }
}

impl ThemeManager {
    /// A manager on the `default` theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is one of [`BUILTIN_THEMES`].
    pub fn is_builtin(name: &str) -> bool {
        BUILTIN_THEMES.contains(&name)
    }

    /// The active theme.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Built-in themes followed by registered ones, in registration order.
    pub fn available(&self) -> Vec<&str> {
        BUILTIN_THEMES
            .iter()
            .copied()
            .chain(self.custom.keys().map(String::as_str))
            .collect()
    }

    /// Register or replace a custom theme.
    pub fn register(&mut self, name: impl Into<String>, config: ThemeConfig) {
        let name = name.into();
        log::debug!("registered theme `{name}`");
        self.custom.insert(name, config);
    }

    /// The configuration of a registered theme.
    pub fn get(&self, name: &str) -> Option<&ThemeConfig> {
        self.custom.get(name)
    }

    /// Switch the document to `name`.
    ///
    /// Built-in theme classes are removed first. A built-in theme then adds its
    /// root class; a registered one sets its palette and custom properties on the
    /// root. Unknown names leave everything untouched.
    pub fn apply(&mut self, host: &dyn StyleHost, name: &str) -> Option<ThemeChange> {
        let custom = self.custom.get(name);
        if custom.is_none() && !Self::is_builtin(name) {
            log::warn!("unknown theme `{name}`");
            return None;
        }
        for builtin in BUILTIN_THEMES {
            host.remove_class(StyleScope::Root, &theme_class(builtin));
        }
        match custom {
            Some(config) => {
                for (key, value) in config.colors.entries() {
                    host.set_property(StyleScope::Root, &format!("--mc-{key}"), value);
                }
                for (key, value) in &config.custom_properties {
                    host.set_property(StyleScope::Root, key, value);
                }
            }
            None => host.add_class(StyleScope::Root, &theme_class(name)),
        }
        let previous = core::mem::replace(&mut self.current, name.to_owned());
        Some(ThemeChange {
            theme: name.to_owned(),
            previous,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftui_host::HeadlessDom;

    fn forest() -> ThemeConfig {
        ThemeConfig {
            name: "Forest".into(),
            colors: ThemeColors {
                primary: "#2e7d32".into(),
                secondary: "#795548".into(),
                background: "#1b1b1b".into(),
                surface: "#333".into(),
                text: "#eee".into(),
                border: "#000".into(),
            },
            custom_properties: [("--mc-border-width".to_owned(), "3px".to_owned())].into(),
        }
    }

    #[test]
    fn builtin_themes_swap_root_classes() {
        let dom = HeadlessDom::new();
        let mut themes = ThemeManager::new();
        let change = themes.apply(&dom, "dark").unwrap();
        assert_eq!(change.previous, "default");
        assert!(dom.has_class(StyleScope::Root, "mc-theme-dark"));

        themes.apply(&dom, "neon");
        assert!(!dom.has_class(StyleScope::Root, "mc-theme-dark"));
        assert!(dom.has_class(StyleScope::Root, "mc-theme-neon"));
        assert_eq!(themes.current(), "neon");
    }

    #[test]
    fn custom_themes_set_properties() {
        let dom = HeadlessDom::new();
        let mut themes = ThemeManager::new();
        themes.apply(&dom, "dark");
        themes.register("forest", forest());
        assert_eq!(themes.available(), ["default", "dark", "neon", "forest"]);

        let change = themes.apply(&dom, "forest").unwrap();
        assert_eq!(change.previous, "dark");
        assert!(!dom.has_class(StyleScope::Root, "mc-theme-dark"));
        assert_eq!(
            dom.property(StyleScope::Root, "--mc-primary").as_deref(),
            Some("#2e7d32")
        );
        assert_eq!(
            dom.property(StyleScope::Root, "--mc-border-width").as_deref(),
            Some("3px")
        );
    }

    #[test]
    fn change_announces_itself_on_the_document() {
        let change = ThemeChange {
            theme: "neon".into(),
            previous: "dark".into(),
        };
        let event = change.native_event();
        assert_eq!(event.kind, THEME_CHANGE_EVENT);
        assert_eq!(event.target, EventTargetRef::Document);
        assert_eq!(event.detail("theme"), Some("neon"));
        assert_eq!(event.detail("previousTheme"), Some("dark"));
    }

    #[test]
    fn unknown_theme_changes_nothing() {
        let dom = HeadlessDom::new();
        let mut themes = ThemeManager::new();
        themes.apply(&dom, "dark");
        assert_eq!(themes.apply(&dom, "sepia"), None);
        assert_eq!(themes.current(), "dark");
        assert!(dom.has_class(StyleScope::Root, "mc-theme-dark"));
    }
}
