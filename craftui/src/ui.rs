// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The toolkit façade.

use core::fmt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use craftui_commands::{
    Callback, CommandParams, CommandSystem, Effect, EffectSink, KeyMatch, Subscription,
};
use craftui_host::{EventHost, StyleHost, StyleScope};

use crate::emitter::{EventEmitter, EventSubscription, Listener};
use crate::theme::{ThemeChange, ThemeConfig, ThemeManager};

/// Body class added when pixel-art rendering is requested.
pub const PIXELATED_CLASS: &str = "mc-pixelated";
/// Body class that opts the page into the toolkit's base styles.
pub const BASE_CLASS: &str = "mc-base";
/// Body class that turns off animations and transitions.
pub const NO_ANIMATIONS_CLASS: &str = "mc-no-animations";

/// Toolkit configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct UiConfig {
    /// Initial theme name.
    pub theme: String,
    /// Whether effects reach the sound sink.
    pub sounds: bool,
    /// Add [`PIXELATED_CLASS`] to the body.
    pub pixelated: bool,
    /// When `false`, add [`NO_ANIMATIONS_CLASS`] to the body.
    pub animations: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_owned(),
            sounds: true,
            pixelated: true,
            animations: true,
        }
    }
}

/// The configuration fields touched by one change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigChange {
    /// New theme.
    pub theme: Option<String>,
    /// New sound setting.
    pub sounds: Option<bool>,
    /// New pixelation setting.
    pub pixelated: Option<bool>,
    /// New animation setting.
    pub animations: Option<bool>,
}

/// Keys of toolkit events.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum UiEventKind {
    /// Some configuration field changed.
    ConfigChange,
    /// The theme changed.
    ThemeChanged,
    /// Sounds were turned on or off.
    SoundsToggled,
    /// An application-defined event.
    Custom(String),
}

impl fmt::Display for UiEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigChange => f.write_str("configChange"),
            Self::ThemeChanged => f.write_str("themeChanges"),
            Self::SoundsToggled => f.write_str("soundsToggled"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// A toolkit event and its payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// See [`UiEventKind::ConfigChange`].
    ConfigChange(ConfigChange),
    /// See [`UiEventKind::ThemeChanged`].
    ThemeChanged(ThemeChange),
    /// See [`UiEventKind::SoundsToggled`].
    SoundsToggled {
        /// Whether sounds are now on.
        enabled: bool,
    },
    /// See [`UiEventKind::Custom`].
    Custom {
        /// Event name.
        name: String,
        /// Free-form payload.
        detail: String,
    },
}

impl UiEvent {
    /// The key this event is delivered under.
    pub fn kind(&self) -> UiEventKind {
        match self {
            Self::ConfigChange(_) => UiEventKind::ConfigChange,
            Self::ThemeChanged(_) => UiEventKind::ThemeChanged,
            Self::SoundsToggled { .. } => UiEventKind::SoundsToggled,
            Self::Custom { name, .. } => UiEventKind::Custom(name.clone()),
        }
    }
}

/// Forwards effects only while sounds are enabled.
struct GatedSink {
    enabled: Rc<Cell<bool>>,
    inner: Rc<dyn EffectSink>,
}

impl EffectSink for GatedSink {
    fn effect(&self, effect: Effect) {
        if self.enabled.get() {
            self.inner.effect(effect);
        }
    }
}

/// Themes, sounds, events and command dispatch for one document.
///
/// ## Example
///
/// ```
/// use std::rc::Rc;
/// use craftui::{CraftUi, UiConfig};
/// use craftui_host::{HeadlessDom, StyleHost, StyleScope};
///
/// let dom = Rc::new(HeadlessDom::new());
/// let ui = CraftUi::builder(dom.clone())
///     .config(UiConfig { theme: "dark".into(), animations: false, ..UiConfig::default() })
///     .build();
///
/// assert!(dom.has_class(StyleScope::Root, "mc-theme-dark"));
/// assert!(dom.has_class(StyleScope::Body, "mc-no-animations"));
/// assert!(ui.set_theme("neon"));
/// assert_eq!(ui.config().theme, "neon");
/// ```
pub struct CraftUi<H> {
    host: Rc<H>,
    config: RefCell<UiConfig>,
    themes: RefCell<ThemeManager>,
    events: EventEmitter<UiEventKind, UiEvent>,
    commands: CommandSystem,
    sounds: Rc<Cell<bool>>,
}

impl<H> fmt::Debug for CraftUi<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CraftUi")
            .field("config", &self.config.borrow())
            .field("themes", &self.themes.borrow())
            .field("events", &self.events)
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

impl<H: EventHost + StyleHost + 'static> CraftUi<H> {
    /// A toolkit with the default configuration.
    pub fn new(host: Rc<H>) -> Self {
        Self::builder(host).build()
    }

    /// Start configuring a toolkit.
    pub fn builder(host: Rc<H>) -> CraftUiBuilder<H> {
        CraftUiBuilder {
            host,
            config: UiConfig::default(),
            effects: None,
            key_match: KeyMatch::default(),
            themes: Vec::new(),
        }
    }

    /// The host document.
    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    /// A copy of the current configuration.
    pub fn config(&self) -> UiConfig {
        self.config.borrow().clone()
    }

    /// Switch theme. Returns `false`, changing nothing, for an unknown theme.
    pub fn set_theme(&self, theme: &str) -> bool {
        let change = self.themes.borrow_mut().apply(&*self.host, theme);
        let Some(change) = change else {
            return false;
        };
        self.config.borrow_mut().theme = change.theme.clone();
        self.host.dispatch_event(&change.native_event());
        self.emit(UiEvent::ConfigChange(ConfigChange {
            theme: Some(change.theme.clone()),
            ..ConfigChange::default()
        }));
        self.emit(UiEvent::ThemeChanged(change));
        true
    }

    /// Turn effect sounds on or off.
    pub fn set_sounds(&self, enabled: bool) {
        self.sounds.set(enabled);
        self.config.borrow_mut().sounds = enabled;
        self.emit(UiEvent::ConfigChange(ConfigChange {
            sounds: Some(enabled),
            ..ConfigChange::default()
        }));
        self.emit(UiEvent::SoundsToggled { enabled });
    }

    /// Whether effects currently reach the sound sink.
    pub fn sounds_enabled(&self) -> bool {
        self.sounds.get()
    }

    /// Listen for toolkit events of `kind`.
    pub fn on(&self, kind: UiEventKind, listener: Listener<UiEvent>) -> EventSubscription<UiEventKind, UiEvent> {
        self.events.on(kind, listener)
    }

    /// Deliver `event` to its listeners. Returns how many ran.
    pub fn emit(&self, event: UiEvent) -> usize {
        self.events.emit(&event.kind(), &event)
    }

    /// The toolkit's event emitter.
    pub fn events(&self) -> &EventEmitter<UiEventKind, UiEvent> {
        &self.events
    }

    /// Shorthand for [`CommandSystem::add`] on [`CraftUi::commands`].
    pub fn add(
        &self,
        command_type: &str,
        selector: &str,
        callback: impl Into<Callback>,
        params: CommandParams,
    ) -> Subscription {
        self.commands.add(command_type, selector, callback, params)
    }

    /// The command registry.
    pub fn commands(&self) -> &CommandSystem {
        &self.commands
    }

    /// The active theme.
    pub fn current_theme(&self) -> String {
        self.themes.borrow().current().to_owned()
    }

    /// Built-in and registered theme names.
    pub fn available_themes(&self) -> Vec<String> {
        self.themes
            .borrow()
            .available()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Register or replace a custom theme.
    pub fn register_theme(&self, name: &str, config: ThemeConfig) {
        self.themes.borrow_mut().register(name, config);
    }
}

/// Configures a [`CraftUi`].
pub struct CraftUiBuilder<H> {
    host: Rc<H>,
    config: UiConfig,
    effects: Option<Rc<dyn EffectSink>>,
    key_match: KeyMatch,
    themes: Vec<(String, ThemeConfig)>,
}

impl<H> fmt::Debug for CraftUiBuilder<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CraftUiBuilder")
            .field("config", &self.config)
            .field("effects", &self.effects.is_some())
            .field("key_match", &self.key_match)
            .field("themes", &self.themes)
            .finish_non_exhaustive()
    }
}

impl<H: EventHost + StyleHost + 'static> CraftUiBuilder<H> {
    /// Replace the configuration.
    pub fn config(mut self, config: UiConfig) -> Self {
        self.config = config;
        self
    }

    /// Play effects of synthetic commands through `sink` while sounds are on.
    pub fn effects(mut self, sink: Rc<dyn EffectSink>) -> Self {
        self.effects = Some(sink);
        self
    }

    /// How the command registry selects registrations by command type.
    pub fn key_match(mut self, key_match: KeyMatch) -> Self {
        self.key_match = key_match;
        self
    }

    /// Register a custom theme before the initial one is applied.
    pub fn theme(mut self, name: impl Into<String>, config: ThemeConfig) -> Self {
        self.themes.push((name.into(), config));
        self
    }

    /// Apply the initial theme and body classes and finish.
    pub fn build(self) -> CraftUi<H> {
        let Self {
            host,
            mut config,
            effects,
            key_match,
            themes,
        } = self;

        let sounds = Rc::new(Cell::new(config.sounds));
        let event_host: Rc<dyn EventHost> = host.clone();
        let mut commands = CommandSystem::builder(event_host).key_match(key_match);
        if let Some(inner) = effects {
            commands = commands.effects(Rc::new(GatedSink {
                enabled: sounds.clone(),
                inner,
            }));
        }

        let mut manager = ThemeManager::new();
        for (name, theme) in themes {
            manager.register(name, theme);
        }
        if !config.theme.is_empty() {
            if let Some(change) = manager.apply(&*host, &config.theme) {
                host.dispatch_event(&change.native_event());
            }
            config.theme = manager.current().to_owned();
        }

        if config.pixelated {
            host.add_class(StyleScope::Body, PIXELATED_CLASS);
        }
        host.add_class(StyleScope::Body, BASE_CLASS);
        if !config.animations {
            host.add_class(StyleScope::Body, NO_ANIMATIONS_CLASS);
        }
        log::debug!("craftui ready with theme `{}`", config.theme);

        CraftUi {
            host,
            config: RefCell::new(config),
            themes: RefCell::new(manager),
            events: EventEmitter::new(),
            commands: commands.build(),
            sounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftui_host::HeadlessDom;

    #[test]
    fn default_build_sets_body_classes() {
        let dom = Rc::new(HeadlessDom::new());
        let ui = CraftUi::new(dom.clone());
        assert!(dom.has_class(StyleScope::Root, "mc-theme-default"));
        assert!(dom.has_class(StyleScope::Body, PIXELATED_CLASS));
        assert!(dom.has_class(StyleScope::Body, BASE_CLASS));
        assert!(!dom.has_class(StyleScope::Body, NO_ANIMATIONS_CLASS));
        assert_eq!(ui.config(), UiConfig::default());
    }

    #[test]
    fn set_theme_emits_config_and_theme_events() {
        let dom = Rc::new(HeadlessDom::new());
        let ui = CraftUi::new(dom);
        let seen = Rc::new(RefCell::new(Vec::new()));
        for kind in [UiEventKind::ConfigChange, UiEventKind::ThemeChanged] {
            let seen = seen.clone();
            ui.on(kind, Listener::new(move |e: &UiEvent| seen.borrow_mut().push(e.clone())));
        }

        assert!(ui.set_theme("dark"));
        assert!(!ui.set_theme("sepia"));
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(
            seen[0],
            UiEvent::ConfigChange(ConfigChange {
                theme: Some("dark".into()),
                ..ConfigChange::default()
            })
        );
        assert_eq!(
            seen[1],
            UiEvent::ThemeChanged(ThemeChange {
                theme: "dark".into(),
                previous: "default".into(),
            })
        );
    }

    #[test]
    fn theme_switch_reaches_document_commands() {
        let dom = Rc::new(HeadlessDom::new());
        let ui = CraftUi::new(dom);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        ui.add(
            "themechange",
            "document",
            move |data: &craftui_commands::CommandData| {
                let event = data.event.as_ref().map(|e| {
                    (
                        e.detail("theme").map(str::to_owned),
                        e.detail("previousTheme").map(str::to_owned),
                    )
                });
                sink.borrow_mut().push(event);
            },
            CommandParams::new(),
        );

        assert!(ui.set_theme("dark"));
        assert!(!ui.set_theme("sepia"));
        assert_eq!(
            *seen.borrow(),
            [Some((Some("dark".to_owned()), Some("default".to_owned())))]
        );
    }

    #[test]
    fn unknown_initial_theme_falls_back() {
        let dom = Rc::new(HeadlessDom::new());
        let ui = CraftUi::builder(dom)
            .config(UiConfig {
                theme: "sepia".into(),
                ..UiConfig::default()
            })
            .build();
        assert_eq!(ui.config().theme, "default");
    }

    #[test]
    fn event_kind_names() {
        assert_eq!(UiEventKind::ConfigChange.to_string(), "configChange");
        assert_eq!(UiEventKind::ThemeChanged.to_string(), "themeChanges");
        assert_eq!(UiEventKind::SoundsToggled.to_string(), "soundsToggled");
        assert_eq!(UiEventKind::Custom("saved".into()).to_string(), "saved");
        let custom = UiEvent::Custom {
            name: "saved".into(),
            detail: String::new(),
        };
        assert_eq!(custom.kind(), UiEventKind::Custom("saved".into()));
    }
}
