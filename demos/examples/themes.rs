// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Switching built-in and custom themes, and listening for toolkit events.
//!
//! Run:
//! - `cargo run -p craftui_demos --example themes`

use std::rc::Rc;

use craftui::{CraftUi, Listener, ThemeColors, ThemeConfig, UiEvent, UiEventKind};
use craftui_host::{HeadlessDom, StyleHost, StyleScope};

fn main() {
    env_logger::init();

    let dom = Rc::new(HeadlessDom::new());
    let ui = CraftUi::new(dom.clone());

    for kind in [UiEventKind::ThemeChanged, UiEventKind::SoundsToggled] {
        ui.on(
            kind,
            Listener::new(|event: &UiEvent| println!("event: {event:?}")),
        );
    }

    ui.register_theme(
        "nether",
        ThemeConfig {
            name: "Nether".into(),
            colors: ThemeColors {
                primary: "#8b0000".into(),
                secondary: "#ff8c00".into(),
                background: "#2b0a0a".into(),
                surface: "#4a1010".into(),
                text: "#f5deb3".into(),
                border: "#1a0000".into(),
            },
            custom_properties: [("--mc-border-width".to_owned(), "3px".to_owned())].into(),
        },
    );
    println!("available: {:?}", ui.available_themes());

    for theme in ["dark", "nether", "end"] {
        let applied = ui.set_theme(theme);
        println!(
            "{theme}: applied={applied} current={} dark-class={} --mc-primary={:?}",
            ui.current_theme(),
            dom.has_class(StyleScope::Root, "mc-theme-dark"),
            dom.property(StyleScope::Root, "--mc-primary"),
        );
    }

    ui.set_sounds(false);
    log::info!("final config: {:?}", ui.config());
}
