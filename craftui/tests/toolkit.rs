// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behavior of the toolkit over a headless document.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use craftui::{CraftUi, Listener, ThemeColors, ThemeConfig, UiConfig, UiEvent, UiEventKind};
use craftui_commands::{Callback, CommandData, CommandParams, KeyMatch, SyntheticCommand};
use craftui_host::{
    EventTargetRef, HeadlessDom, ListenerTarget, Modifiers, NativeEvent, Point, StyleHost,
    StyleScope,
};
use craftui_sound::{MemoryBackend, SoundBoard};

const SAMPLE_RATE: u32 = 10_000;

fn toolkit() -> (Rc<HeadlessDom>, Rc<SoundBoard<MemoryBackend>>, CraftUi<HeadlessDom>) {
    let dom = Rc::new(HeadlessDom::with_epoch(1_000));
    let board = Rc::new(SoundBoard::new(MemoryBackend::new(SAMPLE_RATE)));
    let ui = CraftUi::builder(dom.clone()).effects(board.clone()).build();
    (dom, board, ui)
}

fn clips(board: &SoundBoard<MemoryBackend>) -> Vec<usize> {
    board
        .with_backend(|b| b.clips().iter().map(Vec::len).collect())
        .unwrap_or_default()
}

#[test]
fn non_bubbling_hover_needs_capture() {
    let (dom, _, ui) = toolkit();
    let card = dom.create_child(dom.body(), "div", "mc-card");
    let hits = Rc::new(Cell::new(0));
    let count = hits.clone();
    ui.add(
        "mouse:enter",
        "@all-cards",
        move |_: &CommandData| count.set(count.get() + 1),
        CommandParams::new(),
    );
    dom.dispatch(&NativeEvent::new("mouseenter", EventTargetRef::Element(card)));
    assert_eq!(hits.get(), 0);
}

#[test]
fn hover_cards_and_unsubscribe() {
    let (dom, _, ui) = toolkit();
    let grid = dom.create_child(dom.body(), "div", "grid");
    let card = dom.create_child(grid, "div", "mc-card");
    let legacy = dom.create_child(grid, "section", "product-card");
    let plain = dom.create_child(grid, "div", "plain");

    let hovered = Rc::new(RefCell::new(Vec::new()));
    let log = hovered.clone();
    let sub = ui.add(
        "mouse:enter",
        "@all-cards",
        move |d: &CommandData| log.borrow_mut().push(d.element),
        CommandParams::new().with_bubbles(false),
    );

    for el in [card, legacy, plain] {
        dom.dispatch(&NativeEvent::new("mouseenter", EventTargetRef::Element(el)));
    }
    assert_eq!(*hovered.borrow(), [Some(card), Some(legacy)]);

    sub.unsubscribe();
    dom.dispatch(&NativeEvent::new("mouseenter", EventTargetRef::Element(card)));
    assert_eq!(hovered.borrow().len(), 2);
    assert_eq!(dom.total_listeners(), 0);
}

#[test]
fn synthetic_commands_play_sounds_until_muted() {
    let (dom, board, ui) = toolkit();
    let block = dom.create_child(dom.body(), "div", "block");
    let actions = Rc::new(RefCell::new(Vec::new()));
    for command in ["mc:block-place", "mc:block-break"] {
        let actions = actions.clone();
        ui.add(
            command,
            ".block",
            move |d: &CommandData| actions.borrow_mut().push(d.action),
            CommandParams::new(),
        );
    }

    let down = NativeEvent::pointer("mousedown", EventTargetRef::Element(block), Point::new(4.0, 4.0));
    dom.dispatch(&down.clone().with_modifiers(Modifiers::SHIFT));
    dom.dispatch(&down);
    assert_eq!(
        *actions.borrow(),
        [Some(SyntheticCommand::BlockPlace), Some(SyntheticCommand::BlockBreak)]
    );
    assert_eq!(clips(&board), [500, 500]);

    ui.set_sounds(false);
    dom.dispatch(&down);
    assert_eq!(actions.borrow().len(), 3);
    assert_eq!(clips(&board).len(), 2);
    assert!(!ui.config().sounds);
}

#[test]
fn inventory_key_opens_once_per_press() {
    let (dom, board, ui) = toolkit();
    let opened = Rc::new(Cell::new(0));
    let count = opened.clone();
    ui.add(
        "mc:inventory-open",
        "document",
        move |_: &CommandData| count.set(count.get() + 1),
        CommandParams::new(),
    );
    assert_eq!(ui.commands().active_commands(), ["mc:inventory-open:document"]);

    for key in ["e", "E", "f", "e"] {
        dom.dispatch(&NativeEvent::keyboard("keydown", EventTargetRef::Document, key));
    }
    assert_eq!(opened.get(), 2);
    assert_eq!(clips(&board), [1_200, 1_200]);
}

#[test]
fn delayed_trigger_and_removal() {
    let (dom, _, ui) = toolkit();
    let stamps = Rc::new(RefCell::new(Vec::new()));
    let log = stamps.clone();
    let cb = Callback::new(move |d: &CommandData| log.borrow_mut().push((d.timestamp, d.is_synthetic())));
    ui.add("ui:refresh", "@document", cb.clone(), CommandParams::new());
    assert_eq!(ui.commands().resolve_selector("@document"), "document");

    ui.commands().trigger("ui:refresh", CommandParams::new().with_delay(30));
    dom.advance(10);
    ui.commands().trigger("ui", CommandParams::new());
    assert_eq!(*stamps.borrow(), [(1_010, true)]);

    dom.advance(20);
    assert_eq!(*stamps.borrow(), [(1_010, true), (1_000, true)]);

    ui.commands().trigger("ui:refresh", CommandParams::new().with_delay(30));
    ui.commands().remove("ui:refresh", Some(&cb));
    dom.advance(100);
    assert_eq!(stamps.borrow().len(), 2);
    assert!(ui.commands().is_empty());
}

#[test]
fn window_commands_listen_on_window() {
    let (dom, _, ui) = toolkit();
    let resized = Rc::new(Cell::new(false));
    let flag = resized.clone();
    ui.add(
        "doc:resize",
        "@world",
        move |_: &CommandData| flag.set(true),
        CommandParams::new(),
    );
    assert_eq!(dom.listener_count(ListenerTarget::Window, "resize"), 1);
    dom.dispatch(&NativeEvent::new("resize", EventTargetRef::Window));
    assert!(resized.get());
}

#[test]
fn family_matching_through_the_builder() {
    let dom = Rc::new(HeadlessDom::new());
    let ui = CraftUi::builder(dom).key_match(KeyMatch::Family).build();
    let hits = Rc::new(Cell::new(0));
    for command in ["a", "ab"] {
        let hits = hits.clone();
        ui.add(
            command,
            "document",
            move |_: &CommandData| hits.set(hits.get() + 1),
            CommandParams::new(),
        );
    }
    assert_eq!(ui.commands().trigger("a", CommandParams::new()), 1);
    ui.commands().clear("a");
    assert_eq!(ui.commands().active_commands(), ["ab:document"]);
    assert_eq!(hits.get(), 1);
}

#[test]
fn custom_theme_round_trip() {
    let dom = Rc::new(HeadlessDom::new());
    let ocean = ThemeConfig {
        name: "Ocean".into(),
        colors: ThemeColors {
            primary: "#0277bd".into(),
            secondary: "#26c6da".into(),
            background: "#01579b".into(),
            surface: "#0288d1".into(),
            text: "#e1f5fe".into(),
            border: "#002f6c".into(),
        },
        ..ThemeConfig::default()
    };
    let ui = CraftUi::builder(dom.clone())
        .theme("ocean", ocean)
        .config(UiConfig {
            theme: "ocean".into(),
            pixelated: false,
            ..UiConfig::default()
        })
        .build();

    assert_eq!(ui.current_theme(), "ocean");
    assert_eq!(dom.property(StyleScope::Root, "--mc-text").as_deref(), Some("#e1f5fe"));
    assert!(!dom.has_class(StyleScope::Body, "mc-pixelated"));
    assert!(dom.has_class(StyleScope::Body, "mc-base"));
    assert_eq!(ui.available_themes(), ["default", "dark", "neon", "ocean"]);

    let toggles = Rc::new(RefCell::new(Vec::new()));
    let log = toggles.clone();
    ui.on(
        UiEventKind::SoundsToggled,
        Listener::new(move |e: &UiEvent| log.borrow_mut().push(e.clone())),
    );
    ui.set_sounds(false);
    assert_eq!(*toggles.borrow(), [UiEvent::SoundsToggled { enabled: false }]);

    assert!(ui.set_theme("dark"));
    assert!(dom.has_class(StyleScope::Root, "mc-theme-dark"));
}

#[test]
fn custom_events_reach_listeners() {
    let (_, _, ui) = toolkit();
    let got = Rc::new(RefCell::new(String::new()));
    let sink = got.clone();
    ui.on(
        UiEventKind::Custom("saved".into()),
        Listener::new(move |e: &UiEvent| {
            if let UiEvent::Custom { detail, .. } = e {
                sink.borrow_mut().push_str(detail);
            }
        }),
    );
    let ran = ui.emit(UiEvent::Custom {
        name: "saved".into(),
        detail: "slot 3".into(),
    });
    assert_eq!(ran, 1);
    assert_eq!(*got.borrow(), "slot 3");
}
