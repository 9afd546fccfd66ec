// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tour of the command system on a headless document.
//!
//! Registers hover, click and block commands, dispatches a few native events,
//! triggers a delayed command and prints the registry along the way.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p craftui_demos --example command_tour`

use std::rc::Rc;

use craftui::CraftUi;
use craftui_commands::{CommandData, CommandParams};
use craftui_host::{EventTargetRef, HeadlessDom, Modifiers, NativeEvent, Point};
use craftui_sound::{MemoryBackend, SoundBoard};

fn describe(label: &'static str) -> impl Fn(&CommandData) {
    move |data: &CommandData| {
        let origin = match &data.event {
            Some(event) => event.kind.as_str(),
            None => "trigger",
        };
        println!(
            "  {label:<12} via {origin:<10} selector={} element={:?} action={:?}",
            data.selector, data.element, data.action
        );
    }
}

fn main() {
    env_logger::init();

    let dom = Rc::new(HeadlessDom::new());
    let board = Rc::new(SoundBoard::new(MemoryBackend::new(22_050)));
    let ui = CraftUi::builder(dom.clone()).effects(board.clone()).build();

    // <body><div.inventory><button.mc-btn/><div.mc-card/></div><div.block/></body>
    let inventory = dom.create_child(dom.body(), "div", "inventory");
    let button = dom.create_child(inventory, "button", "mc-btn");
    let card = dom.create_child(inventory, "div", "mc-card");
    let block = dom.create_child(dom.body(), "div", "block");

    ui.add("mouse:click", "@all-buttons", describe("click"), CommandParams::new());
    let hover = ui.add(
        "mouse:enter",
        "@all-cards",
        describe("hover"),
        CommandParams::new().with_bubbles(false),
    );
    ui.add("mc:block-place", ".block", describe("place"), CommandParams::new());
    ui.add("mc:block-break", ".block", describe("break"), CommandParams::new());
    ui.add("mc:inventory-toggle", "@document", describe("inventory"), CommandParams::new());

    println!("registered:");
    for (key, count) in ui.commands().stats() {
        println!("  {key} ({count})");
    }

    println!("native events:");
    dom.dispatch(&NativeEvent::new("click", EventTargetRef::Element(button)));
    dom.dispatch(&NativeEvent::new("mouseenter", EventTargetRef::Element(card)));
    let down = NativeEvent::pointer("mousedown", EventTargetRef::Element(block), Point::new(8.0, 8.0));
    dom.dispatch(&down.clone().with_modifiers(Modifiers::SHIFT));
    dom.dispatch(&down);
    dom.dispatch(&NativeEvent::keyboard("keydown", EventTargetRef::Document, "e"));

    println!("triggers:");
    ui.commands().trigger("mouse", CommandParams::new());
    ui.commands().trigger("mc:inventory", CommandParams::new().with_delay(250));
    dom.advance(250);

    hover.unsubscribe();
    ui.commands().remove("mc:block", None);
    println!("remaining: {:?}", ui.commands().active_commands());

    let played = board.with_backend(|b| b.clips().len()).unwrap_or_default();
    println!("sound buffers played: {played}");
}
