// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture card: a tappable button inside a draggable card.
//!
//! Run:
//! - `cargo run -p understory_demos --example gesture_card`
//! - `RUST_LOG=understory_touch=trace cargo run -p understory_demos --example gesture_card`
//!
//! The button claims the responder on touch start. A tap fires `on_press`; a
//! held press fires `on_long_press` from the scheduler. When the host decides
//! the pointer has strayed far enough, it asks the button to hand the responder
//! to the card, and the card's pan recognizer takes over the drag.

use hashbrown::HashMap;
use kurbo::Point;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use understory_gesture::pan::PanConfig;
use understory_gesture::press::PressConfig;
use understory_gesture::pressable::Pressable;
use understory_gesture::scheduler::Scheduler;
use understory_touch::contract::Responder;
use understory_touch::negotiator::Negotiator;
use understory_touch::types::PressEvent;

type Contracts = HashMap<&'static str, Box<dyn Responder<&'static str>>>;

const PATH: [&str; 3] = ["root", "card", "button"];

/// Distance at which the host hands a button press over to the card.
const SLOP: f64 = 8.0;

fn at(x: f64, t: u64) -> PressEvent<&'static str> {
    PressEvent::new("button", Point::new(x, 0.0), t)
}

fn mount(scheduler: &Scheduler) -> Contracts {
    let mut contracts = Contracts::new();
    Pressable::new("button")
        .press(
            PressConfig::new()
                .on_press_in(|el, e| println!("  {el}: press in @ {}ms", e.timestamp))
                .on_press_out(|el, e| println!("  {el}: press out @ {}ms", e.timestamp))
                .on_press(|el, _| println!("  {el}: tapped"))
                .on_long_press(|el, _| println!("  {el}: long press"))
                .with_delay_long_press(400),
        )
        .mount(scheduler, &mut contracts);
    Pressable::new("card")
        .pan(
            PanConfig::new()
                .on_pan_start(|el, e| println!("  {el}: pan start at {:?}", e.page()))
                .on_pan_move(|el, e| {
                    println!(
                        "  {el}: pan by {:.1} at {:.2} px/ms",
                        e.translation.x, e.velocity.x
                    );
                })
                .on_pan_end(|el, e| println!("  {el}: pan end after {:.1}", e.translation.x)),
        )
        .mount(scheduler, &mut contracts);
    contracts
}

/// Feed a pointer track through the negotiator, advancing the scheduler
/// before each event.
fn play(label: &str, track: &[(f64, u64)]) {
    println!("\n== {label} ==");
    let scheduler = Scheduler::new();
    let mut contracts = mount(&scheduler);
    let mut negotiator = Negotiator::new();

    let Some((&(x0, t0), rest)) = track.split_first() else {
        return;
    };
    scheduler.advance_to(t0);
    let winner = negotiator.touch_start(&PATH, &mut contracts, &at(x0, t0));
    println!("  responder after start: {winner:?}");

    let mut last = at(x0, t0);
    for &(x, t) in rest {
        scheduler.advance_to(t);
        let ev = at(x, t);
        if negotiator.responder() == Some(&"button") && (x - x0).abs() >= SLOP {
            let moved = negotiator.request_transfer("card", &mut contracts, &ev);
            println!("  transfer to card: {moved}");
        }
        negotiator.touch_move(&PATH, &mut contracts, &ev);
        last = ev;
    }
    let released = negotiator.touch_end(&mut contracts, &last);
    println!("  released: {released:?}");
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "understory_touch=debug,understory_gesture=debug".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    play("tap", &[(0.0, 0), (1.0, 40), (1.0, 90)]);
    play("long press", &[(0.0, 0), (2.0, 200), (2.0, 450), (2.0, 600)]);
    play(
        "drag",
        &[(0.0, 0), (4.0, 16), (12.0, 32), (30.0, 48), (60.0, 64), (70.0, 80)],
    );
}
