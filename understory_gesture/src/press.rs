// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press recognizer: press-in, press-out, tap, and long-press.
//!
//! ## Behavior
//!
//! - With none of `on_press`, `on_press_in`, `on_press_out`, `on_long_press`
//!   configured, the recognizer defines no callbacks at all.
//! - Otherwise it always claims the responder on touch start and always agrees
//!   to give it up on a termination request. Presses never block another
//!   gesture from taking over.
//! - Grant fires `on_press_in`, mints a fresh token, and, when
//!   `on_long_press` is configured, schedules a deferred check after
//!   `delay_long_press`. The check fires `on_long_press` only if its token is
//!   still the current one.
//! - Release clears the token, fires `on_press_out`, and then `on_press`
//!   unless the long-press already fired.
//! - Terminate clears the token and fires `on_press_out` only.
//!
//! A press and a long-press are mutually exclusive outcomes of one sequence.
//! A timer left over from an earlier sequence (or outliving the element)
//! finds a different token, or no recognizer, and does nothing.
//!
//! ## Usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use kurbo::Point;
//! use understory_gesture::press::{PressConfig, PressRecognizer};
//! use understory_gesture::scheduler::Scheduler;
//! use understory_touch::contract::{Notification, Responder};
//! use understory_touch::types::PressEvent;
//!
//! let scheduler = Scheduler::new();
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let (a, b) = (log.clone(), log.clone());
//! let mut press = PressRecognizer::new(
//!     PressConfig::new()
//!         .on_press(move |_, _| a.borrow_mut().push("press"))
//!         .on_long_press(move |_, _| b.borrow_mut().push("long")),
//!     &scheduler,
//! );
//!
//! let ev = |t| PressEvent::new(1_u32, Point::new(0.0, 0.0), t);
//! press.notify(Notification::Grant, &1, &ev(0));
//! scheduler.advance_to(600);
//! press.notify(Notification::Release, &1, &ev(600));
//!
//! assert_eq!(*log.borrow(), ["long"]);
//! ```

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::num::NonZeroU64;

use understory_touch::contract::{Handlers, Responder};
use understory_touch::types::PressEvent;

use crate::scheduler::Scheduler;

/// Default long-press delay in milliseconds.
pub const DEFAULT_LONG_PRESS_DELAY: u64 = 500;

/// Boxed press handler.
pub type PressHandler<K> = Box<dyn FnMut(&K, &PressEvent<K>)>;

/// Press recognizer configuration.
pub struct PressConfig<K> {
    /// Fired on release when the long-press did not fire.
    pub on_press: Option<PressHandler<K>>,
    /// Fired on grant.
    pub on_press_in: Option<PressHandler<K>>,
    /// Fired on release and on terminate.
    pub on_press_out: Option<PressHandler<K>>,
    /// Fired once `delay_long_press` elapses while the press is held.
    pub on_long_press: Option<PressHandler<K>>,
    /// Delay before a held press becomes a long-press (milliseconds).
    pub delay_long_press: u64,
}

impl<K> core::fmt::Debug for PressConfig<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PressConfig")
            .field("on_press", &self.on_press.is_some())
            .field("on_press_in", &self.on_press_in.is_some())
            .field("on_press_out", &self.on_press_out.is_some())
            .field("on_long_press", &self.on_long_press.is_some())
            .field("delay_long_press", &self.delay_long_press)
            .finish()
    }
}

impl<K> Default for PressConfig<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> PressConfig<K> {
    /// No handlers, default long-press delay.
    pub fn new() -> Self {
        Self {
            on_press: None,
            on_press_in: None,
            on_press_out: None,
            on_long_press: None,
            delay_long_press: DEFAULT_LONG_PRESS_DELAY,
        }
    }

    /// Set the tap handler.
    #[must_use]
    pub fn on_press(mut self, f: impl FnMut(&K, &PressEvent<K>) + 'static) -> Self {
        self.on_press = Some(Box::new(f));
        self
    }

    /// Set the press-in handler.
    #[must_use]
    pub fn on_press_in(mut self, f: impl FnMut(&K, &PressEvent<K>) + 'static) -> Self {
        self.on_press_in = Some(Box::new(f));
        self
    }

    /// Set the press-out handler.
    #[must_use]
    pub fn on_press_out(mut self, f: impl FnMut(&K, &PressEvent<K>) + 'static) -> Self {
        self.on_press_out = Some(Box::new(f));
        self
    }

    /// Set the long-press handler.
    #[must_use]
    pub fn on_long_press(mut self, f: impl FnMut(&K, &PressEvent<K>) + 'static) -> Self {
        self.on_long_press = Some(Box::new(f));
        self
    }

    /// Set the long-press delay in milliseconds.
    #[must_use]
    pub fn with_delay_long_press(mut self, delay: u64) -> Self {
        self.delay_long_press = delay;
        self
    }

    /// Whether no handler is configured.
    pub fn is_empty(&self) -> bool {
        self.on_press.is_none()
            && self.on_press_in.is_none()
            && self.on_press_out.is_none()
            && self.on_long_press.is_none()
    }
}

/// Identity of one grant; a deferred long-press only fires for the current one.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Token(NonZeroU64);

/// State reachable from the deferred long-press task.
struct LongPress<K> {
    token: Option<Token>,
    timed_out: bool,
    on_long_press: Option<PressHandler<K>>,
}

/// A responder contract recognizing taps and long-presses.
pub struct PressRecognizer<K> {
    on_press: Option<PressHandler<K>>,
    on_press_in: Option<PressHandler<K>>,
    on_press_out: Option<PressHandler<K>>,
    delay_long_press: u64,
    handlers: Handlers,
    minted: u64,
    long_press: Rc<RefCell<LongPress<K>>>,
    scheduler: Scheduler,
}

impl<K> core::fmt::Debug for PressRecognizer<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let lp = self.long_press.borrow();
        f.debug_struct("PressRecognizer")
            .field("handlers", &self.handlers)
            .field("delay_long_press", &self.delay_long_press)
            .field("pressed", &lp.token.is_some())
            .field("timed_out", &lp.timed_out)
            .finish_non_exhaustive()
    }
}

impl<K: Clone + 'static> PressRecognizer<K> {
    /// Build a recognizer whose long-press timers run on `scheduler`.
    pub fn new(config: PressConfig<K>, scheduler: &Scheduler) -> Self {
        let handlers = if config.is_empty() {
            Handlers::empty()
        } else {
            Handlers::START_SHOULD_SET
                | Handlers::TERMINATION_REQUEST
                | Handlers::GRANT
                | Handlers::RELEASE
                | Handlers::TERMINATE
        };
        Self {
            on_press: config.on_press,
            on_press_in: config.on_press_in,
            on_press_out: config.on_press_out,
            delay_long_press: config.delay_long_press,
            handlers,
            minted: 0,
            long_press: Rc::new(RefCell::new(LongPress {
                token: None,
                timed_out: false,
                on_long_press: config.on_long_press,
            })),
            scheduler: scheduler.clone(),
        }
    }

    /// Whether a press is currently held.
    pub fn is_pressed(&self) -> bool {
        self.long_press.borrow().token.is_some()
    }

    /// Whether the long-press fired during the current or last sequence.
    pub fn timed_out(&self) -> bool {
        self.long_press.borrow().timed_out
    }

    fn mint(&mut self) -> Token {
        self.minted += 1;
        Token(NonZeroU64::new(self.minted).unwrap_or(NonZeroU64::MIN))
    }

    /// Clear the token; returns whether the long-press already fired.
    fn end_press(&mut self) -> bool {
        let mut lp = self.long_press.borrow_mut();
        if lp.token.is_some() {
            lp.token = None;
        }
        lp.timed_out
    }
}

fn fire<K>(handler: &mut Option<PressHandler<K>>, element: &K, event: &PressEvent<K>) {
    if let Some(f) = handler {
        f(element, event);
    }
}

/// Deferred long-press check.
fn long_press_due<K>(
    long_press: &Weak<RefCell<LongPress<K>>>,
    token: Token,
    element: &K,
    event: &PressEvent<K>,
) {
    let Some(long_press) = long_press.upgrade() else {
        tracing::trace!("long-press timer outlived its element");
        return;
    };
    let handler = {
        let mut lp = long_press.borrow_mut();
        if lp.token != Some(token) {
            tracing::trace!(token = token.0.get(), "stale long-press timer discarded");
            return;
        }
        lp.timed_out = true;
        lp.on_long_press.take()
    };
    // Run the handler without holding the borrow so it may re-enter the recognizer.
    if let Some(mut f) = handler {
        f(element, event);
        let mut lp = long_press.borrow_mut();
        if lp.on_long_press.is_none() {
            lp.on_long_press = Some(f);
        }
    }
}

impl<K: Clone + 'static> Responder<K> for PressRecognizer<K> {
    fn handlers(&self) -> Handlers {
        self.handlers
    }

    fn on_start_should_set_responder(&mut self, _element: &K, _event: &PressEvent<K>) -> bool {
        true
    }

    fn on_responder_termination_request(&mut self, _element: &K, _event: &PressEvent<K>) -> bool {
        true
    }

    fn on_responder_grant(&mut self, element: &K, event: &PressEvent<K>) {
        fire(&mut self.on_press_in, element, event);
        let token = self.mint();
        let has_long_press = {
            let mut lp = self.long_press.borrow_mut();
            lp.token = Some(token);
            lp.timed_out = false;
            lp.on_long_press.is_some()
        };
        if has_long_press {
            let weak = Rc::downgrade(&self.long_press);
            let element = element.clone();
            let event = event.clone();
            self.scheduler.schedule(self.delay_long_press, move || {
                long_press_due(&weak, token, &element, &event);
            });
        }
    }

    fn on_responder_release(&mut self, element: &K, event: &PressEvent<K>) {
        let timed_out = self.end_press();
        fire(&mut self.on_press_out, element, event);
        if !timed_out {
            fire(&mut self.on_press, element, event);
        }
    }

    fn on_responder_terminate(&mut self, element: &K, event: &PressEvent<K>) {
        self.end_press();
        fire(&mut self.on_press_out, element, event);
    }
}
