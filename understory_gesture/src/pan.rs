// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan recognizer: drag detection with translation and velocity.
//!
//! ## Behavior
//!
//! - With no handler or override configured, the recognizer defines no
//!   callbacks at all.
//! - Touch start: claims the responder eagerly (unless
//!   `on_start_should_set_pan_responder` decides), so moves are visible before
//!   the distance threshold is crossed.
//! - Grant: records the start position, zeroes velocity, and marks the
//!   recognizer as holding the responder.
//! - Move: recomputes translation from the start position and velocity from
//!   the previous sample. Velocity is only updated when time advanced, so
//!   duplicate timestamps never divide by zero. Once the translation reaches
//!   `minimum_pan_distance` the pan starts (`on_pan_start`); every later move
//!   reports `on_pan_move`.
//! - Move election: claims only while holding the responder and past the
//!   threshold, so jitter never contests responder status.
//! - Release / terminate: a started pan reports `on_pan_end` and then the
//!   matching override. A grant that never crossed the threshold ends
//!   silently.
//! - Termination request: refused while panning, unless
//!   `on_pan_responder_termination_request` decides. An in-progress drag is
//!   not silently stolen.
//!
//! ## Usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use kurbo::Point;
//! use understory_gesture::pan::{PanConfig, PanRecognizer};
//! use understory_touch::contract::{Notification, Responder};
//! use understory_touch::types::PressEvent;
//!
//! let moves = Rc::new(RefCell::new(Vec::new()));
//! let m = moves.clone();
//! let mut pan = PanRecognizer::new(
//!     PanConfig::new().on_pan_move(move |_, e| m.borrow_mut().push(e.translation.x)),
//! );
//!
//! let ev = |x, t| PressEvent::new(1_u32, Point::new(x, 0.0), t);
//! pan.notify(Notification::Grant, &1, &ev(0.0, 0));
//! pan.notify(Notification::Move, &1, &ev(12.0, 16)); // crosses the threshold: pan starts
//! pan.notify(Notification::Move, &1, &ev(20.0, 32));
//! pan.notify(Notification::Release, &1, &ev(20.0, 48));
//!
//! assert_eq!(*moves.borrow(), [20.0]);
//! ```

use alloc::boxed::Box;
use kurbo::{Point, Vec2};

use understory_touch::contract::{Handlers, Responder};
use understory_touch::types::{PanEvent, PressEvent};

/// Default distance the pointer must travel before a pan starts.
pub const DEFAULT_MINIMUM_PAN_DISTANCE: f64 = 10.0;

/// Boxed pan notification handler.
pub type PanHandler<K> = Box<dyn FnMut(&K, &PanEvent<K>)>;

/// Boxed pan predicate override.
pub type PanPredicate<K> = Box<dyn FnMut(&K, &PanEvent<K>) -> bool>;

/// Pan recognizer configuration.
pub struct PanConfig<K> {
    /// Distance from the grant position at which the pan starts.
    pub minimum_pan_distance: f64,
    /// Fired once when the threshold is crossed.
    pub on_pan_start: Option<PanHandler<K>>,
    /// Fired on every move after the pan started.
    pub on_pan_move: Option<PanHandler<K>>,
    /// Fired when a started pan is released or terminated.
    pub on_pan_end: Option<PanHandler<K>>,
    /// Overrides the touch-start claim.
    pub on_start_should_set_pan_responder: Option<PanPredicate<K>>,
    /// Overrides the move claim.
    pub on_move_should_set_pan_responder: Option<PanPredicate<K>>,
    /// Called on grant.
    pub on_pan_responder_grant: Option<PanHandler<K>>,
    /// Called when a claim is refused.
    pub on_pan_responder_reject: Option<PanHandler<K>>,
    /// Called after `on_pan_end` on release.
    pub on_pan_responder_release: Option<PanHandler<K>>,
    /// Called after `on_pan_end` on terminate.
    pub on_pan_responder_terminate: Option<PanHandler<K>>,
    /// Overrides the termination answer.
    pub on_pan_responder_termination_request: Option<PanPredicate<K>>,
}

impl<K> core::fmt::Debug for PanConfig<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PanConfig")
            .field("minimum_pan_distance", &self.minimum_pan_distance)
            .field("is_empty", &self.is_empty())
            .finish_non_exhaustive()
    }
}

impl<K> Default for PanConfig<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> PanConfig<K> {
    /// No handlers, default threshold.
    pub fn new() -> Self {
        Self {
            minimum_pan_distance: DEFAULT_MINIMUM_PAN_DISTANCE,
            on_pan_start: None,
            on_pan_move: None,
            on_pan_end: None,
            on_start_should_set_pan_responder: None,
            on_move_should_set_pan_responder: None,
            on_pan_responder_grant: None,
            on_pan_responder_reject: None,
            on_pan_responder_release: None,
            on_pan_responder_terminate: None,
            on_pan_responder_termination_request: None,
        }
    }

    /// Set the distance at which a pan starts.
    #[must_use]
    pub fn with_minimum_pan_distance(mut self, distance: f64) -> Self {
        self.minimum_pan_distance = distance;
        self
    }

    /// Set the pan-start handler.
    #[must_use]
    pub fn on_pan_start(mut self, f: impl FnMut(&K, &PanEvent<K>) + 'static) -> Self {
        self.on_pan_start = Some(Box::new(f));
        self
    }

    /// Set the pan-move handler.
    #[must_use]
    pub fn on_pan_move(mut self, f: impl FnMut(&K, &PanEvent<K>) + 'static) -> Self {
        self.on_pan_move = Some(Box::new(f));
        self
    }

    /// Set the pan-end handler.
    #[must_use]
    pub fn on_pan_end(mut self, f: impl FnMut(&K, &PanEvent<K>) + 'static) -> Self {
        self.on_pan_end = Some(Box::new(f));
        self
    }

    /// Override the touch-start claim.
    #[must_use]
    pub fn on_start_should_set_pan_responder(
        mut self,
        f: impl FnMut(&K, &PanEvent<K>) -> bool + 'static,
    ) -> Self {
        self.on_start_should_set_pan_responder = Some(Box::new(f));
        self
    }

    /// Override the move claim.
    #[must_use]
    pub fn on_move_should_set_pan_responder(
        mut self,
        f: impl FnMut(&K, &PanEvent<K>) -> bool + 'static,
    ) -> Self {
        self.on_move_should_set_pan_responder = Some(Box::new(f));
        self
    }

    /// Set the grant override.
    #[must_use]
    pub fn on_pan_responder_grant(mut self, f: impl FnMut(&K, &PanEvent<K>) + 'static) -> Self {
        self.on_pan_responder_grant = Some(Box::new(f));
        self
    }

    /// Set the reject override.
    #[must_use]
    pub fn on_pan_responder_reject(mut self, f: impl FnMut(&K, &PanEvent<K>) + 'static) -> Self {
        self.on_pan_responder_reject = Some(Box::new(f));
        self
    }

    /// Set the release override.
    #[must_use]
    pub fn on_pan_responder_release(mut self, f: impl FnMut(&K, &PanEvent<K>) + 'static) -> Self {
        self.on_pan_responder_release = Some(Box::new(f));
        self
    }

    /// Set the terminate override.
    #[must_use]
    pub fn on_pan_responder_terminate(mut self, f: impl FnMut(&K, &PanEvent<K>) + 'static) -> Self {
        self.on_pan_responder_terminate = Some(Box::new(f));
        self
    }

    /// Override the termination answer.
    #[must_use]
    pub fn on_pan_responder_termination_request(
        mut self,
        f: impl FnMut(&K, &PanEvent<K>) -> bool + 'static,
    ) -> Self {
        self.on_pan_responder_termination_request = Some(Box::new(f));
        self
    }

    /// Whether no handler or override is configured.
    pub fn is_empty(&self) -> bool {
        self.on_pan_start.is_none()
            && self.on_pan_move.is_none()
            && self.on_pan_end.is_none()
            && self.on_start_should_set_pan_responder.is_none()
            && self.on_move_should_set_pan_responder.is_none()
            && self.on_pan_responder_grant.is_none()
            && self.on_pan_responder_reject.is_none()
            && self.on_pan_responder_release.is_none()
            && self.on_pan_responder_terminate.is_none()
            && self.on_pan_responder_termination_request.is_none()
    }
}

/// Per-element pan tracking state.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct PanState {
    is_panning: bool,
    has_responder: bool,
    start: Point,
    last: Point,
    last_time: u64,
    velocity: Vec2,
}

impl PanState {
    fn granted(event_page: Point, timestamp: u64) -> Self {
        Self {
            is_panning: false,
            has_responder: true,
            start: event_page,
            last: event_page,
            last_time: timestamp,
            velocity: Vec2::ZERO,
        }
    }

    fn translation(&self, page: Point) -> Vec2 {
        if self.has_responder {
            page - self.start
        } else {
            Vec2::ZERO
        }
    }

    /// Record a new position and return the resulting translation and velocity.
    fn sample(&mut self, page: Point, timestamp: u64) -> (Vec2, Vec2) {
        if timestamp > self.last_time {
            let dt = (timestamp - self.last_time) as f64;
            self.velocity = (page - self.last) / dt;
        }
        self.last = page;
        self.last_time = timestamp;
        (page - self.start, self.velocity)
    }
}

fn reached(translation: Vec2, minimum: f64) -> bool {
    translation.hypot2() >= minimum * minimum
}

fn fire<K>(handler: &mut Option<PanHandler<K>>, element: &K, event: &PanEvent<K>) {
    if let Some(f) = handler {
        f(element, event);
    }
}

/// A responder contract recognizing drags.
pub struct PanRecognizer<K> {
    config: PanConfig<K>,
    state: PanState,
}

impl<K> core::fmt::Debug for PanRecognizer<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PanRecognizer")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Finish {
    Release,
    Terminate,
}

impl<K: Clone> PanRecognizer<K> {
    /// Build a recognizer from its configuration.
    pub fn new(config: PanConfig<K>) -> Self {
        Self {
            config,
            state: PanState::default(),
        }
    }

    /// Whether the pan threshold has been crossed in the current sequence.
    pub fn is_panning(&self) -> bool {
        self.state.is_panning
    }

    /// Whether this recognizer was granted the responder and not yet released.
    pub fn has_responder(&self) -> bool {
        self.state.has_responder
    }

    /// Current event without recording a sample.
    fn snapshot(&self, event: &PressEvent<K>) -> PanEvent<K> {
        PanEvent {
            press: event.clone(),
            translation: self.state.translation(event.page),
            velocity: if self.state.has_responder {
                self.state.velocity
            } else {
                Vec2::ZERO
            },
        }
    }

    /// Record `event` and return it with updated kinematics.
    fn advance(&mut self, event: &PressEvent<K>) -> PanEvent<K> {
        let (translation, velocity) = self.state.sample(event.page, event.timestamp);
        PanEvent {
            press: event.clone(),
            translation,
            velocity,
        }
    }

    fn finish(&mut self, element: &K, event: &PressEvent<K>, how: Finish) {
        if self.state.is_panning {
            let pan = self.advance(event);
            tracing::trace!(?how, x = pan.translation.x, y = pan.translation.y, "pan ended");
            fire(&mut self.config.on_pan_end, element, &pan);
            let hook = match how {
                Finish::Release => &mut self.config.on_pan_responder_release,
                Finish::Terminate => &mut self.config.on_pan_responder_terminate,
            };
            fire(hook, element, &pan);
        }
        self.state.is_panning = false;
        self.state.has_responder = false;
    }
}

impl<K: Clone> Responder<K> for PanRecognizer<K> {
    fn handlers(&self) -> Handlers {
        if self.config.is_empty() {
            return Handlers::empty();
        }
        let mut out = Handlers::START_SHOULD_SET
            | Handlers::MOVE_SHOULD_SET
            | Handlers::TERMINATION_REQUEST
            | Handlers::GRANT
            | Handlers::MOVE
            | Handlers::RELEASE
            | Handlers::TERMINATE;
        if self.config.on_pan_responder_reject.is_some() {
            out |= Handlers::REJECT;
        }
        out
    }

    fn on_start_should_set_responder(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        let pan = self.snapshot(event);
        match &mut self.config.on_start_should_set_pan_responder {
            Some(f) => f(element, &pan),
            None => true,
        }
    }

    fn on_move_should_set_responder(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        let pan = self.snapshot(event);
        match &mut self.config.on_move_should_set_pan_responder {
            Some(f) => f(element, &pan),
            None => {
                self.state.has_responder
                    && reached(pan.translation, self.config.minimum_pan_distance)
            }
        }
    }

    fn on_responder_termination_request(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        let pan = self.snapshot(event);
        match &mut self.config.on_pan_responder_termination_request {
            Some(f) => f(element, &pan),
            None => !self.state.is_panning,
        }
    }

    fn on_responder_grant(&mut self, element: &K, event: &PressEvent<K>) {
        self.state = PanState::granted(event.page, event.timestamp);
        let pan = self.snapshot(event);
        fire(&mut self.config.on_pan_responder_grant, element, &pan);
    }

    fn on_responder_reject(&mut self, element: &K, event: &PressEvent<K>) {
        let pan = self.snapshot(event);
        fire(&mut self.config.on_pan_responder_reject, element, &pan);
    }

    fn on_responder_move(&mut self, element: &K, event: &PressEvent<K>) {
        if !self.state.has_responder {
            return;
        }
        let pan = self.advance(event);
        if self.state.is_panning {
            fire(&mut self.config.on_pan_move, element, &pan);
        } else if reached(pan.translation, self.config.minimum_pan_distance) {
            self.state.is_panning = true;
            tracing::debug!(x = pan.translation.x, y = pan.translation.y, "pan started");
            fire(&mut self.config.on_pan_start, element, &pan);
        }
    }

    fn on_responder_release(&mut self, element: &K, event: &PressEvent<K>) {
        self.finish(element, event, Finish::Release);
    }

    fn on_responder_terminate(&mut self, element: &K, event: &PressEvent<K>) {
        self.finish(element, event, Finish::Terminate);
    }
}
