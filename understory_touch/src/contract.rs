// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The responder contract: the fixed vocabulary an element speaks to take part
//! in touch negotiation.
//!
//! ## Overview
//!
//! A contract is a set of optional callbacks keyed by a fixed list of names.
//! Five are **predicates** that return `bool`:
//!
//! - [`on_start_should_set_responder`](Responder::on_start_should_set_responder)
//! - [`on_start_should_set_responder_capture`](Responder::on_start_should_set_responder_capture)
//! - [`on_move_should_set_responder`](Responder::on_move_should_set_responder)
//! - [`on_move_should_set_responder_capture`](Responder::on_move_should_set_responder_capture)
//! - [`on_responder_termination_request`](Responder::on_responder_termination_request)
//!
//! Seven are **notifications**: grant, reject, start, move, end, release, terminate.
//!
//! Every callback receives the owning element explicitly as its first argument
//! and the current [`PressEvent`] as its second.
//!
//! ## Presence
//!
//! Which callbacks exist is declared by [`Responder::handlers`]. Callers must
//! only invoke a callback whose flag is present; the trait's default method
//! bodies are placeholders, not policy. [`Responder::ask`] and
//! [`Responder::notify`] perform the presence check for you.
//!
//! A contract with empty [`Handlers`] is a total no-op and never claims the
//! responder.
//!
//! ## Building contracts from closures
//!
//! ```
//! use kurbo::Point;
//! use understory_touch::contract::{
//!     Handlers, Notification, Predicate, Responder, ResponderContract,
//! };
//! use understory_touch::types::PressEvent;
//!
//! let mut contract = ResponderContract::<u32>::new()
//!     .predicate(Predicate::StartShouldSet, |_, _| true)
//!     .notification(Notification::Grant, |el, _| assert_eq!(*el, 4));
//!
//! assert_eq!(
//!     contract.handlers(),
//!     Handlers::START_SHOULD_SET | Handlers::GRANT
//! );
//!
//! let ev = PressEvent::new(4, Point::new(0.0, 0.0), 0);
//! assert_eq!(contract.ask(Predicate::StartShouldSet, &4, &ev), Some(true));
//! assert_eq!(contract.ask(Predicate::MoveShouldSet, &4, &ev), None);
//! contract.notify(Notification::Grant, &4, &ev);
//! ```

use alloc::boxed::Box;

use crate::types::{Phase, PressEvent, Trigger};

bitflags::bitflags! {
    /// Which contract callbacks a responder defines.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Handlers: u16 {
        /// `on_start_should_set_responder`.
        const START_SHOULD_SET         = 1 << 0;
        /// `on_start_should_set_responder_capture`.
        const START_SHOULD_SET_CAPTURE = 1 << 1;
        /// `on_move_should_set_responder`.
        const MOVE_SHOULD_SET          = 1 << 2;
        /// `on_move_should_set_responder_capture`.
        const MOVE_SHOULD_SET_CAPTURE  = 1 << 3;
        /// `on_responder_termination_request`.
        const TERMINATION_REQUEST      = 1 << 4;
        /// `on_responder_grant`.
        const GRANT                    = 1 << 5;
        /// `on_responder_reject`.
        const REJECT                   = 1 << 6;
        /// `on_responder_start`.
        const START                    = 1 << 7;
        /// `on_responder_move`.
        const MOVE                     = 1 << 8;
        /// `on_responder_end`.
        const END                      = 1 << 9;
        /// `on_responder_release`.
        const RELEASE                  = 1 << 10;
        /// `on_responder_terminate`.
        const TERMINATE                = 1 << 11;

        /// All predicates.
        const PREDICATES = Self::START_SHOULD_SET.bits()
            | Self::START_SHOULD_SET_CAPTURE.bits()
            | Self::MOVE_SHOULD_SET.bits()
            | Self::MOVE_SHOULD_SET_CAPTURE.bits()
            | Self::TERMINATION_REQUEST.bits();
        /// All lifecycle notifications.
        const NOTIFICATIONS = Self::GRANT.bits()
            | Self::REJECT.bits()
            | Self::START.bits()
            | Self::MOVE.bits()
            | Self::END.bits()
            | Self::RELEASE.bits()
            | Self::TERMINATE.bits();
    }
}

/// Names of the boolean contract callbacks.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Predicate {
    /// `on_start_should_set_responder`.
    StartShouldSet,
    /// `on_start_should_set_responder_capture`.
    StartShouldSetCapture,
    /// `on_move_should_set_responder`.
    MoveShouldSet,
    /// `on_move_should_set_responder_capture`.
    MoveShouldSetCapture,
    /// `on_responder_termination_request`.
    TerminationRequest,
}

impl Predicate {
    /// Every predicate, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::StartShouldSet,
        Self::StartShouldSetCapture,
        Self::MoveShouldSet,
        Self::MoveShouldSetCapture,
        Self::TerminationRequest,
    ];

    /// The should-set predicate consulted for a trigger in a phase.
    pub fn should_set(trigger: Trigger, phase: Phase) -> Self {
        match (trigger, phase) {
            (Trigger::Start, Phase::Capture) => Self::StartShouldSetCapture,
            (Trigger::Start, Phase::Bubble) => Self::StartShouldSet,
            (Trigger::Move, Phase::Capture) => Self::MoveShouldSetCapture,
            (Trigger::Move, Phase::Bubble) => Self::MoveShouldSet,
        }
    }

    /// Presence flag for this predicate.
    pub fn flag(self) -> Handlers {
        match self {
            Self::StartShouldSet => Handlers::START_SHOULD_SET,
            Self::StartShouldSetCapture => Handlers::START_SHOULD_SET_CAPTURE,
            Self::MoveShouldSet => Handlers::MOVE_SHOULD_SET,
            Self::MoveShouldSetCapture => Handlers::MOVE_SHOULD_SET_CAPTURE,
            Self::TerminationRequest => Handlers::TERMINATION_REQUEST,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Names of the lifecycle notifications.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Notification {
    /// `on_responder_grant`.
    Grant,
    /// `on_responder_reject`.
    Reject,
    /// `on_responder_start`.
    Start,
    /// `on_responder_move`.
    Move,
    /// `on_responder_end`.
    End,
    /// `on_responder_release`.
    Release,
    /// `on_responder_terminate`.
    Terminate,
}

impl Notification {
    /// Every notification, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Grant,
        Self::Reject,
        Self::Start,
        Self::Move,
        Self::End,
        Self::Release,
        Self::Terminate,
    ];

    /// Presence flag for this notification.
    pub fn flag(self) -> Handlers {
        match self {
            Self::Grant => Handlers::GRANT,
            Self::Reject => Handlers::REJECT,
            Self::Start => Handlers::START,
            Self::Move => Handlers::MOVE,
            Self::End => Handlers::END,
            Self::Release => Handlers::RELEASE,
            Self::Terminate => Handlers::TERMINATE,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A participant in touch negotiation.
///
/// Implementors declare which callbacks they define through [`handlers`](Self::handlers)
/// and override the corresponding methods. Methods whose flag is absent are
/// never called through [`ask`](Self::ask) or [`notify`](Self::notify).
pub trait Responder<K> {
    /// Callbacks this responder defines.
    fn handlers(&self) -> Handlers;

    /// Claim the responder on touch start (bubble phase).
    fn on_start_should_set_responder(&mut self, _element: &K, _event: &PressEvent<K>) -> bool {
        false
    }

    /// Claim the responder on touch start (capture phase).
    fn on_start_should_set_responder_capture(
        &mut self,
        _element: &K,
        _event: &PressEvent<K>,
    ) -> bool {
        false
    }

    /// Claim the responder on touch move (bubble phase).
    fn on_move_should_set_responder(&mut self, _element: &K, _event: &PressEvent<K>) -> bool {
        false
    }

    /// Claim the responder on touch move (capture phase).
    fn on_move_should_set_responder_capture(
        &mut self,
        _element: &K,
        _event: &PressEvent<K>,
    ) -> bool {
        false
    }

    /// Agree to give up responder status.
    fn on_responder_termination_request(&mut self, _element: &K, _event: &PressEvent<K>) -> bool {
        true
    }

    /// This element became the responder.
    fn on_responder_grant(&mut self, _element: &K, _event: &PressEvent<K>) {}

    /// This element asked for the responder and was refused.
    fn on_responder_reject(&mut self, _element: &K, _event: &PressEvent<K>) {}

    /// A touch started while this element is the responder.
    fn on_responder_start(&mut self, _element: &K, _event: &PressEvent<K>) {}

    /// The pointer moved while this element is the responder.
    fn on_responder_move(&mut self, _element: &K, _event: &PressEvent<K>) {}

    /// A touch ended while this element is the responder.
    fn on_responder_end(&mut self, _element: &K, _event: &PressEvent<K>) {}

    /// The touch sequence finished normally.
    fn on_responder_release(&mut self, _element: &K, _event: &PressEvent<K>) {}

    /// Responder status was taken away or the sequence was cancelled.
    fn on_responder_terminate(&mut self, _element: &K, _event: &PressEvent<K>) {}

    /// Evaluate a predicate if it is defined.
    ///
    /// Returns `None` when the predicate is absent.
    fn ask(&mut self, which: Predicate, element: &K, event: &PressEvent<K>) -> Option<bool> {
        if !self.handlers().contains(which.flag()) {
            return None;
        }
        Some(match which {
            Predicate::StartShouldSet => self.on_start_should_set_responder(element, event),
            Predicate::StartShouldSetCapture => {
                self.on_start_should_set_responder_capture(element, event)
            }
            Predicate::MoveShouldSet => self.on_move_should_set_responder(element, event),
            Predicate::MoveShouldSetCapture => {
                self.on_move_should_set_responder_capture(element, event)
            }
            Predicate::TerminationRequest => self.on_responder_termination_request(element, event),
        })
    }

    /// Deliver a notification if it is defined.
    ///
    /// Returns whether a callback ran.
    fn notify(&mut self, which: Notification, element: &K, event: &PressEvent<K>) -> bool {
        if !self.handlers().contains(which.flag()) {
            return false;
        }
        match which {
            Notification::Grant => self.on_responder_grant(element, event),
            Notification::Reject => self.on_responder_reject(element, event),
            Notification::Start => self.on_responder_start(element, event),
            Notification::Move => self.on_responder_move(element, event),
            Notification::End => self.on_responder_end(element, event),
            Notification::Release => self.on_responder_release(element, event),
            Notification::Terminate => self.on_responder_terminate(element, event),
        }
        true
    }
}

impl<K, R: Responder<K> + ?Sized> Responder<K> for Box<R> {
    fn handlers(&self) -> Handlers {
        (**self).handlers()
    }

    fn on_start_should_set_responder(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        (**self).on_start_should_set_responder(element, event)
    }

    fn on_start_should_set_responder_capture(
        &mut self,
        element: &K,
        event: &PressEvent<K>,
    ) -> bool {
        (**self).on_start_should_set_responder_capture(element, event)
    }

    fn on_move_should_set_responder(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        (**self).on_move_should_set_responder(element, event)
    }

    fn on_move_should_set_responder_capture(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        (**self).on_move_should_set_responder_capture(element, event)
    }

    fn on_responder_termination_request(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        (**self).on_responder_termination_request(element, event)
    }

    fn on_responder_grant(&mut self, element: &K, event: &PressEvent<K>) {
        (**self).on_responder_grant(element, event);
    }

    fn on_responder_reject(&mut self, element: &K, event: &PressEvent<K>) {
        (**self).on_responder_reject(element, event);
    }

    fn on_responder_start(&mut self, element: &K, event: &PressEvent<K>) {
        (**self).on_responder_start(element, event);
    }

    fn on_responder_move(&mut self, element: &K, event: &PressEvent<K>) {
        (**self).on_responder_move(element, event);
    }

    fn on_responder_end(&mut self, element: &K, event: &PressEvent<K>) {
        (**self).on_responder_end(element, event);
    }

    fn on_responder_release(&mut self, element: &K, event: &PressEvent<K>) {
        (**self).on_responder_release(element, event);
    }

    fn on_responder_terminate(&mut self, element: &K, event: &PressEvent<K>) {
        (**self).on_responder_terminate(element, event);
    }
}

/// Boxed predicate callback.
pub type PredicateFn<K> = Box<dyn FnMut(&K, &PressEvent<K>) -> bool>;

/// Boxed notification callback.
pub type NotificationFn<K> = Box<dyn FnMut(&K, &PressEvent<K>)>;

/// A responder contract assembled from closures, one optional slot per name.
pub struct ResponderContract<K> {
    predicates: [Option<PredicateFn<K>>; 5],
    notifications: [Option<NotificationFn<K>>; 7],
}

impl<K> core::fmt::Debug for ResponderContract<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResponderContract")
            .field("handlers", &self.handlers())
            .finish_non_exhaustive()
    }
}

impl<K> Default for ResponderContract<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> ResponderContract<K> {
    /// An empty contract: a total no-op.
    pub fn new() -> Self {
        Self {
            predicates: [None, None, None, None, None],
            notifications: [None, None, None, None, None, None, None],
        }
    }

    /// Set the callback for a predicate, replacing any previous one.
    #[must_use]
    pub fn predicate(
        mut self,
        which: Predicate,
        f: impl FnMut(&K, &PressEvent<K>) -> bool + 'static,
    ) -> Self {
        self.predicates[which.index()] = Some(Box::new(f));
        self
    }

    /// Set the callback for a notification, replacing any previous one.
    #[must_use]
    pub fn notification(
        mut self,
        which: Notification,
        f: impl FnMut(&K, &PressEvent<K>) + 'static,
    ) -> Self {
        self.notifications[which.index()] = Some(Box::new(f));
        self
    }

    fn call_predicate(&mut self, which: Predicate, element: &K, event: &PressEvent<K>) -> bool {
        match &mut self.predicates[which.index()] {
            Some(f) => f(element, event),
            // Only reachable by calling a trait method directly on an absent slot.
            None => matches!(which, Predicate::TerminationRequest),
        }
    }

    fn call_notification(&mut self, which: Notification, element: &K, event: &PressEvent<K>) {
        if let Some(f) = &mut self.notifications[which.index()] {
            f(element, event);
        }
    }
}

impl<K> Responder<K> for ResponderContract<K> {
    fn handlers(&self) -> Handlers {
        let mut out = Handlers::empty();
        for p in Predicate::ALL {
            if self.predicates[p.index()].is_some() {
                out |= p.flag();
            }
        }
        for n in Notification::ALL {
            if self.notifications[n.index()].is_some() {
                out |= n.flag();
            }
        }
        out
    }

    fn on_start_should_set_responder(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        self.call_predicate(Predicate::StartShouldSet, element, event)
    }

    fn on_start_should_set_responder_capture(
        &mut self,
        element: &K,
        event: &PressEvent<K>,
    ) -> bool {
        self.call_predicate(Predicate::StartShouldSetCapture, element, event)
    }

    fn on_move_should_set_responder(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        self.call_predicate(Predicate::MoveShouldSet, element, event)
    }

    fn on_move_should_set_responder_capture(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        self.call_predicate(Predicate::MoveShouldSetCapture, element, event)
    }

    fn on_responder_termination_request(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        self.call_predicate(Predicate::TerminationRequest, element, event)
    }

    fn on_responder_grant(&mut self, element: &K, event: &PressEvent<K>) {
        self.call_notification(Notification::Grant, element, event);
    }

    fn on_responder_reject(&mut self, element: &K, event: &PressEvent<K>) {
        self.call_notification(Notification::Reject, element, event);
    }

    fn on_responder_start(&mut self, element: &K, event: &PressEvent<K>) {
        self.call_notification(Notification::Start, element, event);
    }

    fn on_responder_move(&mut self, element: &K, event: &PressEvent<K>) {
        self.call_notification(Notification::Move, element, event);
    }

    fn on_responder_end(&mut self, element: &K, event: &PressEvent<K>) {
        self.call_notification(Notification::End, element, event);
    }

    fn on_responder_release(&mut self, element: &K, event: &PressEvent<K>) {
        self.call_notification(Notification::Release, element, event);
    }

    fn on_responder_terminate(&mut self, element: &K, event: &PressEvent<K>) {
        self.call_notification(Notification::Terminate, element, event);
    }
}
