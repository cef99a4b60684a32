// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Merge algebra: combine several responder contracts installed on one element.
//!
//! ## Rules
//!
//! - The four should-set predicates are combined with logical OR over the parts
//!   that define them, short-circuiting in registration order.
//! - The termination request is combined with logical AND over the parts that
//!   define it, short-circuiting in registration order. Responder status may
//!   be taken away only if every interested part agrees.
//! - Notifications reach every part that defines them, in registration order.
//!   No part can suppress another.
//! - A predicate absent from every part is absent from the merge.
//!
//! [`Merged`] is itself a [`Responder`], so merges nest:
//! `merge([a, b, c])` behaves like `merge([a, merge([b, c])])`.
//!
//! ```
//! use kurbo::Point;
//! use understory_touch::contract::{Predicate, Responder, ResponderContract};
//! use understory_touch::merge::merge;
//! use understory_touch::types::PressEvent;
//!
//! let press = ResponderContract::<u32>::new()
//!     .predicate(Predicate::TerminationRequest, |_, _| true);
//! let drag = ResponderContract::<u32>::new()
//!     .predicate(Predicate::TerminationRequest, |_, _| false)
//!     .predicate(Predicate::MoveShouldSet, |_, _| true);
//!
//! let mut both = merge([Box::new(press) as Box<dyn Responder<u32>>, Box::new(drag)]);
//! let ev = PressEvent::new(1, Point::new(0.0, 0.0), 0);
//!
//! assert_eq!(both.ask(Predicate::TerminationRequest, &1, &ev), Some(false));
//! assert_eq!(both.ask(Predicate::MoveShouldSet, &1, &ev), Some(true));
//! assert_eq!(both.ask(Predicate::StartShouldSet, &1, &ev), None);
//! ```

use alloc::boxed::Box;
use smallvec::SmallVec;

use crate::contract::{Handlers, Notification, Predicate, Responder};
use crate::types::PressEvent;

/// Several responder contracts presented as one.
pub struct Merged<K> {
    // Most elements carry one or two recognizers.
    parts: SmallVec<[Box<dyn Responder<K>>; 2]>,
}

impl<K> core::fmt::Debug for Merged<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Merged")
            .field("parts", &self.parts.len())
            .field("handlers", &self.handlers())
            .finish()
    }
}

impl<K> Default for Merged<K> {
    fn default() -> Self {
        Self {
            parts: SmallVec::new(),
        }
    }
}

/// Merge contracts in registration order.
///
/// Parts that define no callbacks are dropped; they could never affect the
/// result.
pub fn merge<K>(parts: impl IntoIterator<Item = Box<dyn Responder<K>>>) -> Merged<K> {
    let mut out = Merged::default();
    for part in parts {
        out.push(part);
    }
    out
}

impl<K> Merged<K> {
    /// Append a contract after those already registered.
    pub fn push(&mut self, part: Box<dyn Responder<K>>) {
        if part.handlers().is_empty() {
            return;
        }
        self.parts.push(part);
    }

    /// Number of contributing parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether no part contributes any callback.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn any(&mut self, which: Predicate, element: &K, event: &PressEvent<K>) -> Option<bool> {
        let mut defined = false;
        for part in &mut self.parts {
            match part.ask(which, element, event) {
                Some(true) => return Some(true),
                Some(false) => defined = true,
                None => {}
            }
        }
        defined.then_some(false)
    }

    fn all(&mut self, which: Predicate, element: &K, event: &PressEvent<K>) -> Option<bool> {
        let mut defined = false;
        for part in &mut self.parts {
            match part.ask(which, element, event) {
                Some(false) => return Some(false),
                Some(true) => defined = true,
                None => {}
            }
        }
        defined.then_some(true)
    }

    fn each(&mut self, which: Notification, element: &K, event: &PressEvent<K>) {
        for part in &mut self.parts {
            part.notify(which, element, event);
        }
    }
}

impl<K> Responder<K> for Merged<K> {
    fn handlers(&self) -> Handlers {
        self.parts
            .iter()
            .fold(Handlers::empty(), |acc, p| acc | p.handlers())
    }

    fn on_start_should_set_responder(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        self.any(Predicate::StartShouldSet, element, event)
            .unwrap_or(false)
    }

    fn on_start_should_set_responder_capture(
        &mut self,
        element: &K,
        event: &PressEvent<K>,
    ) -> bool {
        self.any(Predicate::StartShouldSetCapture, element, event)
            .unwrap_or(false)
    }

    fn on_move_should_set_responder(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        self.any(Predicate::MoveShouldSet, element, event)
            .unwrap_or(false)
    }

    fn on_move_should_set_responder_capture(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        self.any(Predicate::MoveShouldSetCapture, element, event)
            .unwrap_or(false)
    }

    fn on_responder_termination_request(&mut self, element: &K, event: &PressEvent<K>) -> bool {
        self.all(Predicate::TerminationRequest, element, event)
            .unwrap_or(true)
    }

    fn on_responder_grant(&mut self, element: &K, event: &PressEvent<K>) {
        self.each(Notification::Grant, element, event);
    }

    fn on_responder_reject(&mut self, element: &K, event: &PressEvent<K>) {
        self.each(Notification::Reject, element, event);
    }

    fn on_responder_start(&mut self, element: &K, event: &PressEvent<K>) {
        self.each(Notification::Start, element, event);
    }

    fn on_responder_move(&mut self, element: &K, event: &PressEvent<K>) {
        self.each(Notification::Move, element, event);
    }

    fn on_responder_end(&mut self, element: &K, event: &PressEvent<K>) {
        self.each(Notification::End, element, event);
    }

    fn on_responder_release(&mut self, element: &K, event: &PressEvent<K>) {
        self.each(Notification::Release, element, event);
    }

    fn on_responder_terminate(&mut self, element: &K, event: &PressEvent<K>) {
        self.each(Notification::Terminate, element, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ResponderContract;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use kurbo::Point;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn ev() -> PressEvent<u32> {
        PressEvent::new(1, Point::new(0.0, 0.0), 0)
    }

    fn boxed(c: ResponderContract<u32>) -> Box<dyn Responder<u32>> {
        Box::new(c)
    }

    // A contract that logs its name on every predicate call and notification.
    fn logging(
        name: &'static str,
        log: &Log,
        start: bool,
        release: bool,
    ) -> ResponderContract<u32> {
        let (a, b, c) = (log.clone(), log.clone(), log.clone());
        ResponderContract::new()
            .predicate(Predicate::StartShouldSet, move |_, _| {
                a.borrow_mut().push(name);
                start
            })
            .predicate(Predicate::TerminationRequest, move |_, _| {
                b.borrow_mut().push(name);
                release
            })
            .notification(Notification::Grant, move |_, _| c.borrow_mut().push(name))
    }

    #[test]
    fn merge_of_nothing_is_noop() {
        let mut m = merge::<u32>([]);
        assert!(m.is_empty());
        assert!(m.handlers().is_empty());
        assert_eq!(m.ask(Predicate::StartShouldSet, &1, &ev()), None);
        assert!(!m.notify(Notification::Grant, &1, &ev()));
    }

    #[test]
    fn empty_parts_are_dropped() {
        let m = merge([
            boxed(ResponderContract::new()),
            boxed(ResponderContract::new().notification(Notification::End, |_, _| {})),
        ]);
        assert_eq!(m.len(), 1);
        assert_eq!(m.handlers(), Handlers::END);
    }

    #[test]
    fn should_set_is_short_circuit_or() {
        let log: Log = Rc::default();
        let mut m = merge([
            boxed(logging("a", &log, false, true)),
            boxed(logging("b", &log, true, true)),
            boxed(logging("c", &log, true, true)),
        ]);
        assert_eq!(m.ask(Predicate::StartShouldSet, &1, &ev()), Some(true));
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn should_set_all_false_is_false() {
        let log: Log = Rc::default();
        let mut m = merge([
            boxed(logging("a", &log, false, true)),
            boxed(logging("b", &log, false, true)),
        ]);
        assert_eq!(m.ask(Predicate::StartShouldSet, &1, &ev()), Some(false));
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn termination_request_is_short_circuit_and() {
        let log: Log = Rc::default();
        let mut m = merge([
            boxed(logging("a", &log, false, true)),
            boxed(logging("b", &log, false, false)),
            boxed(logging("c", &log, false, true)),
        ]);
        assert_eq!(m.ask(Predicate::TerminationRequest, &1, &ev()), Some(false));
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn termination_request_ignores_parts_without_it() {
        let mut m = merge([
            boxed(ResponderContract::new().predicate(Predicate::StartShouldSet, |_, _| true)),
            boxed(ResponderContract::new().predicate(Predicate::TerminationRequest, |_, _| true)),
        ]);
        assert_eq!(m.ask(Predicate::TerminationRequest, &1, &ev()), Some(true));
        assert_eq!(m.ask(Predicate::MoveShouldSet, &1, &ev()), None);
    }

    #[test]
    fn notifications_reach_every_part_in_order() {
        let log: Log = Rc::default();
        let mut m = merge([
            boxed(logging("a", &log, false, true)),
            boxed(ResponderContract::new().predicate(Predicate::StartShouldSet, |_, _| true)),
            boxed(logging("b", &log, false, true)),
        ]);
        assert!(m.notify(Notification::Grant, &1, &ev()));
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn nested_merge_behaves_like_flat_merge() {
        fn run(m: &mut Merged<u32>) -> (Option<bool>, Option<bool>) {
            m.notify(Notification::Grant, &1, &ev());
            (
                m.ask(Predicate::StartShouldSet, &1, &ev()),
                m.ask(Predicate::TerminationRequest, &1, &ev()),
            )
        }

        let flat_log: Log = Rc::default();
        let mut flat = merge([
            boxed(logging("a", &flat_log, false, true)),
            boxed(logging("b", &flat_log, false, false)),
            boxed(logging("c", &flat_log, true, true)),
        ]);

        let nested_log: Log = Rc::default();
        let inner = merge([
            boxed(logging("b", &nested_log, false, false)),
            boxed(logging("c", &nested_log, true, true)),
        ]);
        let mut nested = merge([
            boxed(logging("a", &nested_log, false, true)),
            Box::new(inner) as Box<dyn Responder<u32>>,
        ]);

        assert_eq!(flat.handlers(), nested.handlers());
        assert_eq!(run(&mut flat), run(&mut nested));
        assert_eq!(*flat_log.borrow(), *nested_log.borrow());
    }
}
