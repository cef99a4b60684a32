// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pressable surface: press and pan recognizers installed on one element.
//!
//! A [`Pressable`] collects a [`PressConfig`] and a [`PanConfig`] for a single
//! element and merges both recognizers (press first, then pan) into one
//! [`Merged`] contract. The negotiation layer sees one contract regardless of
//! how many recognizers are configured.
//!
//! ```
//! use hashbrown::HashMap;
//! use kurbo::Point;
//! use understory_gesture::pan::PanConfig;
//! use understory_gesture::press::PressConfig;
//! use understory_gesture::pressable::Pressable;
//! use understory_gesture::scheduler::Scheduler;
//! use understory_touch::contract::Responder;
//! use understory_touch::negotiator::Negotiator;
//! use understory_touch::types::PressEvent;
//!
//! let scheduler = Scheduler::new();
//! let mut contracts: HashMap<u32, Box<dyn Responder<u32>>> = HashMap::new();
//!
//! Pressable::new(7_u32)
//!     .press(PressConfig::new().on_press(|el, _| println!("tapped {el}")))
//!     .pan(PanConfig::new().on_pan_move(|_, e| println!("dragged {:?}", e.translation)))
//!     .mount(&scheduler, &mut contracts);
//!
//! let mut negotiator = Negotiator::new();
//! let down = PressEvent::new(7, Point::new(1.0, 1.0), 0);
//! assert_eq!(negotiator.touch_start(&[1, 7], &mut contracts, &down), Some(7));
//! ```

use alloc::boxed::Box;

use understory_touch::contract::Responder;
use understory_touch::merge::{Merged, merge};

use crate::pan::{PanConfig, PanRecognizer};
use crate::press::{PressConfig, PressRecognizer};
use crate::scheduler::Scheduler;

/// An element that can be pressed and dragged.
pub struct Pressable<K> {
    element: K,
    press: PressConfig<K>,
    pan: PanConfig<K>,
}

impl<K: core::fmt::Debug> core::fmt::Debug for Pressable<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pressable")
            .field("element", &self.element)
            .field("press", &self.press)
            .field("pan", &self.pan)
            .finish()
    }
}

impl<K: Clone + 'static> Pressable<K> {
    /// A pressable for `element` with no handlers.
    pub fn new(element: K) -> Self {
        Self {
            element,
            press: PressConfig::new(),
            pan: PanConfig::new(),
        }
    }

    /// Replace the press configuration.
    #[must_use]
    pub fn press(mut self, config: PressConfig<K>) -> Self {
        self.press = config;
        self
    }

    /// Replace the pan configuration.
    #[must_use]
    pub fn pan(mut self, config: PanConfig<K>) -> Self {
        self.pan = config;
        self
    }

    /// The element the recognizers are attached to.
    pub fn element(&self) -> &K {
        &self.element
    }

    /// Whether neither recognizer has a handler.
    pub fn is_empty(&self) -> bool {
        self.press.is_empty() && self.pan.is_empty()
    }

    /// Build both recognizers and merge them into one contract.
    ///
    /// Long-press timers run on `scheduler`. A pressable without handlers
    /// yields an empty contract.
    pub fn into_responder(self, scheduler: &Scheduler) -> Merged<K> {
        merge([
            Box::new(PressRecognizer::new(self.press, scheduler)) as Box<dyn Responder<K>>,
            Box::new(PanRecognizer::new(self.pan)),
        ])
    }

    /// Build the merged contract and install it for the element in `contracts`.
    pub fn mount<C>(self, scheduler: &Scheduler, contracts: &mut C)
    where
        C: Extend<(K, Box<dyn Responder<K>>)>,
    {
        let element = self.element.clone();
        let responder: Box<dyn Responder<K>> = Box::new(self.into_responder(scheduler));
        contracts.extend([(element, responder)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use hashbrown::HashMap;
    use kurbo::Point;
    use understory_touch::contract::{Handlers, Notification, Predicate, ResponderContract};
    use understory_touch::negotiator::Negotiator;
    use understory_touch::types::PressEvent;

    type Log = Rc<RefCell<Vec<(u32, &'static str)>>>;
    type Contracts = HashMap<u32, Box<dyn Responder<u32>>>;

    fn at(x: f64, t: u64) -> PressEvent<u32> {
        PressEvent::new(2, Point::new(x, 0.0), t)
    }

    fn press_log(log: &Log) -> PressConfig<u32> {
        let (a, b, c, d) = (log.clone(), log.clone(), log.clone(), log.clone());
        PressConfig::new()
            .on_press(move |el, _| a.borrow_mut().push((*el, "press")))
            .on_press_in(move |el, _| b.borrow_mut().push((*el, "in")))
            .on_press_out(move |el, _| c.borrow_mut().push((*el, "out")))
            .on_long_press(move |el, _| d.borrow_mut().push((*el, "long")))
    }

    fn pan_log(log: &Log) -> PanConfig<u32> {
        let (a, b, c) = (log.clone(), log.clone(), log.clone());
        PanConfig::new()
            .on_pan_start(move |el, _| a.borrow_mut().push((*el, "pan-start")))
            .on_pan_move(move |el, _| b.borrow_mut().push((*el, "pan-move")))
            .on_pan_end(move |el, _| c.borrow_mut().push((*el, "pan-end")))
    }

    #[test]
    fn empty_pressable_never_claims() {
        let s = Scheduler::new();
        let p = Pressable::<u32>::new(2);
        assert_eq!(*p.element(), 2);
        assert!(p.is_empty());
        let mut contracts: Contracts = HashMap::new();
        p.mount(&s, &mut contracts);
        assert!(contracts[&2].handlers().is_empty());

        let mut n = Negotiator::new();
        assert_eq!(n.touch_start(&[1, 2], &mut contracts, &at(0.0, 0)), None);
        assert_eq!(n.touch_move(&[1, 2], &mut contracts, &at(50.0, 10)), None);
    }

    #[test]
    fn merged_handlers_are_union() {
        let s = Scheduler::new();
        let log: Log = Rc::default();
        let only_press = Pressable::new(2).press(press_log(&log)).into_responder(&s);
        assert_eq!(only_press.len(), 1);
        assert!(!only_press.handlers().contains(Handlers::MOVE_SHOULD_SET));

        let both = Pressable::new(2)
            .press(press_log(&log))
            .pan(pan_log(&log))
            .into_responder(&s);
        assert_eq!(both.len(), 2);
        assert!(both.handlers().contains(Handlers::MOVE_SHOULD_SET | Handlers::MOVE));
    }

    #[test]
    fn tap_through_negotiator() {
        let s = Scheduler::new();
        let log: Log = Rc::default();
        let mut contracts: Contracts = HashMap::new();
        Pressable::new(2)
            .press(press_log(&log))
            .pan(pan_log(&log))
            .mount(&s, &mut contracts);

        let mut n = Negotiator::new();
        assert_eq!(n.touch_start(&[1, 2], &mut contracts, &at(0.0, 0)), Some(2));
        s.advance_to(3);
        n.touch_move(&[1, 2], &mut contracts, &at(3.0, 3));
        s.advance_to(120);
        n.touch_end(&mut contracts, &at(3.0, 120));
        s.advance_to(1000);
        assert_eq!(*log.borrow(), vec![(2, "in"), (2, "out"), (2, "press")]);
    }

    #[test]
    fn long_press_through_negotiator() {
        let s = Scheduler::new();
        let log: Log = Rc::default();
        let mut contracts: Contracts = HashMap::new();
        Pressable::new(2)
            .press(press_log(&log).with_delay_long_press(300))
            .mount(&s, &mut contracts);

        let mut n = Negotiator::new();
        n.touch_start(&[2], &mut contracts, &at(0.0, 0));
        s.advance_to(400);
        n.touch_end(&mut contracts, &at(0.0, 400));
        assert_eq!(*log.borrow(), vec![(2, "in"), (2, "long"), (2, "out")]);
    }

    #[test]
    fn termination_is_refused_only_while_panning() {
        let s = Scheduler::new();
        let log: Log = Rc::default();
        let mut m = Pressable::new(2)
            .press(press_log(&log))
            .pan(pan_log(&log))
            .into_responder(&s);

        m.notify(Notification::Grant, &2, &at(0.0, 0));
        assert_eq!(m.ask(Predicate::TerminationRequest, &2, &at(0.0, 1)), Some(true));
        m.notify(Notification::Move, &2, &at(25.0, 10));
        assert_eq!(m.ask(Predicate::TerminationRequest, &2, &at(25.0, 11)), Some(false));
        m.notify(Notification::Release, &2, &at(25.0, 20));
        assert_eq!(m.ask(Predicate::TerminationRequest, &2, &at(25.0, 21)), Some(true));
    }

    #[test]
    fn drag_reports_press_and_pan_in_registration_order() {
        let s = Scheduler::new();
        let log: Log = Rc::default();
        let mut contracts: Contracts = HashMap::new();
        Pressable::new(2)
            .press(press_log(&log))
            .pan(pan_log(&log))
            .mount(&s, &mut contracts);

        let mut n = Negotiator::new();
        n.touch_start(&[2], &mut contracts, &at(0.0, 0));
        n.touch_move(&[2], &mut contracts, &at(15.0, 10));
        n.touch_move(&[2], &mut contracts, &at(30.0, 20));
        n.touch_end(&mut contracts, &at(30.0, 30));
        assert_eq!(
            *log.borrow(),
            vec![
                (2, "in"),
                (2, "pan-start"),
                (2, "pan-move"),
                (2, "out"),
                (2, "press"),
                (2, "pan-end"),
            ]
        );
    }

    #[test]
    fn ancestor_takes_over_idle_press() {
        let s = Scheduler::new();
        let log: Log = Rc::default();
        let mut contracts: Contracts = HashMap::new();
        Pressable::new(2).press(press_log(&log)).mount(&s, &mut contracts);
        let l = log.clone();
        contracts.insert(
            1,
            Box::new(ResponderContract::new().notification(
                Notification::Grant,
                move |el, _| l.borrow_mut().push((*el, "grant")),
            )),
        );

        let mut n = Negotiator::new();
        n.touch_start(&[1, 2], &mut contracts, &at(0.0, 0));
        assert!(n.request_transfer(1, &mut contracts, &at(40.0, 50)));
        n.touch_end(&mut contracts, &at(40.0, 60));
        s.advance_to(1000);
        assert_eq!(*log.borrow(), vec![(2, "in"), (2, "out"), (1, "grant")]);
    }

    #[test]
    fn active_drag_cannot_be_stolen() {
        let s = Scheduler::new();
        let log: Log = Rc::default();
        let mut contracts: Contracts = HashMap::new();
        Pressable::new(2)
            .press(press_log(&log))
            .pan(pan_log(&log))
            .mount(&s, &mut contracts);
        let l = log.clone();
        contracts.insert(
            1,
            Box::new(ResponderContract::new().notification(
                Notification::Reject,
                move |el, _| l.borrow_mut().push((*el, "reject")),
            )),
        );

        let mut n = Negotiator::new();
        n.touch_start(&[1, 2], &mut contracts, &at(0.0, 0));
        n.touch_move(&[1, 2], &mut contracts, &at(20.0, 10));
        assert!(!n.request_transfer(1, &mut contracts, &at(25.0, 15)));
        assert_eq!(n.responder(), Some(&2));
        assert_eq!(
            *log.borrow(),
            vec![(2, "in"), (2, "pan-start"), (1, "reject")]
        );
    }
}
