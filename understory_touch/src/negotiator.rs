// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference negotiator: elects one responder per touch sequence and routes
//! the rest of the sequence to it.
//!
//! ## Overview
//!
//! Hosts normally own this layer. The [`Negotiator`] here is a small,
//! deterministic rendition of it that works over an already hit-tested
//! root→target path; it performs no hit testing and no tree walking.
//!
//! ## Election
//!
//! - Capture: root→target, asking each element's `*_capture` predicate.
//! - Bubble: target→root, asking each element's plain predicate.
//! - The first element answering `true` wins and is granted.
//! - Touch start uses the start predicates, touch move the move predicates.
//! - Once a responder is granted, should-set predicates are not consulted
//!   again for the sequence. Only [`Negotiator::request_transfer`] moves
//!   responder status mid-sequence.
//!
//! ## Termination requests
//!
//! Before a transfer the current responder is asked
//! `on_responder_termination_request`. When it does not define one, the
//! negotiator's [`TerminationPolicy`] decides.
//!
//! ```
//! use hashbrown::HashMap;
//! use kurbo::Point;
//! use understory_touch::contract::{Predicate, Responder, ResponderContract};
//! use understory_touch::negotiator::Negotiator;
//! use understory_touch::types::PressEvent;
//!
//! let mut contracts: HashMap<u32, Box<dyn Responder<u32>>> = HashMap::new();
//! contracts.insert(
//!     2,
//!     Box::new(ResponderContract::new().predicate(Predicate::StartShouldSet, |_, _| true)),
//! );
//!
//! let mut negotiator = Negotiator::new();
//! let down = PressEvent::new(3, Point::new(5.0, 5.0), 0);
//! assert_eq!(negotiator.touch_start(&[1, 2, 3], &mut contracts, &down), Some(2));
//!
//! let up = PressEvent::new(3, Point::new(5.0, 5.0), 40);
//! assert_eq!(negotiator.touch_end(&mut contracts, &up), Some(2));
//! assert_eq!(negotiator.responder(), None);
//! ```

use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};

use crate::contract::{Notification, Predicate, Responder};
use crate::dispatcher;
use crate::types::{Dispatch, Outcome, PressEvent, Trigger};

/// Resolve the contract installed on an element.
///
/// Elements without a contract are treated as defining no callbacks.
pub trait ContractLookup<K> {
    /// Returns the contract for `node`, if any.
    fn contract_mut(&mut self, node: &K) -> Option<&mut dyn Responder<K>>;
}

impl<K, R, S> ContractLookup<K> for hashbrown::HashMap<K, R, S>
where
    K: Eq + Hash,
    R: Responder<K>,
    S: BuildHasher,
{
    fn contract_mut(&mut self, node: &K) -> Option<&mut dyn Responder<K>> {
        self.get_mut(node).map(|r| r as &mut dyn Responder<K>)
    }
}

/// Answer used when the current responder defines no termination request.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TerminationPolicy {
    /// Give up responder status.
    #[default]
    Allow,
    /// Keep responder status.
    Refuse,
}

/// Build the election sequence for a root→target path.
///
/// Capture visits root→target, bubble visits target→root; the target appears
/// in both phases.
pub fn election_path<K: Clone>(path: &[K]) -> Vec<Dispatch<K>> {
    let mut out = Vec::with_capacity(path.len() * 2);
    for n in path {
        out.push(Dispatch::capture(n.clone()));
    }
    for n in path.iter().rev() {
        out.push(Dispatch::bubble(n.clone()));
    }
    out
}

/// Single-pointer responder negotiator.
#[derive(Clone, Debug, Default)]
pub struct Negotiator<K> {
    responder: Option<K>,
    policy: TerminationPolicy,
}

impl<K: Clone + PartialEq + core::fmt::Debug> Negotiator<K> {
    /// Create a negotiator using [`TerminationPolicy::Allow`].
    pub fn new() -> Self {
        Self::with_policy(TerminationPolicy::Allow)
    }

    /// Create a negotiator with an explicit default termination answer.
    pub fn with_policy(policy: TerminationPolicy) -> Self {
        Self {
            responder: None,
            policy,
        }
    }

    /// The element currently holding responder status.
    pub fn responder(&self) -> Option<&K> {
        self.responder.as_ref()
    }

    /// Default answer for responders that define no termination request.
    pub fn policy(&self) -> TerminationPolicy {
        self.policy
    }

    /// Handle a touch start over the hit path `path` (root→target).
    ///
    /// Runs the start election if no element holds the responder, then delivers
    /// `on_responder_start`. Returns the responder, if any.
    pub fn touch_start(
        &mut self,
        path: &[K],
        contracts: &mut impl ContractLookup<K>,
        event: &PressEvent<K>,
    ) -> Option<K> {
        if self.responder.is_none()
            && let Some(winner) = elect(Trigger::Start, path, contracts, event)
        {
            self.grant(winner, contracts, event);
        }
        self.deliver(Notification::Start, contracts, event);
        self.responder.clone()
    }

    /// Handle a pointer move over the hit path `path` (root→target).
    ///
    /// Runs the move election only while no element holds the responder, then
    /// delivers `on_responder_move`. Returns the responder, if any.
    pub fn touch_move(
        &mut self,
        path: &[K],
        contracts: &mut impl ContractLookup<K>,
        event: &PressEvent<K>,
    ) -> Option<K> {
        if self.responder.is_none()
            && let Some(winner) = elect(Trigger::Move, path, contracts, event)
        {
            self.grant(winner, contracts, event);
        }
        self.deliver(Notification::Move, contracts, event);
        self.responder.clone()
    }

    /// Finish the sequence normally: `on_responder_end` then
    /// `on_responder_release`. Returns the released element.
    pub fn touch_end(
        &mut self,
        contracts: &mut impl ContractLookup<K>,
        event: &PressEvent<K>,
    ) -> Option<K> {
        self.deliver(Notification::End, contracts, event);
        self.deliver(Notification::Release, contracts, event);
        let released = self.responder.take();
        tracing::trace!(?released, "responder released");
        released
    }

    /// Cancel the sequence: `on_responder_terminate`. Returns the terminated element.
    pub fn touch_cancel(
        &mut self,
        contracts: &mut impl ContractLookup<K>,
        event: &PressEvent<K>,
    ) -> Option<K> {
        self.deliver(Notification::Terminate, contracts, event);
        let terminated = self.responder.take();
        tracing::debug!(?terminated, "responder terminated by cancel");
        terminated
    }

    /// Ask the current responder to hand responder status to `candidate`.
    ///
    /// If the current responder agrees (or defines no termination request and
    /// the policy allows), it is terminated and `candidate` is granted.
    /// Otherwise `candidate` receives `on_responder_reject`. Returns whether
    /// `candidate` now holds the responder.
    pub fn request_transfer(
        &mut self,
        candidate: K,
        contracts: &mut impl ContractLookup<K>,
        event: &PressEvent<K>,
    ) -> bool {
        let Some(current) = self.responder.clone() else {
            self.grant(candidate, contracts, event);
            return true;
        };
        if current == candidate {
            return true;
        }

        let answer = contracts.contract_mut(&current).and_then(|c| {
            c.ask(
                Predicate::TerminationRequest,
                &current,
                &event.retargeted(current.clone()),
            )
        });
        let allowed = answer.unwrap_or(self.policy == TerminationPolicy::Allow);

        if allowed {
            self.deliver(Notification::Terminate, contracts, event);
            tracing::debug!(from = ?current, to = ?candidate, "responder transferred");
            self.grant(candidate, contracts, event);
            true
        } else {
            tracing::debug!(holder = ?current, ?candidate, "responder transfer refused");
            if let Some(c) = contracts.contract_mut(&candidate) {
                c.notify(
                    Notification::Reject,
                    &candidate,
                    &event.retargeted(candidate.clone()),
                );
            }
            false
        }
    }

    fn grant(&mut self, node: K, contracts: &mut impl ContractLookup<K>, event: &PressEvent<K>) {
        tracing::debug!(?node, "responder granted");
        if let Some(c) = contracts.contract_mut(&node) {
            c.notify(Notification::Grant, &node, &event.retargeted(node.clone()));
        }
        self.responder = Some(node);
    }

    fn deliver(
        &self,
        which: Notification,
        contracts: &mut impl ContractLookup<K>,
        event: &PressEvent<K>,
    ) {
        let Some(node) = &self.responder else {
            return;
        };
        if let Some(c) = contracts.contract_mut(node) {
            c.notify(which, node, &event.retargeted(node.clone()));
        }
    }
}

/// Poll the path in capture → bubble order and return the first claimant.
pub fn elect<K: Clone>(
    trigger: Trigger,
    path: &[K],
    contracts: &mut impl ContractLookup<K>,
    event: &PressEvent<K>,
) -> Option<K> {
    let seq = election_path(path);
    let stop_at = dispatcher::run(&seq, contracts, |d, contracts| {
        let which = Predicate::should_set(trigger, d.phase);
        let claimed = contracts
            .contract_mut(&d.node)
            .and_then(|c| c.ask(which, &d.node, &event.retargeted(d.node.clone())))
            .unwrap_or(false);
        if claimed {
            Outcome::Stop
        } else {
            Outcome::Continue
        }
    });
    stop_at.map(|d| d.node.clone())
}
