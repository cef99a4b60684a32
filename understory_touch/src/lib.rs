// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_touch --heading-base-level=0

//! Understory Touch: deterministic, `no_std` touch responder negotiation.
//!
//! ## Overview
//!
//! A single stream of pointer events (start → move → release or terminate)
//! must be owned by exactly one element, the *responder*. Elements take part
//! by exposing a [`Responder`](crate::contract::Responder) contract: five
//! predicates that claim or surrender responder status and seven lifecycle
//! notifications. This crate provides:
//!
//! - [`types`]: the event model, [`PressEvent`](crate::types::PressEvent) and
//!   [`PanEvent`](crate::types::PanEvent), plus election phases.
//! - [`contract`]: the [`Responder`](crate::contract::Responder) trait, its
//!   [`Handlers`](crate::contract::Handlers) presence flags, and a closure-built
//!   [`ResponderContract`](crate::contract::ResponderContract).
//! - [`merge`]: the merge algebra that presents several contracts installed on
//!   one element as one contract.
//! - [`negotiator`]: a reference [`Negotiator`](crate::negotiator::Negotiator)
//!   that elects a responder over a hit-tested root→target path.
//! - [`dispatcher`]: the capture → bubble walk used by the negotiator.
//!
//! It does not perform hit testing. Gesture recognizers built on the contract
//! live in `understory_gesture`.
//!
//! ## Presence, not defaults
//!
//! A callback is either present or absent. Absent predicates never claim
//! the responder, absent notifications never fire, and a contract with no
//! callbacks at all is a total no-op. The merge algebra filters on presence:
//!
//! - should-set predicates: OR, short-circuit, registration order;
//! - termination request: AND, short-circuit, registration order;
//! - notifications: every part, registration order.
//!
//! ## Workflow
//!
//! 1) Install a contract per element, e.g. in a
//!    `hashbrown::HashMap<K, Box<dyn Responder<K>>>`.
//! 2) On touch start, call
//!    [`Negotiator::touch_start`](crate::negotiator::Negotiator::touch_start)
//!    with the hit path; capture predicates run root→target, then bubble
//!    predicates target→root. The first claimant is granted.
//! 3) Feed moves through
//!    [`touch_move`](crate::negotiator::Negotiator::touch_move) and finish with
//!    [`touch_end`](crate::negotiator::Negotiator::touch_end) or
//!    [`touch_cancel`](crate::negotiator::Negotiator::touch_cancel).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod contract;
pub mod dispatcher;
pub mod merge;
pub mod negotiator;
pub mod types;
