// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for touch negotiation: events, phases, outcomes, and dispatch steps.
//!
//! ## Overview
//!
//! These types describe the data that flows through the responder protocol.
//! They carry no behavior of their own and are consumed by the
//! [`contract`](crate::contract), [`merge`](crate::merge), and
//! [`negotiator`](crate::negotiator) modules as well as by gesture recognizers.

use kurbo::{Point, Vec2};

/// A single pointer event delivered to a responder contract.
///
/// Produced by the host for every start, move, end, or cancel of a touch
/// sequence. Read-only to recognizers.
#[derive(Clone, Debug, PartialEq)]
pub struct PressEvent<K> {
    /// Absolute pointer position (page coordinates).
    pub page: Point,
    /// Monotonic event time in milliseconds.
    pub timestamp: u64,
    /// Element currently evaluating the event.
    pub current_target: K,
    /// Element originally hit by the pointer.
    pub target: K,
}

impl<K: Clone> PressEvent<K> {
    /// Create an event whose current target is the hit target.
    pub fn new(target: K, page: Point, timestamp: u64) -> Self {
        Self {
            page,
            timestamp,
            current_target: target.clone(),
            target,
        }
    }

    /// Return a copy of this event with `current_target` replaced.
    #[must_use]
    pub fn retargeted(&self, current_target: K) -> Self {
        Self {
            page: self.page,
            timestamp: self.timestamp,
            current_target,
            target: self.target.clone(),
        }
    }
}

/// A press event extended with pan kinematics.
///
/// Derived by the pan recognizer on every delivery; never persisted across
/// touch sequences.
#[derive(Clone, Debug, PartialEq)]
pub struct PanEvent<K> {
    /// The underlying pointer event.
    pub press: PressEvent<K>,
    /// Displacement of the pointer from the position recorded at grant.
    pub translation: Vec2,
    /// Instantaneous speed in pixels per millisecond.
    pub velocity: Vec2,
}

impl<K> PanEvent<K> {
    /// Pointer position of the underlying event.
    #[inline]
    pub fn page(&self) -> Point {
        self.press.page
    }

    /// Timestamp of the underlying event.
    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.press.timestamp
    }
}

/// Phases of responder election.
///
/// Appears on each [`Dispatch`] item produced by
/// [`election_path`](crate::negotiator::election_path).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Root-to-target traversal; consults the `*_capture` predicates.
    Capture,
    /// Target-to-root traversal; consults the plain predicates.
    Bubble,
}

/// Which kind of pointer event drives an election.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Trigger {
    /// A touch start.
    Start,
    /// A touch move.
    Move,
}

/// Handler outcome controlling propagation.
///
/// Returned by per-entry handlers given to [`dispatcher::run`](crate::dispatcher::run).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Continue to the next entry.
    Continue,
    /// Stop propagation; no later entries are visited.
    Stop,
}

/// A single election step: one element polled in one phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Propagation phase for this step.
    pub phase: Phase,
    /// Element associated with this step.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// Capture-phase step for `node`.
    pub fn capture(node: K) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// Bubble-phase step for `node`.
    pub fn bubble(node: K) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}
