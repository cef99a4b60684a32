// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: walk an election sequence and honor stop outcomes.
//!
//! The dispatcher executes a handler for each step in a capture → bubble
//! sequence and applies one propagation rule:
//!
//! - [`Outcome::Continue`] moves on to the next step.
//! - [`Outcome::Stop`] aborts immediately; no later step is visited.
//!
//! The return value reports where propagation stopped, if it did. The
//! [`Negotiator`](crate::negotiator::Negotiator) uses this to find the first
//! element that claims the responder.
//!
//! ## Minimal example
//!
//! ```
//! use understory_touch::dispatcher;
//! use understory_touch::negotiator::election_path;
//! use understory_touch::types::{Outcome, Phase};
//!
//! // Root 1 → 2 → target 3.
//! let seq = election_path(&[1_u32, 2, 3]);
//!
//! let mut seen: Vec<(Phase, u32)> = Vec::new();
//! let stop_at = dispatcher::run(&seq, &mut seen, |d, seen| {
//!     seen.push((d.phase, d.node));
//!     if d.phase == Phase::Bubble && d.node == 2 { Outcome::Stop } else { Outcome::Continue }
//! });
//!
//! assert_eq!(stop_at.map(|d| d.node), Some(2));
//! assert_eq!(seen, vec![
//!     (Phase::Capture, 1), (Phase::Capture, 2), (Phase::Capture, 3),
//!     (Phase::Bubble, 3), (Phase::Bubble, 2),
//! ]);
//! ```

use crate::types::{Dispatch, Outcome};

/// Run a handler over a dispatch sequence and honor stop outcomes.
///
/// - `seq`: steps in capture → bubble order, typically from
///   [`election_path`](crate::negotiator::election_path).
/// - `state`: a mutable payload carried across handler calls; you own its shape.
/// - `handler`: per-step callback; return an [`Outcome`] to control propagation.
///
/// Returns `None` if every step was visited, or `Some(d)` with the step at
/// which a handler returned [`Outcome::Stop`].
pub fn run<'a, K, S>(
    seq: &'a [Dispatch<K>],
    state: &mut S,
    mut handler: impl FnMut(&Dispatch<K>, &mut S) -> Outcome,
) -> Option<&'a Dispatch<K>> {
    for d in seq {
        match handler(d, state) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(d),
        }
    }
    None
}
