// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: press and pan recognizers for the touch responder contract.
//!
//! ## Overview
//!
//! Each recognizer is a [`Responder`](understory_touch::contract::Responder)
//! that owns its own tracking state for the lifetime of the element it is
//! attached to:
//!
//! - [`press`]: press-in, press-out, tap, and long-press. Always yields to
//!   other gestures on a termination request.
//! - [`pan`]: drags with translation and velocity past a minimum distance.
//!   Refuses termination while a drag is in progress.
//! - [`pressable`]: installs both on one element through the merge algebra.
//! - [`scheduler`]: the cooperative deferred-callback queue driving
//!   long-press timers.
//!
//! A recognizer built without any handler defines no callbacks and is a total
//! no-op in any merge.
//!
//! ## Timers
//!
//! Long-press timers are not cancelled. Each grant mints a fresh token; a
//! timer that comes due after its press ended, or after a newer press began,
//! sees a different token and does nothing.
//!
//! ## Defaults
//!
//! - [`DEFAULT_LONG_PRESS_DELAY`](press::DEFAULT_LONG_PRESS_DELAY): 500 ms.
//! - [`DEFAULT_MINIMUM_PAN_DISTANCE`](pan::DEFAULT_MINIMUM_PAN_DISTANCE): 10 units.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod pan;
pub mod press;
pub mod pressable;
pub mod scheduler;
