// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative deferred-callback scheduler.
//!
//! The host owns the clock: it calls [`Scheduler::advance_to`] with the
//! current time (typically from its frame loop or before delivering each
//! pointer event), and every task whose due time has passed runs, in due-time
//! order and then scheduling order.
//!
//! There is no cancel handle. Callers that need to ignore a late firing do so
//! by value, e.g. by comparing a token captured at scheduling time against
//! their current one (see [`press`](crate::press)).
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_gesture::scheduler::Scheduler;
//!
//! let scheduler = Scheduler::new();
//! let fired = Rc::new(Cell::new(0));
//!
//! let f = fired.clone();
//! scheduler.schedule(500, move || f.set(f.get() + 1));
//!
//! assert_eq!(scheduler.advance_to(499), 0);
//! assert_eq!(scheduler.advance_to(500), 1);
//! assert_eq!(fired.get(), 1);
//! assert_eq!(scheduler.pending(), 0);
//! ```

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use core::cell::RefCell;

type Task = Box<dyn FnOnce()>;

#[derive(Default)]
struct Queue {
    /// Current time in milliseconds; never decreases.
    now: u64,
    /// Tie-break for tasks sharing a due time.
    next_seq: u64,
    /// Pending tasks keyed by `(due, seq)`.
    tasks: BTreeMap<(u64, u64), Task>,
}

/// Handle to a single-threaded deferred-callback queue.
///
/// Cloning the handle shares the queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    queue: Rc<RefCell<Queue>>,
}

impl core::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let q = self.queue.borrow();
        f.debug_struct("Scheduler")
            .field("now", &q.now)
            .field("pending", &q.tasks.len())
            .finish()
    }
}

impl Scheduler {
    /// Create an empty scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scheduler time in milliseconds.
    pub fn now(&self) -> u64 {
        self.queue.borrow().now
    }

    /// Number of tasks not yet run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().tasks.len()
    }

    /// Run `task` once `delay` milliseconds have elapsed from [`now`](Self::now).
    pub fn schedule(&self, delay: u64, task: impl FnOnce() + 'static) {
        let mut q = self.queue.borrow_mut();
        let due = q.now.saturating_add(delay);
        let seq = q.next_seq;
        q.next_seq += 1;
        q.tasks.insert((due, seq), Box::new(task));
    }

    /// Move the clock forward to `now` and run every task that became due.
    ///
    /// Tasks may schedule further tasks; those run too if they fall due by
    /// `now`. While a task runs, [`now`](Self::now) reports its due time.
    /// Moving the clock backwards is ignored. Returns the number of tasks run.
    pub fn advance_to(&self, now: u64) -> usize {
        let mut ran = 0;
        loop {
            let task = {
                let mut q = self.queue.borrow_mut();
                let due = q.tasks.first_key_value().map(|(&(due, _), _)| due);
                match due {
                    Some(due) if due <= now => {
                        q.now = q.now.max(due);
                        q.tasks.pop_first().map(|(_, task)| task)
                    }
                    _ => None,
                }
            };
            let Some(task) = task else {
                break;
            };
            task();
            ran += 1;
        }
        let mut q = self.queue.borrow_mut();
        q.now = q.now.max(now);
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn recorder() -> (Rc<RefCell<Vec<u32>>>, Scheduler) {
        (Rc::default(), Scheduler::new())
    }

    #[test]
    fn runs_in_due_then_schedule_order() {
        let (log, s) = recorder();
        for (delay, id) in [(30, 1), (10, 2), (30, 3), (20, 4)] {
            let log = log.clone();
            s.schedule(delay, move || log.borrow_mut().push(id));
        }
        assert_eq!(s.advance_to(100), 4);
        assert_eq!(*log.borrow(), vec![2, 4, 1, 3]);
    }

    #[test]
    fn tasks_not_yet_due_stay_pending() {
        let (log, s) = recorder();
        let l = log.clone();
        s.schedule(50, move || l.borrow_mut().push(1));
        assert_eq!(s.advance_to(49), 0);
        assert_eq!(s.pending(), 1);
        assert_eq!(s.now(), 49);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn clock_never_moves_backwards() {
        let s = Scheduler::new();
        s.advance_to(200);
        s.advance_to(100);
        assert_eq!(s.now(), 200);
    }

    #[test]
    fn delay_is_relative_to_current_time() {
        let (log, s) = recorder();
        s.advance_to(1000);
        let l = log.clone();
        s.schedule(10, move || l.borrow_mut().push(7));
        assert_eq!(s.advance_to(1009), 0);
        assert_eq!(s.advance_to(1010), 1);
        assert_eq!(*log.borrow(), vec![7]);
    }

    #[test]
    fn nested_scheduling_runs_when_due() {
        let (log, s) = recorder();
        let inner = s.clone();
        let l = log.clone();
        s.schedule(10, move || {
            l.borrow_mut().push(1);
            let l = l.clone();
            // Due at 15, relative to the running task's due time.
            inner.schedule(5, move || l.borrow_mut().push(2));
        });
        assert_eq!(s.advance_to(14), 1);
        assert_eq!(s.pending(), 1);
        assert_eq!(s.advance_to(15), 1);
        assert_eq!(*log.borrow(), vec![1, 2]);
    }
}
