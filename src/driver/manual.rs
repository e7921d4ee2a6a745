//! Hand-cranked scheduler and timer, for driving a [`Player`](super::Player)
//! without a browser.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use super::{Scheduler, Timer};

type Callback = Box<dyn FnOnce()>;

/// Queues frame requests until [`run_next`](Self::run_next) is called.
/// Clones share one queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<VecDeque<Callback>>>,
    requested: Rc<Cell<usize>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Frame requests seen so far, run or not.
    pub fn requested(&self) -> usize {
        self.requested.get()
    }

    /// Runs the oldest pending callback. Callbacks it schedules wait for a
    /// later call.
    pub fn run_next(&self) -> bool {
        let next = self.queue.borrow_mut().pop_front();
        match next {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Runs callbacks until none are pending, returning how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        self.requested.set(self.requested.get() + 1);
        self.queue.borrow_mut().push_back(callback);
    }
}

struct Due {
    at_ms: u64,
    seq: u64,
    callback: Callback,
}

#[derive(Default)]
struct Clock {
    now_ms: u64,
    seq: u64,
    due: Vec<Due>,
}

/// Virtual-clock timer. Time only moves in [`advance`](Self::advance).
/// Clones share one clock.
#[derive(Clone, Default)]
pub struct ManualTimer {
    clock: Rc<RefCell<Clock>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.borrow().now_ms
    }

    pub fn pending(&self) -> usize {
        self.clock.borrow().due.len()
    }

    /// Moves the clock forward, firing due callbacks in deadline order.
    /// Returns how many fired.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.clock.borrow().now_ms + ms;
        let mut fired = 0;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let idx = clock
                    .due
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| d.at_ms <= target)
                    .min_by_key(|(_, d)| (d.at_ms, d.seq))
                    .map(|(i, _)| i);
                match idx {
                    Some(i) => {
                        let due = clock.due.swap_remove(i);
                        clock.now_ms = due.at_ms;
                        Some(due.callback)
                    }
                    None => {
                        clock.now_ms = target;
                        None
                    }
                }
            };
            let Some(callback) = next else {
                return fired;
            };
            callback();
            fired += 1;
        }
    }
}

impl Timer for ManualTimer {
    fn after(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        let mut clock = self.clock.borrow_mut();
        clock.seq += 1;
        let due = Due {
            at_ms: clock.now_ms + u64::from(delay_ms),
            seq: clock.seq,
            callback,
        };
        clock.due.push(due);
    }
}
