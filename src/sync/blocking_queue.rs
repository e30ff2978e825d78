//! FIFO queue with blocking, prebuffered pop
//!
//! Meant for one producer and one consumer thread, though any number of
//! either is safe, including consumers that wait for different backlogs.
//! The consumer can ask to wait until a minimum number of items is queued
//! before taking the first one off, which smooths out bursty upstream work.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

struct State<T> {
    items: VecDeque<T>,
    /// Consumers currently parked on the condvar
    waiters: usize,
}

pub struct BlockingQueue<T> {
    state: Mutex<State<T>>,
    available: Condvar,
}

impl<T> BlockingQueue<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::with_capacity(capacity),
                waiters: 0,
            }),
            available: Condvar::new(),
        }
    }

    /// Append an item and wake a waiting consumer.
    ///
    /// Returns the queue length right after the insertion.
    pub fn push(&self, item: T) -> usize {
        let (len, waiters) = {
            let mut state = self.state.lock();
            state.items.push_back(item);
            (state.items.len(), state.waiters)
        };

        self.wake(waiters);
        len
    }

    /// Wake waiting consumers so they re-check their condition.
    pub fn notify(&self) {
        let waiters = self.state.lock().waiters;
        self.wake(waiters);
    }

    // A lone waiter gets `notify_one`. With several, each may wait for a
    // different backlog, and a single wakeup could land on one whose
    // threshold is still unmet while another could proceed.
    fn wake(&self, waiters: usize) {
        if waiters > 1 {
            self.available.notify_all();
        } else {
            self.available.notify_one();
        }
    }

    /// Take the front item if there is one.
    pub fn try_pop(&self) -> Option<T> {
        self.state.lock().items.pop_front()
    }

    /// Move the front item into `out`. Returns `false` and leaves `out`
    /// untouched when the queue is empty.
    pub fn try_pop_into(&self, out: &mut T) -> bool {
        match self.try_pop() {
            Some(item) => {
                *out = item;
                true
            }
            None => false,
        }
    }

    /// Wait until at least `prebuffer` items are queued, then take the front
    /// one. A `prebuffer` of 0 or 1 is a plain blocking pop.
    pub fn wait_and_pop(&self, prebuffer: usize) -> T {
        let prebuffer = prebuffer.max(1);
        let mut state = self.state.lock();

        loop {
            if state.items.len() >= prebuffer {
                if let Some(item) = state.items.pop_front() {
                    return item;
                }
            }
            // The lock is released while waiting
            state.waiters += 1;
            self.available.wait(&mut state);
            state.waiters -= 1;
        }
    }

    /// Like [`wait_and_pop`](Self::wait_and_pop) but gives up after
    /// `timeout`, returning `None` if the backlog never reached `prebuffer`.
    pub fn wait_and_pop_timeout(&self, prebuffer: usize, timeout: Duration) -> Option<T> {
        let prebuffer = prebuffer.max(1);
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();

        loop {
            if state.items.len() >= prebuffer {
                return state.items.pop_front();
            }
            state.waiters += 1;
            let timed_out = self.available.wait_until(&mut state, deadline).timed_out();
            state.waiters -= 1;
            if timed_out {
                return if state.items.len() >= prebuffer {
                    state.items.pop_front()
                } else {
                    None
                };
            }
        }
    }

    /// Snapshot; may be stale by the time the caller looks at it.
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Snapshot; may be stale by the time the caller looks at it.
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for BlockingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingQueue")
            .field("len", &self.len())
            .finish()
    }
}
