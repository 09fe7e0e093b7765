//! Bounded blocking queue connecting the pipeline stages
//!
//! A monitor-style FIFO with a fixed capacity. Producers get a timed
//! `enqueue` that rejects instead of blocking indefinitely; the single
//! consumer gets a timed `dequeue` that distinguishes idle timeouts from
//! shutdown, so it can combine wait-for-work with periodic termination
//! checks.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Outcome of an `enqueue` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueue {
    Accepted,
    Rejected,
}

/// Outcome of a `dequeue` attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum Dequeue<T> {
    Signaled(T),
    Timeout,
    Shutdown,
}

struct Inner<T> {
    items: VecDeque<T>,
    shutdown: bool,
}

pub struct BoundedQueue<T> {
    inner: Mutex<Inner<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
    poll_interval: Duration,
}

impl<T> BoundedQueue<T> {
    /// `poll_interval` bounds how long a full-queue `enqueue` waits for
    /// space before rejecting.
    pub fn new(capacity: usize, poll_interval: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity.min(1024)),
                shutdown: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
            poll_interval,
        }
    }

    /// Append an item, waiting up to the poll interval for space when the
    /// queue is full. Always rejects after `shutdown()`.
    pub fn enqueue(&self, item: T) -> Enqueue {
        let mut inner = self.inner.lock();
        if inner.items.len() >= self.capacity && !inner.shutdown {
            let deadline = Instant::now() + self.poll_interval;
            while inner.items.len() >= self.capacity && !inner.shutdown {
                if self.not_full.wait_until(&mut inner, deadline).timed_out() {
                    break;
                }
            }
        }
        if inner.shutdown || inner.items.len() >= self.capacity {
            return Enqueue::Rejected;
        }
        inner.items.push_back(item);
        self.not_empty.notify_one();
        Enqueue::Accepted
    }

    /// Wait up to `timeout` for an item. Items buffered before `shutdown()`
    /// are still delivered; `Shutdown` is only reported once drained.
    pub fn dequeue(&self, timeout: Duration) -> Dequeue<T> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock();
        loop {
            if let Some(item) = inner.items.pop_front() {
                self.not_full.notify_one();
                return Dequeue::Signaled(item);
            }
            if inner.shutdown {
                return Dequeue::Shutdown;
            }
            if self.not_empty.wait_until(&mut inner, deadline).timed_out() {
                return match inner.items.pop_front() {
                    Some(item) => {
                        self.not_full.notify_one();
                        Dequeue::Signaled(item)
                    }
                    None if inner.shutdown => Dequeue::Shutdown,
                    None => Dequeue::Timeout,
                };
            }
        }
    }

    /// Pop the head without waiting. Used for head-discard on overflow.
    pub fn try_dequeue(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        let item = inner.items.pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Idempotent. Wakes all waiters; later `enqueue` calls reject.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        inner.shutdown = true;
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
