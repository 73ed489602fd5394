//! Blocking input-line hand-off
//!
//! The owner thread pushes completed input lines; foreign consumer
//! threads block in [`LineRendezvous::wait_get`] for the next one. The
//! wait predicate is the queue itself, so every wakeup re-checks for a
//! queued line and concurrent waiters cannot starve each other. A push
//! is always accepted, even mid-shutdown, so a line submitted while the
//! console is going down is still delivered. Shutdown is an idempotent
//! terminal state: every blocked and future `wait_get` returns `None`
//! once the queue is drained.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use log::{debug, trace};

struct Inner {
    queue: VecDeque<String>,
    shutdown: bool,
}

/// Unbounded submitted-line queue with a blocking consumer side.
pub struct LineRendezvous {
    inner: Mutex<Inner>,
    cond: Condvar,
}

impl Default for LineRendezvous {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRendezvous {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                queue: VecDeque::new(),
                shutdown: false,
            }),
            cond: Condvar::new(),
        }
    }

    /// Queue a submitted line and wake one waiter. Never fails.
    pub fn push(&self, line: String) {
        let mut inner = self.lock();
        trace!("rendezvous push ({} bytes)", line.len());
        inner.queue.push_back(line);
        drop(inner);
        self.cond.notify_one();
    }

    /// Take the next submitted line, blocking until one arrives.
    ///
    /// Returns `None` only after [`shutdown`](Self::shutdown), once the
    /// queue is empty — the EOF sentinel. At most one line is consumed
    /// per call; a wakeup that finds the queue already drained by
    /// another waiter goes straight back to sleep.
    pub fn wait_get(&self) -> Option<String> {
        let mut inner = self.lock();
        while inner.queue.is_empty() && !inner.shutdown {
            inner = match self.cond.wait(inner) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
        inner.queue.pop_front()
    }

    /// Wake all current and future waiters with the EOF sentinel.
    /// Safe to call more than once.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        inner.shutdown = true;
        debug!("rendezvous shutdown ({} line(s) still queued)", inner.queue.len());
        drop(inner);
        self.cond.notify_all();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_push_then_get_immediate() {
        let r = LineRendezvous::new();
        r.push("hello".into());
        assert_eq!(r.wait_get(), Some("hello".into()));
    }

    #[test]
    fn test_fifo_order() {
        let r = LineRendezvous::new();
        r.push("a".into());
        r.push("b".into());
        assert_eq!(r.wait_get(), Some("a".into()));
        assert_eq!(r.wait_get(), Some("b".into()));
    }

    #[test]
    fn test_blocked_waiter_woken_by_push() {
        let r = Arc::new(LineRendezvous::new());
        let consumer = {
            let r = Arc::clone(&r);
            std::thread::spawn(move || r.wait_get())
        };
        std::thread::sleep(Duration::from_millis(20));
        r.push("late".into());
        assert_eq!(consumer.join().unwrap(), Some("late".into()));
    }

    #[test]
    fn test_shutdown_unblocks_waiter_with_sentinel() {
        let r = Arc::new(LineRendezvous::new());
        let consumer = {
            let r = Arc::clone(&r);
            std::thread::spawn(move || r.wait_get())
        };
        std::thread::sleep(Duration::from_millis(20));
        r.shutdown();
        assert_eq!(consumer.join().unwrap(), None);
    }

    #[test]
    fn test_get_after_shutdown_never_blocks() {
        let r = LineRendezvous::new();
        r.shutdown();
        assert_eq!(r.wait_get(), None);
        assert_eq!(r.wait_get(), None);
    }

    #[test]
    fn test_shutdown_idempotent() {
        let r = LineRendezvous::new();
        r.shutdown();
        r.shutdown();
        assert_eq!(r.wait_get(), None);
    }

    #[test]
    fn test_lines_queued_before_shutdown_still_delivered() {
        let r = LineRendezvous::new();
        r.push("in flight".into());
        r.shutdown();
        assert_eq!(r.wait_get(), Some("in flight".into()));
        assert_eq!(r.wait_get(), None);
    }

    #[test]
    fn test_push_after_shutdown_still_accepted() {
        let r = LineRendezvous::new();
        r.shutdown();
        r.push("straggler".into());
        assert_eq!(r.wait_get(), Some("straggler".into()));
        assert_eq!(r.wait_get(), None);
    }

    #[test]
    fn test_two_blocked_waiters_each_get_a_line() {
        // One push per waiter: the first wakeup must not leave the
        // second waiter asleep while its line sits in the queue.
        let r = Arc::new(LineRendezvous::new());
        let mut consumers = Vec::new();
        for _ in 0..2 {
            let r = Arc::clone(&r);
            consumers.push(std::thread::spawn(move || r.wait_get()));
        }
        std::thread::sleep(Duration::from_millis(20));
        r.push("l1".into());
        r.push("l2".into());

        let mut got: Vec<String> =
            consumers.into_iter().map(|c| c.join().unwrap().unwrap()).collect();
        got.sort();
        assert_eq!(got, vec!["l1".to_string(), "l2".to_string()]);
    }

    #[test]
    fn test_multiple_waiters_all_released_on_shutdown() {
        let r = Arc::new(LineRendezvous::new());
        let mut consumers = Vec::new();
        for _ in 0..3 {
            let r = Arc::clone(&r);
            consumers.push(std::thread::spawn(move || r.wait_get()));
        }
        std::thread::sleep(Duration::from_millis(20));
        r.shutdown();
        for c in consumers {
            assert_eq!(c.join().unwrap(), None);
        }
    }
}
