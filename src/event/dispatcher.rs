//! Cross-thread event and task queues
//!
//! A pair of FIFO queues (platform events, deferred tasks) that arbitrary
//! producer threads push into and a single owner thread drains. One mutex
//! guards both queues together with the "has work" notifier, so clearing
//! the notifier in `wait_for_work` is atomic with respect to every push:
//! a racing push either lands before the clear (and is seen by the
//! following drain) or re-sets the notifier for the next cycle. No wakeup
//! can be lost.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use log::{debug, trace};

/// Queue liveness. Transitions only `Active -> ShuttingDown -> Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Active,
    ShuttingDown,
    Inactive,
}

struct Inner<E, T> {
    events: VecDeque<E>,
    tasks: VecDeque<T>,
    has_work: bool,
    state: Liveness,
}

/// Two-queue waiter shared between producers and the owner thread.
///
/// Pushes while the dispatcher is not `Active` are dropped silently; that
/// is deliberate shutdown backpressure, not an error.
pub struct Dispatcher<E, T> {
    inner: Mutex<Inner<E, T>>,
    cond: Condvar,
}

impl<E, T> Default for Dispatcher<E, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, T> Dispatcher<E, T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                events: VecDeque::new(),
                tasks: VecDeque::new(),
                has_work: false,
                state: Liveness::Active,
            }),
            cond: Condvar::new(),
        }
    }

    pub fn state(&self) -> Liveness {
        self.lock().state
    }

    /// Queue a platform event. Dropped unless `Active`.
    pub fn push_event(&self, event: E) {
        let mut inner = self.lock();
        if inner.state != Liveness::Active {
            trace!("push_event dropped: dispatcher not active");
            return;
        }
        inner.events.push_back(event);
        inner.has_work = true;
        drop(inner);
        self.cond.notify_one();
    }

    /// Queue a deferred task. Dropped unless `Active`.
    pub fn push_task(&self, task: T) {
        let mut inner = self.lock();
        if inner.state != Liveness::Active {
            trace!("push_task dropped: dispatcher not active");
            return;
        }
        inner.tasks.push_back(task);
        inner.has_work = true;
        drop(inner);
        self.cond.notify_one();
    }

    /// Block until work is queued or `timeout` elapses.
    ///
    /// Returns true when work was signaled. The notifier is cleared under
    /// the queue lock before returning, so the caller's subsequent drain
    /// observes at least every item that set it.
    pub fn wait_for_work(&self, timeout: Duration) -> bool {
        let mut inner = self.lock();
        while !inner.has_work {
            let (guard, result) = match self.cond.wait_timeout(inner, timeout) {
                Ok(pair) => pair,
                Err(poisoned) => poisoned.into_inner(),
            };
            inner = guard;
            if result.timed_out() && !inner.has_work {
                return false;
            }
        }
        inner.has_work = false;
        true
    }

    /// Pop the oldest queued event, if any. Owner thread only.
    pub fn pop_event(&self) -> Option<E> {
        self.lock().events.pop_front()
    }

    /// Pop the oldest queued task, if any. Owner thread only.
    pub fn pop_task(&self) -> Option<T> {
        self.lock().tasks.pop_front()
    }

    /// Discard leftovers and return to `Active` (startup / reuse).
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.events.clear();
        inner.tasks.clear();
        inner.has_work = false;
        inner.state = Liveness::Active;
    }

    /// Flip to `ShuttingDown` and discard queued items.
    ///
    /// The state flip and the discard happen under the push lock, so a
    /// racing push is either accepted before the flip (and discarded
    /// here, never half-processed) or rejected after it. Nothing is
    /// accepted once the discard has begun. The notifier is raised so a
    /// blocked owner observes the state change without waiting out its
    /// timeout.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        inner.state = Liveness::ShuttingDown;
        let dropped = inner.events.len() + inner.tasks.len();
        inner.events.clear();
        inner.tasks.clear();
        inner.has_work = true;
        if dropped > 0 {
            debug!("dispatcher shutdown discarded {} queued item(s)", dropped);
        }
        drop(inner);
        self.cond.notify_all();
    }

    /// Terminal state; pushes stay rejected forever.
    pub fn set_inactive(&self) {
        self.lock().state = Liveness::Inactive;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<E, T>> {
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
    use std::time::Instant;

    #[test]
    fn test_fifo_within_each_queue() {
        let d: Dispatcher<u32, u32> = Dispatcher::new();
        d.push_event(1);
        d.push_event(2);
        d.push_task(10);
        d.push_task(20);
        assert_eq!(d.pop_event(), Some(1));
        assert_eq!(d.pop_event(), Some(2));
        assert_eq!(d.pop_event(), None);
        assert_eq!(d.pop_task(), Some(10));
        assert_eq!(d.pop_task(), Some(20));
        assert_eq!(d.pop_task(), None);
    }

    #[test]
    fn test_push_before_wait_is_not_lost() {
        let d: Dispatcher<u32, u32> = Dispatcher::new();
        d.push_event(7);
        assert!(d.wait_for_work(Duration::from_millis(1)));
        assert_eq!(d.pop_event(), Some(7));
    }

    #[test]
    fn test_wait_times_out_without_work() {
        let d: Dispatcher<u32, u32> = Dispatcher::new();
        let begin = Instant::now();
        assert!(!d.wait_for_work(Duration::from_millis(10)));
        assert!(begin.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn test_push_wakes_blocked_waiter() {
        let d: Arc<Dispatcher<u32, u32>> = Arc::new(Dispatcher::new());
        let producer = {
            let d = Arc::clone(&d);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(20));
                d.push_event(42);
            })
        };
        assert!(d.wait_for_work(Duration::from_secs(5)));
        assert_eq!(d.pop_event(), Some(42));
        producer.join().unwrap();
    }

    #[test]
    fn test_push_after_shutdown_is_dropped() {
        let d: Dispatcher<u32, u32> = Dispatcher::new();
        d.shutdown();
        assert_eq!(d.state(), Liveness::ShuttingDown);
        d.push_event(1);
        d.push_task(2);
        assert_eq!(d.pop_event(), None);
        assert_eq!(d.pop_task(), None);
    }

    #[test]
    fn test_shutdown_discards_queued_items() {
        let d: Dispatcher<u32, u32> = Dispatcher::new();
        d.push_event(1);
        d.push_task(2);
        d.shutdown();
        assert_eq!(d.pop_event(), None);
        assert_eq!(d.pop_task(), None);
    }

    #[test]
    fn test_shutdown_wakes_blocked_waiter() {
        let d: Arc<Dispatcher<u32, u32>> = Arc::new(Dispatcher::new());
        let closer = {
            let d = Arc::clone(&d);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(20));
                d.shutdown();
            })
        };
        assert!(d.wait_for_work(Duration::from_secs(5)));
        assert_eq!(d.state(), Liveness::ShuttingDown);
        closer.join().unwrap();
    }

    #[test]
    fn test_reset_reactivates() {
        let d: Dispatcher<u32, u32> = Dispatcher::new();
        d.shutdown();
        d.reset();
        assert_eq!(d.state(), Liveness::Active);
        d.push_event(3);
        assert_eq!(d.pop_event(), Some(3));
    }

    #[test]
    fn test_notifier_cleared_then_reset_by_later_push() {
        let d: Dispatcher<u32, u32> = Dispatcher::new();
        d.push_event(1);
        assert!(d.wait_for_work(Duration::from_millis(1)));
        // Notifier consumed; next wait must block until a new push.
        assert!(!d.wait_for_work(Duration::from_millis(5)));
        d.push_event(2);
        assert!(d.wait_for_work(Duration::from_millis(1)));
    }
}
