//! Virtual timers for delayed drill transitions.
//!
//! Drills never sleep. They schedule events on a [`Timers`] queue and the
//! caller moves the queue's clock forward, either with real elapsed time or,
//! in tests, with whatever step it likes.

use std::time::Duration;

/// Cancellation handle for a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Pending<E> {
    handle: TimerHandle,
    due: Duration,
    event: E,
}

/// Queue of events due at points on a virtual clock.
#[derive(Debug)]
pub struct Timers<E> {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<E> Timers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            due: self.now + delay,
            event,
        });
        handle
    }

    /// Cancel one event. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Time left until the earliest pending event.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|p| p.due.saturating_sub(self.now))
            .min()
    }

    /// The virtual time `elapsed` from now.
    pub fn deadline(&self, elapsed: Duration) -> Duration {
        self.now + elapsed
    }

    /// Remove and return the earliest event due at or before `deadline`.
    ///
    /// The clock moves to that event's due time, so events scheduled while
    /// handling it are measured from when it fired. Ties fire in scheduling
    /// order.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<E> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= deadline)
            .min_by_key(|(_, p)| (p.due, p.handle.0))
            .map(|(idx, _)| idx)?;
        let fired = self.pending.remove(idx);
        self.now = self.now.max(fired.due);
        Some(fired.event)
    }

    /// Move the clock to `deadline` once every due event has been popped.
    pub fn settle(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}
