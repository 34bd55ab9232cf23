use std::{
    cell::Cell,
    time::{Duration, Instant},
};

/// Monotonic time elapsed since the clock's origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time, independent of any game speed scaling.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[derive(Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

struct Scheduled<T> {
    handle: TaskHandle,
    due: Duration,
    task: T,
}

/// Continuations waiting for "elapsed time >= due". Nothing runs on its own;
/// the owner drains due tasks with [`Scheduler::take_due`].
pub struct Scheduler<T> {
    pending: Vec<Scheduled<T>>,
    next_id: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Scheduler<T> {
        Scheduler {
            pending: Vec::new(),
            next_id: 0,
        }
    }

    pub fn schedule(&mut self, now: Duration, delay: Duration, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            handle,
            due: now + delay,
            task,
        });
        handle
    }

    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending
            .iter()
            .any(|scheduled| scheduled.handle == handle)
    }

    /// Removes and returns every task due at `now`, earliest first. Ties keep
    /// scheduling order.
    pub fn take_due(&mut self, now: Duration) -> Vec<T> {
        let (mut due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|scheduled| scheduled.due <= now);
        self.pending = waiting;

        due.sort_by_key(|scheduled| (scheduled.due, scheduled.handle.0));
        due.into_iter().map(|scheduled| scheduled.task).collect()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|scheduled| scheduled.due).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Scheduler::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn tasks_wait_for_their_delay() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(clock.now(), ms(500), "show");

        clock.advance(ms(499));
        assert!(scheduler.take_due(clock.now()).is_empty());

        clock.advance(ms(1));
        assert_eq!(scheduler.take_due(clock.now()), vec!["show"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn due_tasks_come_out_in_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(0), ms(300), 3);
        scheduler.schedule(ms(0), ms(100), 1);
        scheduler.schedule(ms(0), ms(100), 2);
        scheduler.schedule(ms(0), ms(900), 9);

        assert_eq!(scheduler.next_due(), Some(ms(100)));
        assert_eq!(scheduler.take_due(ms(300)), vec![1, 2, 3]);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut scheduler = Scheduler::new();
        let keep = scheduler.schedule(ms(0), ms(10), "keep");
        let dropped = scheduler.schedule(ms(0), ms(10), "drop");

        assert!(scheduler.cancel(dropped));
        assert!(!scheduler.cancel(dropped));
        assert!(scheduler.is_pending(keep));
        assert_eq!(scheduler.take_due(ms(10)), vec!["keep"]);
    }

    #[test]
    fn cancel_all_discards_everything() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(0), ms(10), 'a');
        scheduler.schedule(ms(0), ms(20), 'b');
        assert_eq!(scheduler.cancel_all(), 2);
        assert!(scheduler.take_due(ms(1_000)).is_empty());
        assert_eq!(scheduler.next_due(), None);
    }

    #[test]
    fn zero_delay_is_due_immediately() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(40), Duration::ZERO, ());
        assert_eq!(scheduler.take_due(ms(40)).len(), 1);
    }
}
