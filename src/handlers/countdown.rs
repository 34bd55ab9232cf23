use std::{rc::Rc, time::Duration};

use log::info;

use crate::handlers::scheduler::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Ready,
    Running,
    Paused,
    TimesUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    TimesUp,
}

/// Deadline timer for the timed minigames. Time is read from a real clock, so
/// slowing or pausing the game simulation does not stretch the deadline.
pub struct Countdown {
    clock: Rc<dyn Clock>,
    duration: Duration,
    remaining: Duration,
    resumed_at: Option<Duration>,
    state: CountdownState,
}

impl Countdown {
    pub fn new(clock: Rc<dyn Clock>, seconds: u64) -> Countdown {
        let duration = Duration::from_secs(seconds);
        Countdown {
            clock,
            duration,
            remaining: duration,
            resumed_at: None,
            state: CountdownState::Ready,
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn reset(&mut self, seconds: Option<u64>) {
        if let Some(seconds) = seconds {
            self.duration = Duration::from_secs(seconds);
        }
        self.remaining = self.duration;
        self.resumed_at = None;
        self.state = CountdownState::Ready;
    }

    pub fn start(&mut self) {
        if matches!(self.state, CountdownState::Ready | CountdownState::Paused) {
            self.resumed_at = Some(self.clock.now());
            self.state = CountdownState::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.state == CountdownState::Running {
            self.remaining = self.remaining();
            self.resumed_at = None;
            self.state = CountdownState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == CountdownState::Paused {
            self.start();
        }
    }

    pub fn remaining(&self) -> Duration {
        match (self.state, self.resumed_at) {
            (CountdownState::Running, Some(resumed_at)) => {
                let elapsed = self.clock.now().saturating_sub(resumed_at);
                self.remaining.saturating_sub(elapsed)
            }
            (CountdownState::TimesUp, _) => Duration::ZERO,
            _ => self.remaining,
        }
    }

    /// `m:ss`, rounded up so the label only reads `0:00` at expiry.
    pub fn label(&self) -> String {
        let remaining = self.remaining();
        let mut seconds = remaining.as_secs();
        if remaining.subsec_nanos() > 0 {
            seconds += 1;
        }
        format!("{}:{:02}", seconds / 60, seconds % 60)
    }

    /// Reports expiry exactly once; later ticks return `None`.
    pub fn tick(&mut self) -> Option<CountdownEvent> {
        if self.state != CountdownState::Running {
            return None;
        }
        if self.remaining() > Duration::ZERO {
            return None;
        }

        self.remaining = Duration::ZERO;
        self.resumed_at = None;
        self.state = CountdownState::TimesUp;
        info!("Countdown expired after {}s", self.duration.as_secs());
        Some(CountdownEvent::TimesUp)
    }
}
