use std::time::{Duration, Instant};

/// Source of elapsed time for the session's timers.
pub trait Clock {
    /// Time since the previous call.
    fn lap(&mut self) -> Duration;
}

pub struct SystemClock {
    last: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { last: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        elapsed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Movement,
    Countdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    interval: Duration,
    carry: Duration,
}

impl Timer {
    fn new(interval: Duration) -> Self {
        Timer { interval, carry: Duration::ZERO }
    }

    fn until_due(&self) -> Duration {
        self.interval.saturating_sub(self.carry)
    }
}

/// The movement and countdown timers. They tick independently but are only
/// ever started and stopped together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timers {
    movement: Timer,
    countdown: Timer,
    running: bool,
}

impl Timers {
    pub fn new(movement: Duration, countdown: Duration) -> Self {
        Timers { movement: Timer::new(movement), countdown: Timer::new(countdown), running: false }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Suspends both timers, keeping the time each has already accumulated.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stops both timers and forgets any accumulated time.
    pub fn reset(&mut self) {
        self.running = false;
        self.movement.carry = Duration::ZERO;
        self.countdown.carry = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Takes the next tick that fits into `budget`, in the order the ticks
    /// would have fired, and charges its wait against `budget`. Whatever is left
    /// when nothing more is due is banked towards the next call.
    pub fn next_tick(&mut self, budget: &mut Duration) -> Option<Tick> {
        if !self.running {
            return None;
        }

        let to_move = self.movement.until_due();
        let to_count = self.countdown.until_due();
        let (tick, wait) = if to_move <= to_count {
            (Tick::Movement, to_move)
        } else {
            (Tick::Countdown, to_count)
        };

        if wait > *budget {
            self.movement.carry += *budget;
            self.countdown.carry += *budget;
            *budget = Duration::ZERO;
            return None;
        }

        *budget -= wait;
        self.movement.carry += wait;
        self.countdown.carry += wait;
        match tick {
            Tick::Movement => self.movement.carry = Duration::ZERO,
            Tick::Countdown => self.countdown.carry = Duration::ZERO,
        }
        Some(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timers: &mut Timers, elapsed: Duration) -> Vec<Tick> {
        let mut budget = elapsed;
        std::iter::from_fn(|| timers.next_tick(&mut budget)).collect()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn stopped_timers_never_fire() {
        let mut timers = Timers::new(ms(100), ms(1000));
        assert!(drain(&mut timers, ms(5000)).is_empty());
    }

    #[test]
    fn ticks_come_out_in_time_order() {
        let mut timers = Timers::new(ms(100), ms(250));
        timers.start();
        use Tick::*;
        assert_eq!(
            drain(&mut timers, ms(500)),
            vec![Movement, Movement, Countdown, Movement, Movement, Movement, Countdown]
        );
    }

    #[test]
    fn partial_intervals_carry_over() {
        let mut timers = Timers::new(ms(100), ms(1000));
        timers.start();
        assert!(drain(&mut timers, ms(60)).is_empty());
        assert_eq!(drain(&mut timers, ms(60)), vec![Tick::Movement]);
    }

    #[test]
    fn stop_keeps_progress_and_reset_drops_it() {
        let mut timers = Timers::new(ms(100), ms(1000));
        timers.start();
        drain(&mut timers, ms(80));

        timers.stop();
        assert!(drain(&mut timers, ms(1000)).is_empty());
        timers.start();
        assert_eq!(drain(&mut timers, ms(20)), vec![Tick::Movement]);

        drain(&mut timers, ms(80));
        timers.reset();
        assert!(!timers.is_running());
        timers.start();
        assert!(drain(&mut timers, ms(20)).is_empty());
    }
}
