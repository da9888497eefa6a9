// crates/dubcut-api/src/schedule.rs
//
// Explicit scheduling primitives for the UI loop. Both are plain values
// consulted once per frame — no timer threads, nothing to leak on teardown
// beyond dropping (or calling cancel/stop on) the handle.

use std::time::{Duration, Instant};

/// A restartable one-shot deadline. Used for the 1.5 s note auto-save:
/// every edit re-arms it, so only the final state after a pause is written
/// (last-edit-wins, at most one save conceptually in flight).
#[derive(Debug)]
pub struct Debounce {
    delay:    Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// (Re)start the window. A pending fire is superseded.
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once when the window has elapsed; disarms itself.
    pub fn fire_due(&mut self) -> bool {
        self.fire_due_at(Instant::now())
    }

    fn fire_due_at(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// A fixed-interval ticker. Used for the 3 s processing-status poll; only
/// runs while started, so stopping it on teardown is all the cleanup needed.
#[derive(Debug)]
pub struct Poller {
    interval: Duration,
    next:     Option<Instant>,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self { interval, next: None }
    }

    /// First tick fires one full interval from now.
    pub fn start(&mut self) {
        self.next = Some(Instant::now() + self.interval);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// True when a tick is due; schedules the next one.
    pub fn due(&mut self) -> bool {
        self.due_at(Instant::now())
    }

    fn due_at(&mut self, now: Instant) -> bool {
        match self.next {
            Some(n) if now >= n => {
                self.next = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_fires_once_after_delay() {
        let mut d = Debounce::new(Duration::from_millis(100));
        let t0 = Instant::now();
        d.arm();
        assert!(!d.fire_due_at(t0 + Duration::from_millis(50)));
        assert!(d.fire_due_at(t0 + Duration::from_millis(150)));
        // Disarmed after firing.
        assert!(!d.fire_due_at(t0 + Duration::from_millis(300)));
        assert!(!d.is_armed());
    }

    #[test]
    fn rearm_restarts_the_window() {
        let mut d = Debounce::new(Duration::from_millis(100));
        d.arm();
        let first_deadline = d.deadline.unwrap();
        std::thread::sleep(Duration::from_millis(5));
        d.arm();
        assert!(d.deadline.unwrap() > first_deadline);
    }

    #[test]
    fn cancel_suppresses_fire() {
        let mut d = Debounce::new(Duration::from_millis(0));
        d.arm();
        d.cancel();
        assert!(!d.fire_due());
    }

    #[test]
    fn poller_ticks_on_interval_and_stops() {
        let mut p = Poller::new(Duration::from_millis(100));
        let t0 = Instant::now();
        p.start();
        assert!(!p.due_at(t0 + Duration::from_millis(50)));
        assert!(p.due_at(t0 + Duration::from_millis(120)));
        // Next tick is a full interval after the one that fired.
        assert!(!p.due_at(t0 + Duration::from_millis(150)));
        p.stop();
        assert!(!p.due_at(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn stopped_poller_never_fires() {
        let mut p = Poller::new(Duration::from_millis(0));
        assert!(!p.due());
    }
}
