use std::time::{Duration, Instant};

pub const TIMER_HZ: u32 = 60;

/// Delay and sound countdown pair. The host calls `tick` at 60 Hz of
/// wall time, however many instructions ran in between.
#[derive(Debug, Default)]
pub struct Timers {
    delay: u8,
    sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}

/// Fixed-rate schedule over wall time. `due` reports how many whole
/// periods elapsed since the previous call and moves the deadline
/// forward by exactly that many, so periods are neither dropped when a
/// poll comes late nor replayed when polls come fast.
pub struct Cadence {
    period: Duration,
    next: Instant,
}

impl Cadence {
    pub fn new(hz: u32, now: Instant) -> Self {
        let period = Duration::from_secs(1) / hz;
        Self {
            period,
            next: now + period,
        }
    }

    pub fn due(&mut self, now: Instant) -> u32 {
        let mut periods = 0;
        while now >= self.next {
            self.next += self.period;
            periods += 1;
        }
        periods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_to_zero_and_stays() {
        let mut timers = Timers::new();
        timers.set_delay(10);
        for _ in 0..10 {
            timers.tick();
        }
        assert_eq!(timers.delay(), 0);
        timers.tick();
        assert_eq!(timers.delay(), 0);
    }

    #[test]
    fn sound_active_tracks_the_counter() {
        let mut timers = Timers::new();
        assert!(!timers.sound_active());
        timers.set_sound(2);
        assert!(timers.sound_active());
        timers.tick();
        assert!(timers.sound_active());
        timers.tick();
        assert!(!timers.sound_active());
    }

    #[test]
    fn cadence_counts_whole_periods() {
        let start = Instant::now();
        let mut clock = Cadence::new(60, start);
        assert_eq!(clock.due(start), 0);
        assert_eq!(clock.due(start + Duration::from_millis(50)), 3);
        // same instant again owes nothing
        assert_eq!(clock.due(start + Duration::from_millis(50)), 0);
    }

    #[test]
    fn cadence_catches_up_without_losing_ticks() {
        let start = Instant::now();
        let mut clock = Cadence::new(60, start);
        let mut total = clock.due(start + Duration::from_millis(50));
        total += clock.due(start + Duration::from_secs(1));
        assert_eq!(total, 60);
    }
}
