use std::{
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// Interval between timer decrements (60 Hz).
pub const TIMER_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// The `Chip8` delay and sound timers, decremented at 60 Hz independently
/// of the instruction rate.
///
/// The sound timer is shared as an `Arc<AtomicU8>` so the audio
/// collaborator can poll it without borrowing the machine; tone is active
/// while it is nonzero.
pub struct Clock {
    pub delay_timer: u8,
    pub sound_timer: Arc<AtomicU8>,
    last_tick: Instant,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            delay_timer: 0,
            sound_timer: Arc::default(),
            last_tick: Instant::now(),
        }
    }
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catch the timers up to wall-clock time, ticking once per elapsed
    /// 60 Hz interval. Instruction throughput never stalls this; a slow
    /// burst of cycles is made up for by multiple ticks here.
    pub fn update(&mut self) {
        while self.last_tick.elapsed() >= TIMER_INTERVAL {
            self.tick();
            self.last_tick += TIMER_INTERVAL;
        }
    }

    /// Decrement both timers once, saturating at zero.
    pub fn tick(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        if self.sound_timer.load(Ordering::SeqCst) > 0 {
            self.sound_timer.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Whether the audio collaborator should be emitting a tone.
    pub fn tone_active(&self) -> bool {
        self.sound_timer.load(Ordering::SeqCst) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_timer_reaches_zero_and_stays_there() {
        let mut clock = Clock::new();
        clock.delay_timer = 10;
        // 600ms of 60Hz ticks
        for _ in 0..36 {
            clock.tick();
        }
        assert_eq!(clock.delay_timer, 0);
        clock.tick();
        assert_eq!(clock.delay_timer, 0);
    }

    #[test]
    fn sound_timer_never_goes_negative() {
        let mut clock = Clock::new();
        clock.sound_timer.store(2, Ordering::SeqCst);
        for _ in 0..5 {
            clock.tick();
        }
        assert_eq!(clock.sound_timer.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn tone_is_active_while_sound_timer_nonzero() {
        let mut clock = Clock::new();
        assert!(!clock.tone_active());
        clock.sound_timer.store(1, Ordering::SeqCst);
        assert!(clock.tone_active());
        clock.tick();
        assert!(!clock.tone_active());
    }
}
