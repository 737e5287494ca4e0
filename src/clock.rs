use std::time::{Duration, Instant};

/// Wall-clock pacing for one periodic caller (CPU cycles or timer decay).
pub struct Clock {
    period: Duration,
    last_updated: Instant,
    max_catch_up: u32,
}

impl Clock {
    pub fn new(hz: u32) -> Self {
        Self::starting_at(hz, Instant::now())
    }

    pub fn starting_at(hz: u32, start: Instant) -> Self {
        let hz = hz.max(1);
        Self {
            period: Duration::from_secs(1) / hz,
            last_updated: start,
            // never replay more than a tenth of a second after a stall
            max_catch_up: (hz / 10).max(1),
        }
    }

    /// Periods that have elapsed since the last call.
    pub fn due(&mut self) -> u32 {
        self.due_at(Instant::now())
    }

    pub fn due_at(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.last_updated);
        let ticks = elapsed.as_nanos() / self.period.as_nanos().max(1);
        if ticks > self.max_catch_up as u128 {
            log::debug!("clock fell {} ticks behind, skipping ahead", ticks);
            self.last_updated = now;
            return self.max_catch_up;
        }
        let ticks = ticks as u32;
        self.last_updated += self.period * ticks;
        ticks
    }
}
