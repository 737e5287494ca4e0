/// Rate at which the delay and sound timers count down.
pub const TIMER_HZ: u32 = 60;

/// Delay and sound countdowns. Driven by an external 60 Hz clock, never by
/// instruction execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
