//! Serial bus clock derived from the reference tick.

/// Transition observed on the bus clock during one reference tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransitionEvent {
    /// Clock went from low to high.
    RisingEdge,
    /// Clock went from high to low.
    FallingEdge,
    /// Clock level did not change.
    None,
}

impl TransitionEvent {
    /// Classifies the change from `previous` to `current`.
    pub const fn between(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => Self::RisingEdge,
            (true, false) => Self::FallingEdge,
            _ => Self::None,
        }
    }
}

/// Divided bus clock that only runs while a transfer is shifting.
///
/// The level toggles every `half_period` reference ticks while active. When
/// inactive the clock sits at its idle level and the phase counter is cleared,
/// so every transfer starts from the same phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitClock {
    half_period: u32,
    count: u32,
    level: bool,
    idle: bool,
}

impl BitClock {
    /// Creates a clock toggling every `half_period` ticks and idling at `idle`.
    pub const fn new(half_period: u32, idle: bool) -> Self {
        Self {
            half_period,
            count: 0,
            level: idle,
            idle,
        }
    }

    /// Advances one reference tick and reports the resulting transition.
    pub fn tick(&mut self, active: bool) -> TransitionEvent {
        let previous = self.level;

        if active {
            self.count += 1;
            if self.count >= self.half_period {
                self.count = 0;
                self.level = !self.level;
            }
        } else {
            self.count = 0;
            self.level = self.idle;
        }

        TransitionEvent::between(previous, self.level)
    }

    /// Current clock level.
    pub const fn level(&self) -> bool {
        self.level
    }

    /// Returns the clock to its idle level with a cleared phase.
    pub fn reset(&mut self) {
        self.count = 0;
        self.level = self.idle;
    }
}
