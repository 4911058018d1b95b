//! The countdown timers of the machine.
//!
//! The chip carries two of these, the delay and the sound timer. Both count
//! down towards zero at a fixed `60 Hz` cadence, but the cadence itself is
//! driven from the outside: the engine owns no thread or clock, the driver
//! calls [`tick`](Timer::tick) at the timer rate, decoupled from the much
//! faster instruction rate.
use crate::definitions::timer;

/// A single `8-bit` countdown timer.
///
/// Counts down at [`timer::HERTZ`] until it reaches 0, then stays there
/// until a new value is set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    value: u8,
}

impl Timer {
    /// Will create a new timer starting at the given value.
    pub fn new(value: u8) -> Self {
        Self { value }
    }

    /// Will decrement the timer by one, saturating at zero. Must be called
    /// by the external driver at the [`timer::HERTZ`] cadence.
    pub fn tick(&mut self) {
        self.value = self.value.saturating_sub(1);
    }

    /// Will set the value from which the timer shall count down from.
    pub fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    /// Will get the value that the counter is currently at.
    pub fn get_value(&self) -> u8 {
        self.value
    }
}
