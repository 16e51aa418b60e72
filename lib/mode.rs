use core::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Mode {
    Oscilloscope,
    Spectrum,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Oscilloscope => Mode::Spectrum,
            Mode::Spectrum => Mode::Oscilloscope,
        }
    }

    pub fn is_spectrum(self) -> bool {
        self == Mode::Spectrum
    }
}

/// Debounced button presses, counted by the button interrupt.
///
/// The main loop remembers how many it handled, so the counter has a single writer.
pub struct ModeSwitch {
    presses: AtomicU8,
}

impl ModeSwitch {
    pub const fn new() -> Self {
        ModeSwitch {
            presses: AtomicU8::new(0),
        }
    }

    /// Called from the button interrupt on a press edge.
    pub fn press(&self) {
        let presses = self.presses.load(Ordering::Relaxed).wrapping_add(1);
        self.presses.store(presses, Ordering::Release);
    }

    pub fn presses(&self) -> u8 {
        self.presses.load(Ordering::Acquire)
    }
}

impl Default for ModeSwitch {
    fn default() -> Self {
        ModeSwitch::new()
    }
}

/// The periodic sample interrupt source.
pub trait SampleClock {
    fn pause(&mut self);
    fn resume(&mut self);
}
