use core::fmt::Write;

use heapless::String;

use crate::acquisition::Acquisition;
use crate::config::{FFT_SAMPLES, OSC_WIDTH, SPECTRUM_NORMALIZATION};
use crate::display::{clamp_row, Color, Dimension, Lcd};
use crate::error::{Error, Result};
use crate::fft::{Fft, BINS};

const BAR_WIDTH: i32 = (OSC_WIDTH / (FFT_SAMPLES / 2)) as i32;

/// Consumer half of the spectrum analyser. Keeps one workspace filling while
/// the other is transformed and drawn.
pub struct SpectrumView {
    fft: Fft,
    last_peak: Option<usize>,
}

impl SpectrumView {
    pub fn new() -> Self {
        SpectrumView {
            fft: Fft::new(),
            last_peak: None,
        }
    }

    pub fn reset(&mut self) {
        self.last_peak = None;
    }

    /// Dominant bin of the last drawn frame.
    pub fn peak(&self) -> Option<usize> {
        self.last_peak
    }

    pub fn step<LCD, LCDER>(&mut self, lcd: &mut LCD, shared: &Acquisition) -> Result<(), LCDER>
    where
        LCD: Lcd<Error = LCDER>,
    {
        // Pending request before the flag, the interrupt publishes them the other way round
        if !shared.arm_pending() && !shared.capturing() {
            if let Some(slot) = (0..2).find(|&slot| !shared.ready(slot)) {
                shared.arm(slot);
                return Ok(());
            }
        }

        let slot = match (0..2).find(|&slot| shared.ready(slot)) {
            Some(slot) => slot,
            None => return Ok(()),
        };
        shared.load_workspace(slot, self.fft.input());
        let result = self.draw(lcd);
        shared.release(slot);
        result
    }

    fn draw<LCD, LCDER>(&mut self, lcd: &mut LCD) -> Result<(), LCDER>
    where
        LCD: Lcd<Error = LCDER>,
    {
        let magnitudes = self.fft.run();
        let mut peak = (0, 0.0);
        for (index, &magnitude) in magnitudes.iter().enumerate() {
            let left = index as i32 * BAR_WIDTH;
            let right = left + BAR_WIDTH - 1;
            let top = bar_top(magnitude);

            lcd.fill_rect(left, top, right, Dimension::BOTTOM, Color::BAR)
                .map_err(Error::Lcd)?;
            if top > 0 {
                lcd.fill_rect(left, 0, right, top - 1, Color::BACKGROUND)
                    .map_err(Error::Lcd)?;
            }
            if magnitude > peak.1 {
                peak = (index + 1, magnitude);
            }
        }

        let peak = if peak.0 == 0 { None } else { Some(peak.0) };
        if peak != self.last_peak {
            debug!("spectrum peak moved to bin {=usize}", peak.unwrap_or(0));
        }
        self.last_peak = peak;
        self.draw_peak(lcd, peak)
    }

    fn draw_peak<LCD, LCDER>(&mut self, lcd: &mut LCD, peak: Option<usize>) -> Result<(), LCDER>
    where
        LCD: Lcd<Error = LCDER>,
    {
        let mut buffer = String::<16>::new();
        let written = match peak {
            Some(bin) => write!(&mut buffer, "PEAK {:>3}", bin),
            None => write!(&mut buffer, "PEAK   -"),
        };
        written.map_err(|_| Error::BufferWrite)?;
        lcd.draw_text(&buffer, PeakText::POSITION.0, PeakText::POSITION.1, Color::TEXT)
            .map_err(Error::Lcd)
    }
}

impl Default for SpectrumView {
    fn default() -> Self {
        SpectrumView::new()
    }
}

struct PeakText;

impl PeakText {
    const WIDTH: i32 = 6 * 8;
    const MARGIN: i32 = 4;
    const POSITION: (i32, i32) = (
        Dimension::RIGHT - PeakText::WIDTH - PeakText::MARGIN,
        PeakText::MARGIN,
    );
}

/// Row of the top of a bar, the full normalisation constant reaches row 0.
pub fn bar_top(magnitude: f32) -> i32 {
    let top = Dimension::BOTTOM as f32 * (1.0 - magnitude / SPECTRUM_NORMALIZATION);
    clamp_row(top as i32)
}

const _: () = assert!(BINS as i32 * BAR_WIDTH <= Dimension::RIGHT);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::mock::RecordingLcd;

    #[test]
    fn bar_scaling() {
        assert_eq!(bar_top(0.0), Dimension::BOTTOM);
        assert_eq!(bar_top(SPECTRUM_NORMALIZATION), 0);
        assert_eq!(bar_top(2.0 * SPECTRUM_NORMALIZATION), 0);
        assert_eq!(bar_top(SPECTRUM_NORMALIZATION / 2.0), 119);
    }

    #[test]
    fn one_arm_request_at_a_time() {
        let shared = Acquisition::new();
        shared.reset(true);
        let mut view = SpectrumView::new();
        let mut lcd = RecordingLcd::default();

        view.step::<_, ()>(&mut lcd, &shared).unwrap();
        assert!(shared.arm_pending());
        // Request not picked up yet: nothing else happens
        view.step::<_, ()>(&mut lcd, &shared).unwrap();
        assert!(lcd.ops.is_empty());

        assert!(shared.accept_arm());
        assert_eq!(shared.capture_index(), 0);
        view.step::<_, ()>(&mut lcd, &shared).unwrap();
        assert!(!shared.arm_pending());
        assert!(lcd.ops.is_empty());
    }

    #[test]
    fn never_arms_a_ready_workspace() {
        let shared = Acquisition::new();
        shared.reset(true);
        let mut view = SpectrumView::new();
        let mut lcd = RecordingLcd::default();

        view.step::<_, ()>(&mut lcd, &shared).unwrap();
        shared.accept_arm();
        for _ in 0..FFT_SAMPLES {
            shared.push_workspace(0);
        }
        assert!(shared.ready(0));

        // Slot 0 waits for the transform, the next capture goes to slot 1
        view.step::<_, ()>(&mut lcd, &shared).unwrap();
        shared.accept_arm();
        assert_eq!(shared.capture_index(), 1);

        view.step::<_, ()>(&mut lcd, &shared).unwrap();
        assert!(!shared.ready(0));
        assert_eq!(lcd.fills(Color::BAR).count(), BINS);
        assert_eq!(lcd.texts().last(), Some("PEAK   -"));
        assert_eq!(view.peak(), None);
    }
}
