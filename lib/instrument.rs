use crate::acquisition::Acquisition;
use crate::config::ScopeConfig;
use crate::display::{Color, Lcd};
use crate::error::{Error, Result};
use crate::mode::{Mode, ModeSwitch, SampleClock};
use crate::scope::ScopeView;
use crate::spectrum::SpectrumView;

/// Main loop of the instrument: handles mode switches and runs the active view.
pub struct Instrument<LCD> {
    lcd: LCD,
    mode: Mode,
    handled_presses: u8,
    scope: ScopeView,
    spectrum: SpectrumView,
}

impl<LCD, LCDER> Instrument<LCD>
where
    LCD: Lcd<Error = LCDER>,
{
    /// Clears the screen and arms acquisition in `mode`. Call before the
    /// sample clock is started.
    pub fn new(
        lcd: LCD,
        config: ScopeConfig,
        mode: Mode,
        shared: &Acquisition,
        switch: &ModeSwitch,
    ) -> Result<Self, LCDER> {
        let config = config.validate::<LCDER>().map_err(|error| {
            warn!("trigger column {=u16} outside of the capture", config.trigger.x);
            error
        })?;
        let mut instrument = Instrument {
            lcd,
            mode,
            handled_presses: switch.presses(),
            scope: ScopeView::new(config.trigger),
            spectrum: SpectrumView::new(),
        };
        instrument.lcd.clear(Color::BACKGROUND).map_err(Error::Lcd)?;
        shared.reset(mode.is_spectrum());
        info!(
            "starting in {:?}, trigger at column {=u16} level {=i16}",
            mode,
            config.trigger.x,
            config.trigger.y
        );
        Ok(instrument)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn lcd(&self) -> &LCD {
        &self.lcd
    }

    /// One main loop iteration.
    pub fn step<C>(
        &mut self,
        shared: &Acquisition,
        switch: &ModeSwitch,
        clock: &mut C,
    ) -> Result<(), LCDER>
    where
        C: SampleClock,
    {
        let presses = switch.presses();
        if presses != self.handled_presses {
            self.handled_presses = presses;
            self.switch_mode(shared, clock)?;
        }

        match self.mode {
            Mode::Oscilloscope => self.scope.step(&mut self.lcd, shared),
            Mode::Spectrum => self.spectrum.step(&mut self.lcd, shared),
        }
    }

    /// Toggles the mode, dropping every epoch and workspace in flight.
    pub fn switch_mode<C>(&mut self, shared: &Acquisition, clock: &mut C) -> Result<(), LCDER>
    where
        C: SampleClock,
    {
        clock.pause();
        let cleared = self.lcd.clear(Color::BACKGROUND);
        self.mode = self.mode.toggled();
        shared.reset(self.mode.is_spectrum());
        self.scope.reset();
        self.spectrum.reset();
        clock.resume();

        info!("switched to {:?}", self.mode);
        cleared.map_err(Error::Lcd)
    }
}
