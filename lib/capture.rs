use crate::acquisition::{self, Acquisition};
use crate::config::{
    ScopeConfig, ADC_FULL_SCALE, ADC_MIDPOINT, DISPLAY_HEIGHT, OSC_WIDTH, OVERSAMPLING,
};
use crate::sampler::RawSample;
use crate::trigger::TriggerMode;

/// Producer half of the acquisition, runs once per sample tick in the
/// sample interrupt.
pub struct Capture {
    config: ScopeConfig,
}

impl Capture {
    pub fn new(config: ScopeConfig) -> Self {
        Capture { config }
    }

    pub fn tick(&mut self, shared: &Acquisition, raw: RawSample) {
        acquisition::count_tick();
        if shared.spectrum() {
            self.tick_spectrum(shared, raw);
        } else {
            self.tick_scope(shared, raw);
        }
    }

    fn tick_spectrum(&mut self, shared: &Acquisition, raw: RawSample) {
        shared.accept_arm();
        if shared.capturing() {
            shared.push_workspace(center(raw));
        }
    }

    fn tick_scope(&mut self, shared: &Acquisition, raw: RawSample) {
        let a = to_row(raw.a(), self.config.vertical_offset[0]);
        let b = to_row(raw.b(), self.config.vertical_offset[1]);

        if !shared.capturing() && self.should_start(shared, a) {
            let trigger = self.config.trigger;
            match self.config.mode {
                TriggerMode::FreeRun => {
                    shared.restart_cursor();
                    shared.start_epoch(0, 0);
                }
                TriggerMode::Edge => {
                    let x = trigger.x as usize;
                    let offset = (shared.capture_pos() + OSC_WIDTH - x) % OSC_WIDTH;
                    shared.start_epoch(offset, x);
                }
            }
        }

        shared.push_trace(a, b);
        shared.set_previous(a);
    }

    fn should_start(&self, shared: &Acquisition, current: i16) -> bool {
        self.config.trigger.fires(
            self.config.mode,
            shared.previous(),
            current,
            shared.buffer_samples(),
            shared.blocked(),
        )
    }
}

/// Oscilloscope scaling: full scale onto the display height, shifted up by `offset`.
pub fn to_row(mean: f32, offset: u8) -> i16 {
    let row = (mean * DISPLAY_HEIGHT as f32 / ADC_FULL_SCALE as f32) as i32 - offset as i32;
    row.max(0).min(DISPLAY_HEIGHT - 1) as i16
}

/// Spectrum scaling: channel A signed around the converter midpoint, in
/// `1 / OVERSAMPLING` counts so the fraction of the mean survives.
pub fn center(raw: RawSample) -> i16 {
    (OVERSAMPLING as i32 * ADC_MIDPOINT as i32 - raw.sum_a() as i32) as i16
}
