use crate::error::{Error, Result};
use crate::trigger::{TriggerConfig, TriggerMode};

/// Capture width of one oscilloscope buffer, one sample per screen column.
pub const OSC_WIDTH: usize = 320;
/// Transform length of the spectrum analyser.
pub const FFT_SAMPLES: usize = 512;
/// Entries per period of the sine table.
pub const LUT_SIZE: usize = 1024;

pub const DISPLAY_WIDTH: i32 = 320;
pub const DISPLAY_HEIGHT: i32 = 240;

/// 12-bit converter.
pub const ADC_FULL_SCALE: u32 = 4096;
pub const ADC_MIDPOINT: i16 = 2047;
/// Conversions averaged into one sample per channel.
pub const OVERSAMPLING: usize = 4;

pub const SAMPLE_RATE_HZ: u32 = 20_000;

/// Bin magnitude mapped to the top row of the spectrum.
pub const SPECTRUM_NORMALIZATION: f32 = (512 * FFT_SAMPLES) as f32;

/// Offset of the trigger marker column behind the trigger position.
pub const MARKER_DELAY: usize = 4;

const _: () = assert!(FFT_SAMPLES.is_power_of_two());
const _: () = assert!(LUT_SIZE.is_power_of_two());
const _: () = assert!(LUT_SIZE % FFT_SAMPLES == 0);
const _: () = assert!(LUT_SIZE % 4 == 0);
const _: () = assert!(FFT_SAMPLES / 2 <= DISPLAY_WIDTH as usize);
const _: () = assert!(OSC_WIDTH <= DISPLAY_WIDTH as usize);

/// Runtime-adjustable part of the oscilloscope setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScopeConfig {
    pub trigger: TriggerConfig,
    pub mode: TriggerMode,
    /// Rows subtracted from channel A and B after scaling.
    pub vertical_offset: [u8; 2],
}

impl ScopeConfig {
    pub fn validate<LCDER>(self) -> Result<Self, LCDER> {
        if self.trigger.x as usize >= OSC_WIDTH {
            return Err(Error::TriggerPosition);
        }
        Ok(self)
    }
}

impl Default for ScopeConfig {
    fn default() -> Self {
        ScopeConfig {
            trigger: TriggerConfig { x: 0, y: 125 },
            mode: TriggerMode::Edge,
            vertical_offset: [30, 30],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ScopeConfig::default().validate::<()>().is_ok());
    }

    #[test]
    fn trigger_outside_buffer_is_rejected() {
        let config = ScopeConfig {
            trigger: TriggerConfig {
                x: OSC_WIDTH as u16,
                y: 100,
            },
            ..ScopeConfig::default()
        };
        assert!(matches!(
            config.validate::<()>(),
            Err(Error::TriggerPosition)
        ));
    }
}
