#![cfg_attr(not(test), no_std)]

#[cfg(target_os = "none")]
use defmt_rtt as _; // global logger
#[cfg(target_os = "none")]
use panic_probe as _;

#[macro_use]
mod logging;

pub mod acquisition;
pub mod capture;
pub mod config;
pub mod display;
pub mod error;
pub mod fft;
#[cfg(target_os = "none")]
pub mod hw;
pub mod instrument;
pub mod lut;
pub mod mode;
pub mod sampler;
pub mod scope;
pub mod spectrum;
pub mod trigger;

/// Raw DMA target: `[A, B]` conversion pairs, oversampled four times.
pub type Buffer = [u16; 2 * config::OVERSAMPLING];

#[cfg(target_os = "none")]
defmt::timestamp!("{=u32}", acquisition::ticks());
