mod adc;
mod button;
mod helper;
mod lcd;
mod timers;

pub use adc::AdcConfig;
pub use button::ModeButton;
pub use helper::*;
pub use lcd::IliError;
pub use timers::SampleTimer;
