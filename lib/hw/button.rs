use stm32g0xx_hal::exti::{Event, ExtiExt};
use stm32g0xx_hal::gpio::gpioa::PA7;
use stm32g0xx_hal::gpio::{Input, PullUp, SignalEdge};
use stm32g0xx_hal::hal::digital::v2::InputPin;
use stm32g0xx_hal::stm32g0::stm32g070::EXTI;

/// Mode button, active low with the internal pull-up.
pub struct ModeButton {
    exti: EXTI,
    pin: PA7<Input<PullUp>>,
}

impl ModeButton {
    pub fn new(pin: PA7<Input<PullUp>>, exti: EXTI) -> Self {
        let mut exti = exti;
        let pin = pin.listen(SignalEdge::Falling, &mut exti);
        ModeButton { exti, pin }
    }

    /// Clears the edge interrupt, returns true when it was a press.
    pub fn unpend(&mut self) -> bool {
        let edge = self.exti.is_pending(Event::GPIO7, SignalEdge::Falling);
        self.exti.unpend(Event::GPIO7);
        // Bounces that are already released again do not count
        edge && self.pin.is_low().unwrap_or(false)
    }
}
