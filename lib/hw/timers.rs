use cortex_m::peripheral::NVIC;
use stm32g0xx_hal::hal::timer::CountDown;
use stm32g0xx_hal::hal::PwmPin as PwmPinTrait;
use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::stm32::Interrupt;
use stm32g0xx_hal::stm32g0::stm32g070::{TIM1, TIM6};
use stm32g0xx_hal::time::Hertz;
use stm32g0xx_hal::timer::pins::TimerPin;
use stm32g0xx_hal::timer::pwm::{Pwm, PwmExt, PwmPin};
use stm32g0xx_hal::timer::{Channel4, Timer, TimerExt};

use crate::mode::SampleClock;

/// Periodic sample tick, one capture step per update interrupt.
pub struct SampleTimer {
    timer: Timer<TIM6>,
    freq: Hertz,
}

impl SampleTimer {
    pub fn new(pac_tim: TIM6, freq: Hertz, rcc: &mut Rcc) -> Self {
        SampleTimer {
            timer: pac_tim.timer(rcc),
            freq,
        }
    }

    pub fn start(&mut self) {
        self.timer.clear_irq();
        self.timer.listen();
        self.timer.start(self.freq);
    }

    pub fn unpend(&mut self) {
        self.timer.clear_irq();
    }
}

impl SampleClock for SampleTimer {
    fn pause(&mut self) {
        self.timer.unlisten();
        self.timer.clear_irq();
        // Drop a tick that fired while we were getting here
        NVIC::unpend(Interrupt::TIM6);
    }

    fn resume(&mut self) {
        self.timer.clear_irq();
        self.timer.listen();
    }
}

struct UnusedPin;

impl TimerPin<TIM1> for UnusedPin {
    type Channel = Channel4;

    fn setup(&self) {
        // Do nothing
    }

    fn release(self) -> Self {
        self
    }
}

/// Hardware trigger of the ADC conversion sequence.
pub struct ConversionTimer {
    _timer: Pwm<TIM1>,
    trig: PwmPin<TIM1, Channel4>,
}

impl ConversionTimer {
    pub fn new(pac_timer: TIM1, freq: Hertz, rcc: &mut Rcc) -> Self {
        let timer = pac_timer.pwm(freq, rcc);
        let trig = timer.bind_pin(UnusedPin);
        ConversionTimer {
            _timer: timer,
            trig,
        }
    }

    pub fn start(&mut self) {
        self.trig.set_duty(self.trig.get_max_duty() / 2);
        self.trig.enable();
    }
}
