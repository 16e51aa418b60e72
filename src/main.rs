#![cfg_attr(target_os = "none", no_main)]
#![cfg_attr(target_os = "none", no_std)]

#[cfg(target_os = "none")]
use {
    cortex_m::singleton,
    lib::acquisition::Acquisition,
    lib::capture::Capture,
    lib::config::{ScopeConfig, OVERSAMPLING, SAMPLE_RATE_HZ},
    lib::hw::{init_clock, init_lcd, Adc, AdcConfig, HwLcd, LcdInterface, ModeButton, SampleTimer},
    lib::instrument::Instrument,
    lib::mode::{Mode, ModeSwitch, SampleClock},
    lib::sampler::Sampler,
    lib::Buffer,
    rtic::app,
    rtic::Mutex,
    stm32g0xx_hal::delay::DelayExt,
    stm32g0xx_hal::dma::DmaExt,
    stm32g0xx_hal::dmamux::DmaMuxIndex,
    stm32g0xx_hal::gpio::{GpioExt, Speed},
    stm32g0xx_hal::time::U32Ext,
};

#[cfg(target_os = "none")]
static ACQUISITION: Acquisition = Acquisition::new();
#[cfg(target_os = "none")]
static MODE_SWITCH: ModeSwitch = ModeSwitch::new();

/// Sample timer behind the RTIC resource lock.
#[cfg(target_os = "none")]
struct SharedTimer<M>(M);

#[cfg(target_os = "none")]
impl<M> SampleClock for SharedTimer<M>
where
    M: Mutex<T = SampleTimer>,
{
    fn pause(&mut self) {
        self.0.lock(|timer: &mut SampleTimer| timer.pause());
    }

    fn resume(&mut self) {
        self.0.lock(|timer: &mut SampleTimer| timer.resume());
    }
}

#[cfg(target_os = "none")]
#[app(device = stm32g0xx_hal::stm32, peripherals = true)]
const APP: () = {
    struct Resources {
        instrument: Instrument<HwLcd>,
        capture: Capture,
        sampler: Sampler,
        sample_timer: SampleTimer,
        adc: Adc,
        button: ModeButton,
    }

    #[init]
    fn init(cx: init::Context) -> init::LateResources {
        let core: rtic::export::Peripherals = cx.core;
        let device: stm32g0xx_hal::stm32::Peripherals = cx.device;

        // Buffers
        let dma_buffer: &'static mut Buffer = singleton!(: Buffer = [0; 2 * OVERSAMPLING]).unwrap();

        // Clock
        let mut rcc = init_clock(device.RCC);
        let mut delay = core.SYST.delay(&mut rcc);

        // GPIO
        let gpioa = device.GPIOA.split(&mut rcc);
        let gpiob = device.GPIOB.split(&mut rcc);

        // LCD
        let interface = LcdInterface::new(
            gpiob.pb0.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb1.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb2.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb3.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb4.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb5.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb6.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb7.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb8.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb9.into_push_pull_output().set_speed(Speed::VeryHigh),
        );
        let lcd = init_lcd(
            interface,
            gpioa.pa4.into_push_pull_output(),
            gpioa.pa5.into_push_pull_output(),
            &mut delay,
        )
        .unwrap();

        // ADC, converts the pair OVERSAMPLING times per sample tick
        let dma = device.DMA.split(&mut rcc, device.DMAMUX);
        let mut ch1 = dma.ch1;
        ch1.mux().select_peripheral(DmaMuxIndex::ADC);
        let adc = Adc::new(
            device.ADC,
            device.TIM1,
            dma_buffer,
            AdcConfig::new(
                gpioa.pa0,
                gpioa.pa1,
                ch1,
                (SAMPLE_RATE_HZ * OVERSAMPLING as u32).hz(),
            ),
            &mut rcc,
            &mut delay,
        );
        let sampler = Sampler::new(dma_buffer);
        let sample_timer = SampleTimer::new(device.TIM6, SAMPLE_RATE_HZ.hz(), &mut rcc);

        // Mode button
        let button = ModeButton::new(gpioa.pa7.into_pull_up_input(), device.EXTI);

        // Instrument
        let config = ScopeConfig::default();
        let capture = Capture::new(config);
        let instrument = Instrument::new(lcd, config, Mode::Spectrum, &ACQUISITION, &MODE_SWITCH)
            .unwrap();

        init::LateResources {
            instrument,
            capture,
            sampler,
            sample_timer,
            adc,
            button,
        }
    }

    #[idle(resources = [instrument, sample_timer, adc])]
    fn idle(mut cx: idle::Context) -> ! {
        let instrument: &mut Instrument<HwLcd> = cx.resources.instrument;

        cx.resources.adc.start();
        cx.resources.sample_timer.lock(|timer: &mut SampleTimer| {
            timer.start();
        });

        let mut clock = SharedTimer(cx.resources.sample_timer);
        loop {
            instrument
                .step(&ACQUISITION, &MODE_SWITCH, &mut clock)
                .unwrap();
        }
    }

    #[task(binds = TIM6, priority = 2, resources = [capture, sampler, sample_timer])]
    fn tim6(cx: tim6::Context) {
        let sample_timer: &mut SampleTimer = cx.resources.sample_timer;
        let sampler: &mut Sampler = cx.resources.sampler;
        let capture: &mut Capture = cx.resources.capture;

        sample_timer.unpend();
        capture.tick(&ACQUISITION, sampler.read());
    }

    #[task(binds = EXTI4_15, priority = 3, resources = [button])]
    fn exti(cx: exti::Context) {
        let button: &mut ModeButton = cx.resources.button;

        if button.unpend() {
            MODE_SWITCH.press();
        }
    }
};

#[cfg(not(target_os = "none"))]
fn main() {}
