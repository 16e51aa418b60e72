use core::convert::Infallible;
use display_interface_parallel_gpio::WriteOnlyDataCommand;
use embedded_graphics::drawable::Drawable;
use embedded_graphics::fonts::{Font6x8, Text};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{Point, Primitive};
use embedded_graphics::primitives::{Line, Rectangle};
use embedded_graphics::style::{PrimitiveStyle, TextStyle};
use embedded_graphics::DrawTarget;
use ili9341::{DisplaySize240x320, Error, Ili9341, Orientation};
use stm32g0xx_hal::hal::blocking::delay::DelayMs;
use stm32g0xx_hal::hal::digital::v2::OutputPin;

use crate::display::Lcd;

#[derive(Debug)]
pub struct IliError(pub Error<Infallible>);

pub struct IliLcd<I, R> {
    ili: Ili9341<I, R>,
}

impl<I, R> IliLcd<I, R>
where
    I: WriteOnlyDataCommand,
    R: OutputPin<Error = Infallible>,
{
    pub fn new<D>(interface: I, reset: R, delay: &mut D) -> Result<Self, IliError>
    where
        D: DelayMs<u16>,
    {
        let ili = Ili9341::new(
            interface,
            reset,
            delay,
            Orientation::LandscapeFlipped,
            DisplaySize240x320,
        )
        .map_err(IliError)?;

        Ok(IliLcd { ili })
    }

    fn draw<D: Drawable<Rgb565>>(&mut self, drawable: D) -> Result<(), IliError> {
        drawable.draw(&mut self.ili).map_err(IliError)
    }
}

impl<I, R> Lcd for IliLcd<I, R>
where
    I: WriteOnlyDataCommand,
    R: OutputPin<Error = Infallible>,
{
    type Error = IliError;

    fn clear(&mut self, color: Rgb565) -> Result<(), Self::Error> {
        self.ili.clear(color).map_err(IliError)
    }

    fn draw_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        let line = Line::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(color, 1));
        self.draw(&line)
    }

    fn fill_rect(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        let rect = Rectangle::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_fill(color));
        self.draw(&rect)
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Rgb565) -> Result<(), Self::Error> {
        let text = Text::new(text, Point::new(x, y)).into_styled(TextStyle::new(Font6x8, color));
        self.draw(&text)
    }
}
