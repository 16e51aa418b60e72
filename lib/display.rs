use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Drawing primitives the instrument needs from the panel. Coordinates are
/// pixels on the landscape canvas, rectangle corners are inclusive.
pub trait Lcd {
    type Error;
    fn clear(&mut self, color: Rgb565) -> Result<(), Self::Error>;
    fn draw_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Rgb565,
    ) -> Result<(), Self::Error>;
    fn fill_rect(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Rgb565,
    ) -> Result<(), Self::Error>;
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Rgb565)
        -> Result<(), Self::Error>;
}

pub(crate) struct Dimension;

impl Dimension {
    pub(crate) const BOTTOM: i32 = DISPLAY_HEIGHT - 1;
    pub(crate) const RIGHT: i32 = DISPLAY_WIDTH - 1;
}

pub(crate) struct Color;

impl Color {
    pub(crate) const BACKGROUND: Rgb565 = Rgb565::BLACK;
    pub(crate) const CHANNEL_A: Rgb565 = Rgb565::GREEN;
    pub(crate) const CHANNEL_B: Rgb565 = Rgb565::CYAN;
    pub(crate) const TRIGGER: Rgb565 = Rgb565::YELLOW;
    pub(crate) const BAR: Rgb565 = Rgb565::BLUE;
    pub(crate) const TEXT: Rgb565 = Rgb565::WHITE;
}

pub(crate) fn clamp_row(row: i32) -> i32 {
    row.max(0).min(Dimension::BOTTOM)
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        Clear(Rgb565),
        Line(i32, i32, i32, i32, Rgb565),
        Fill(i32, i32, i32, i32, Rgb565),
        Text(String, Rgb565),
    }

    /// Records every primitive instead of drawing it.
    #[derive(Default)]
    pub struct RecordingLcd {
        pub ops: Vec<Op>,
    }

    impl RecordingLcd {
        pub fn lines(&self, color: Rgb565) -> impl Iterator<Item = (i32, i32, i32, i32)> + '_ {
            self.ops.iter().filter_map(move |op| match *op {
                Op::Line(x0, y0, x1, y1, c) if c == color => Some((x0, y0, x1, y1)),
                _ => None,
            })
        }

        pub fn fills(&self, color: Rgb565) -> impl Iterator<Item = (i32, i32, i32, i32)> + '_ {
            self.ops.iter().filter_map(move |op| match *op {
                Op::Fill(x0, y0, x1, y1, c) if c == color => Some((x0, y0, x1, y1)),
                _ => None,
            })
        }

        pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
            self.ops.iter().filter_map(|op| match op {
                Op::Text(text, _) => Some(text.as_str()),
                _ => None,
            })
        }
    }

    fn on_canvas(x: i32, y: i32) {
        assert!((0..=Dimension::RIGHT).contains(&x), "x {} off screen", x);
        assert!((0..=Dimension::BOTTOM).contains(&y), "y {} off screen", y);
    }

    impl Lcd for RecordingLcd {
        type Error = ();

        fn clear(&mut self, color: Rgb565) -> Result<(), ()> {
            self.ops.push(Op::Clear(color));
            Ok(())
        }

        fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) -> Result<(), ()> {
            on_canvas(x0, y0);
            on_canvas(x1, y1);
            self.ops.push(Op::Line(x0, y0, x1, y1, color));
            Ok(())
        }

        fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) -> Result<(), ()> {
            on_canvas(x0, y0);
            on_canvas(x1, y1);
            self.ops.push(Op::Fill(x0, y0, x1, y1, color));
            Ok(())
        }

        fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Rgb565) -> Result<(), ()> {
            on_canvas(x, y);
            self.ops.push(Op::Text(text.into(), color));
            Ok(())
        }
    }
}
