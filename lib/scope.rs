use crate::acquisition::Acquisition;
use crate::config::{MARKER_DELAY, OSC_WIDTH};
use crate::display::{clamp_row, Color, Dimension, Lcd};
use crate::error::{Error, Result};
use crate::trigger::TriggerConfig;

/// Consumer half of the oscilloscope: follows the capture one column per step.
pub struct ScopeView {
    trigger: TriggerConfig,
    pos: usize,
    last: (i16, i16),
}

impl ScopeView {
    pub fn new(trigger: TriggerConfig) -> Self {
        ScopeView {
            trigger,
            pos: 0,
            last: (0, 0),
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.last = (0, 0);
    }

    /// Column drawn by the next step.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn step<LCD, LCDER>(&mut self, lcd: &mut LCD, shared: &Acquisition) -> Result<(), LCDER>
    where
        LCD: Lcd<Error = LCDER>,
    {
        if !shared.drawing() {
            if shared.begin_draw().is_none() {
                return Ok(());
            }
            self.pos = 0;
        }

        let slot = shared.draw_index();
        // Either the capture moved on and the buffer is settled, or it is ahead of us
        let settled = slot != shared.capture_index() || shared.captured(slot) > self.pos;
        if !settled {
            return Ok(());
        }

        let at = (shared.draw_offset(slot) + self.pos) % OSC_WIDTH;
        let sample = shared.sample(slot, at);
        if self.pos == 0 {
            self.last = sample;
        }
        self.draw_column(lcd, sample)?;
        self.last = sample;

        self.pos += 1;
        if self.pos == OSC_WIDTH {
            shared.end_draw();
        }
        if self.pos == self.marker_column() {
            self.draw_marker(lcd)?;
        }
        Ok(())
    }

    /// Column after which the marker goes up, no later than the end of the frame.
    fn marker_column(&self) -> usize {
        (self.trigger.x as usize + MARKER_DELAY).min(OSC_WIDTH)
    }

    fn draw_column<LCD, LCDER>(&mut self, lcd: &mut LCD, sample: (i16, i16)) -> Result<(), LCDER>
    where
        LCD: Lcd<Error = LCDER>,
    {
        let x = self.pos as i32;
        // Erase the previous frame's column
        lcd.draw_line(x, 0, x, Dimension::BOTTOM, Color::BACKGROUND)
            .map_err(Error::Lcd)?;
        lcd.draw_line(
            x,
            sample.0 as i32,
            x,
            self.last.0 as i32,
            Color::CHANNEL_A,
        )
        .map_err(Error::Lcd)?;
        lcd.draw_line(
            x,
            sample.1 as i32,
            x,
            self.last.1 as i32,
            Color::CHANNEL_B,
        )
        .map_err(Error::Lcd)
    }

    fn draw_marker<LCD, LCDER>(&mut self, lcd: &mut LCD) -> Result<(), LCDER>
    where
        LCD: Lcd<Error = LCDER>,
    {
        let x = self.trigger.x as i32;
        let y = self.trigger.y as i32;
        let clamp_x = |x: i32| x.max(0).min(Dimension::RIGHT);
        lcd.draw_line(x, clamp_row(y - 4), x, clamp_row(y + 4), Color::TRIGGER)
            .map_err(Error::Lcd)?;
        lcd.draw_line(
            clamp_x(x - 4),
            clamp_row(y),
            clamp_x(x + 4),
            clamp_row(y),
            Color::TRIGGER,
        )
        .map_err(Error::Lcd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::mock::RecordingLcd;

    const TRIGGER: TriggerConfig = TriggerConfig { x: 20, y: 100 };

    #[test]
    fn idle_capture_draws_nothing() {
        let shared = Acquisition::new();
        shared.reset(false);
        let mut view = ScopeView::new(TRIGGER);
        let mut lcd = RecordingLcd::default();

        view.step::<_, ()>(&mut lcd, &shared).unwrap();
        assert!(lcd.ops.is_empty());
        assert!(!shared.drawing());
    }

    #[test]
    fn waits_for_capture_to_get_ahead() {
        let shared = Acquisition::new();
        shared.reset(false);
        shared.start_epoch(0, 0);
        for n in 0..3 {
            shared.push_trace(n, 200 - n);
        }
        let mut view = ScopeView::new(TRIGGER);
        let mut lcd = RecordingLcd::default();

        for _ in 0..10 {
            view.step::<_, ()>(&mut lcd, &shared).unwrap();
        }
        assert_eq!(view.position(), 3);
        assert!(shared.drawing());

        shared.push_trace(3, 197);
        view.step::<_, ()>(&mut lcd, &shared).unwrap();
        assert_eq!(view.position(), 4);

        let a: Vec<_> = lcd.lines(Color::CHANNEL_A).collect();
        assert_eq!(a[0], (0, 0, 0, 0));
        assert_eq!(a[3], (3, 3, 3, 2));
        let b: Vec<_> = lcd.lines(Color::CHANNEL_B).collect();
        assert_eq!(b[1], (1, 199, 1, 200));
    }

    fn write_position(shared: &Acquisition) {
        let pos = shared.capture_pos();
        shared.push_trace((pos % 200) as i16, 0);
    }

    #[test]
    fn settled_buffer_is_drawn_through_with_offset() {
        let shared = Acquisition::new();
        shared.reset(false);
        for _ in 0..100 {
            shared.push_trace(0, 0);
        }
        shared.start_epoch(100, 0);
        write_position(&shared);

        let mut view = ScopeView::new(TRIGGER);
        let mut lcd = RecordingLcd::default();
        view.step::<_, ()>(&mut lcd, &shared).unwrap();
        assert_eq!(shared.draw_index(), 0);

        for _ in 1..OSC_WIDTH {
            write_position(&shared);
        }
        assert_eq!(shared.capture_index(), 1);

        for _ in 0..OSC_WIDTH + 5 {
            view.step::<_, ()>(&mut lcd, &shared).unwrap();
        }
        assert!(!shared.drawing());
        let a: Vec<_> = lcd.lines(Color::CHANNEL_A).collect();
        assert_eq!(a.len(), OSC_WIDTH);
        for (column, line) in a.iter().enumerate() {
            let expected = (((100 + column) % OSC_WIDTH) % 200) as i32;
            assert_eq!(line.0, column as i32);
            assert_eq!(line.1, expected);
        }
    }

    #[test]
    fn marker_after_trigger_column() {
        let shared = Acquisition::new();
        shared.reset(false);
        shared.start_epoch(0, 0);
        shared.push_trace(50, 60);
        let mut view = ScopeView::new(TRIGGER);
        let mut lcd = RecordingLcd::default();
        view.step::<_, ()>(&mut lcd, &shared).unwrap();
        for _ in 1..OSC_WIDTH {
            shared.push_trace(50, 60);
        }

        for _ in 0..TRIGGER.x as usize + MARKER_DELAY - 2 {
            view.step::<_, ()>(&mut lcd, &shared).unwrap();
        }
        assert_eq!(lcd.lines(Color::TRIGGER).count(), 0);
        view.step::<_, ()>(&mut lcd, &shared).unwrap();
        let marker: Vec<_> = lcd.lines(Color::TRIGGER).collect();
        assert_eq!(marker, vec![(20, 96, 20, 104), (16, 100, 24, 100)]);
    }

    #[test]
    fn marker_near_right_edge_drawn_at_end_of_frame() {
        let trigger = TriggerConfig { x: 318, y: 100 };
        let shared = Acquisition::new();
        shared.reset(false);
        shared.start_epoch(0, 0);
        shared.push_trace(50, 60);
        let mut view = ScopeView::new(trigger);
        let mut lcd = RecordingLcd::default();
        view.step::<_, ()>(&mut lcd, &shared).unwrap();
        for _ in 1..OSC_WIDTH {
            shared.push_trace(50, 60);
        }

        for _ in 1..OSC_WIDTH - 1 {
            view.step::<_, ()>(&mut lcd, &shared).unwrap();
        }
        assert_eq!(lcd.lines(Color::TRIGGER).count(), 0);
        view.step::<_, ()>(&mut lcd, &shared).unwrap();
        assert!(!shared.drawing());
        let marker: Vec<_> = lcd.lines(Color::TRIGGER).collect();
        assert_eq!(marker, vec![(318, 96, 318, 104), (314, 100, 319, 100)]);
    }
}
