//! State shared between the sample interrupt and the main loop.
//!
//! Every field has exactly one writer. The interrupt never blocks on the main
//! loop, so there are no locks: each field is a single atomic load or store and
//! the readers are written to tolerate seeing one field updated before another.
//! [`Acquisition::reset`] is the only place that writes interrupt-owned fields
//! from the main loop and it must run with the sample clock paused.
#![allow(clippy::declare_interior_mutable_const)]

use core::sync::atomic::{AtomicBool, AtomicI16, AtomicU16, AtomicU32, AtomicU8, Ordering};

use crate::config::{FFT_SAMPLES, OSC_WIDTH, OVERSAMPLING};

const ZERO: AtomicI16 = AtomicI16::new(0);
const TRACE: [AtomicI16; OSC_WIDTH] = [ZERO; OSC_WIDTH];
const WORKSPACE: [AtomicI16; FFT_SAMPLES] = [ZERO; FFT_SAMPLES];

static TICKS: AtomicU32 = AtomicU32::new(0);

/// Sample ticks handled since power-up.
pub fn ticks() -> u32 {
    TICKS.load(Ordering::Relaxed)
}

pub(crate) fn count_tick() {
    TICKS.store(TICKS.load(Ordering::Relaxed).wrapping_add(1), Ordering::Relaxed);
}

pub struct Acquisition {
    // Written by the sample interrupt
    capturing: AtomicBool,
    capture_index: AtomicU8,
    capture_pos: AtomicU16,
    buffer_samples: AtomicU16,
    previous: AtomicI16,
    draw_offset: [AtomicU16; 2],
    captured: [AtomicU16; 2],
    channel_a: [[AtomicI16; OSC_WIDTH]; 2],
    channel_b: [[AtomicI16; OSC_WIDTH]; 2],
    // Spectrum input in 1 / OVERSAMPLING counts
    workspace: [[AtomicI16; FFT_SAMPLES]; 2],
    filled: [AtomicU8; 2],
    accepted: AtomicU8,

    // Written by the main loop
    spectrum: AtomicBool,
    drawing: AtomicBool,
    draw_index: AtomicU8,
    consumed: [AtomicU8; 2],
    arm_slot: AtomicU8,
    armed: AtomicU8,
}

impl Acquisition {
    pub const fn new() -> Self {
        Acquisition {
            capturing: AtomicBool::new(false),
            capture_index: AtomicU8::new(0),
            capture_pos: AtomicU16::new(0),
            buffer_samples: AtomicU16::new(0),
            previous: AtomicI16::new(0),
            draw_offset: [AtomicU16::new(0), AtomicU16::new(0)],
            captured: [AtomicU16::new(0), AtomicU16::new(0)],
            channel_a: [TRACE; 2],
            channel_b: [TRACE; 2],
            workspace: [WORKSPACE; 2],
            filled: [AtomicU8::new(0), AtomicU8::new(0)],
            accepted: AtomicU8::new(0),
            spectrum: AtomicBool::new(false),
            drawing: AtomicBool::new(false),
            draw_index: AtomicU8::new(0),
            consumed: [AtomicU8::new(0), AtomicU8::new(0)],
            arm_slot: AtomicU8::new(0),
            armed: AtomicU8::new(0),
        }
    }

    /// Drops any epoch in flight and selects the acquisition mode.
    ///
    /// The sample interrupt must not run while this executes.
    pub fn reset(&self, spectrum: bool) {
        self.capturing.store(false, Ordering::Relaxed);
        self.capture_index.store(0, Ordering::Relaxed);
        self.capture_pos.store(0, Ordering::Relaxed);
        self.buffer_samples.store(0, Ordering::Relaxed);
        self.previous.store(0, Ordering::Relaxed);
        for slot in 0..2 {
            self.draw_offset[slot].store(0, Ordering::Relaxed);
            self.captured[slot].store(0, Ordering::Relaxed);
            self.filled[slot].store(0, Ordering::Relaxed);
            self.consumed[slot].store(0, Ordering::Relaxed);
        }
        self.accepted.store(0, Ordering::Relaxed);
        self.armed.store(0, Ordering::Relaxed);
        self.arm_slot.store(0, Ordering::Relaxed);
        self.drawing.store(false, Ordering::Relaxed);
        self.draw_index.store(0, Ordering::Relaxed);
        self.spectrum.store(spectrum, Ordering::Release);
    }

    pub fn spectrum(&self) -> bool {
        self.spectrum.load(Ordering::Acquire)
    }

    pub fn capturing(&self) -> bool {
        self.capturing.load(Ordering::Acquire)
    }

    pub fn capture_index(&self) -> usize {
        self.capture_index.load(Ordering::Acquire) as usize
    }

    pub fn capture_pos(&self) -> usize {
        self.capture_pos.load(Ordering::Relaxed) as usize
    }

    /// Samples written since the active buffer was selected.
    pub fn buffer_samples(&self) -> u16 {
        self.buffer_samples.load(Ordering::Relaxed)
    }

    /// Logical samples of the epoch in `slot` that are safe to read.
    pub fn captured(&self, slot: usize) -> usize {
        self.captured[slot].load(Ordering::Acquire) as usize
    }

    /// Physical position of logical sample 0 of the epoch in `slot`.
    pub fn draw_offset(&self, slot: usize) -> usize {
        self.draw_offset[slot].load(Ordering::Relaxed) as usize
    }

    pub fn sample(&self, slot: usize, pos: usize) -> (i16, i16) {
        (
            self.channel_a[slot][pos].load(Ordering::Relaxed),
            self.channel_b[slot][pos].load(Ordering::Relaxed),
        )
    }

    pub fn drawing(&self) -> bool {
        self.drawing.load(Ordering::Relaxed)
    }

    pub fn draw_index(&self) -> usize {
        self.draw_index.load(Ordering::Relaxed) as usize
    }

    /// Workspace `slot` holds a full capture not yet transformed.
    pub fn ready(&self, slot: usize) -> bool {
        self.filled[slot].load(Ordering::Acquire) != self.consumed[slot].load(Ordering::Relaxed)
    }

    /// An arm request was posted that the interrupt has not picked up yet.
    pub fn arm_pending(&self) -> bool {
        self.accepted.load(Ordering::Acquire) != self.armed.load(Ordering::Relaxed)
    }
}

/// Interrupt side.
impl Acquisition {
    pub(crate) fn previous(&self) -> i16 {
        self.previous.load(Ordering::Relaxed)
    }

    pub(crate) fn set_previous(&self, sample: i16) {
        self.previous.store(sample, Ordering::Relaxed);
    }

    /// The draw engine still reads the slot a new epoch would write.
    pub(crate) fn blocked(&self) -> bool {
        self.drawing() && self.draw_index() == self.capture_index()
    }

    /// Opens an epoch on the active buffer with `valid` samples already in place.
    pub(crate) fn start_epoch(&self, offset: usize, valid: usize) {
        let slot = self.capture_index();
        self.draw_offset[slot].store(offset as u16, Ordering::Relaxed);
        self.captured[slot].store(valid as u16, Ordering::Release);
        self.capturing.store(true, Ordering::Release);
    }

    pub(crate) fn restart_cursor(&self) {
        self.capture_pos.store(0, Ordering::Relaxed);
    }

    /// Writes one sample pair at the cursor and advances it around the buffer.
    ///
    /// Completing an epoch switches to the other buffer and stops capturing
    /// until the trigger fires again. An idle buffer the draw engine is still
    /// reading is left untouched.
    pub(crate) fn push_trace(&self, a: i16, b: i16) {
        let capturing = self.capturing();
        if !capturing && self.blocked() {
            return;
        }

        let slot = self.capture_index();
        let pos = self.capture_pos();
        self.channel_a[slot][pos].store(a, Ordering::Relaxed);
        self.channel_b[slot][pos].store(b, Ordering::Relaxed);
        self.capture_pos
            .store(((pos + 1) % OSC_WIDTH) as u16, Ordering::Relaxed);

        if !capturing {
            let samples = self.buffer_samples().saturating_add(1);
            self.buffer_samples.store(samples, Ordering::Relaxed);
            return;
        }

        let valid = self.captured(slot) + 1;
        self.captured[slot].store(valid as u16, Ordering::Release);
        if valid == OSC_WIDTH {
            // captured[next] keeps the finished epoch's count until start_epoch
            let next = 1 - slot;
            self.capture_index.store(next as u8, Ordering::Release);
            self.buffer_samples.store(0, Ordering::Relaxed);
            self.capturing.store(false, Ordering::Release);
        }
    }

    /// Starts filling the workspace the main loop asked for, if any.
    pub(crate) fn accept_arm(&self) -> bool {
        if self.capturing() || !self.arm_pending() {
            return false;
        }
        let slot = self.arm_slot.load(Ordering::Relaxed);
        self.capture_index.store(slot, Ordering::Relaxed);
        self.capture_pos.store(0, Ordering::Relaxed);
        self.capturing.store(true, Ordering::Release);
        self.accepted
            .store(self.armed.load(Ordering::Relaxed), Ordering::Release);
        true
    }

    /// Appends one sample to the workspace being filled. Returns true once the
    /// workspace is complete and handed over to the main loop.
    pub(crate) fn push_workspace(&self, sample: i16) -> bool {
        let slot = self.capture_index();
        let pos = self.capture_pos();
        self.workspace[slot][pos].store(sample, Ordering::Relaxed);
        let pos = pos + 1;
        self.capture_pos.store(pos as u16, Ordering::Relaxed);
        if pos < FFT_SAMPLES {
            return false;
        }
        let filled = self.filled[slot].load(Ordering::Relaxed).wrapping_add(1);
        self.filled[slot].store(filled, Ordering::Release);
        self.capturing.store(false, Ordering::Release);
        true
    }
}

/// Main loop side.
impl Acquisition {
    /// Latches the buffer currently being captured for drawing.
    pub(crate) fn begin_draw(&self) -> Option<usize> {
        // Index before flag: a rotation in between shows up as not capturing
        let slot = self.capture_index();
        if !self.capturing() {
            return None;
        }
        self.draw_index.store(slot as u8, Ordering::Relaxed);
        self.drawing.store(true, Ordering::Release);
        Some(slot)
    }

    pub(crate) fn end_draw(&self) {
        self.drawing.store(false, Ordering::Release);
    }

    /// Asks the interrupt to fill workspace `slot` next.
    pub(crate) fn arm(&self, slot: usize) {
        self.arm_slot.store(slot as u8, Ordering::Relaxed);
        let armed = self.armed.load(Ordering::Relaxed).wrapping_add(1);
        self.armed.store(armed, Ordering::Release);
    }

    /// Copies a ready workspace into the transform input, in converter counts.
    pub(crate) fn load_workspace(&self, slot: usize, out: &mut [f32; FFT_SAMPLES]) {
        for (value, sample) in out.iter_mut().zip(self.workspace[slot].iter()) {
            *value = sample.load(Ordering::Relaxed) as f32 / OVERSAMPLING as f32;
        }
    }

    /// Hands workspace `slot` back to the interrupt.
    pub(crate) fn release(&self, slot: usize) {
        let filled = self.filled[slot].load(Ordering::Acquire);
        self.consumed[slot].store(filled, Ordering::Release);
    }
}

impl Default for Acquisition {
    fn default() -> Self {
        Acquisition::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_handshake() {
        let shared = Acquisition::new();
        shared.reset(true);
        assert!(!shared.arm_pending());

        shared.arm(1);
        assert!(shared.arm_pending());
        assert!(shared.accept_arm());
        assert!(!shared.arm_pending());
        assert!(shared.capturing());
        assert_eq!(shared.capture_index(), 1);
        assert!(!shared.accept_arm());

        for n in 0..FFT_SAMPLES {
            let done = shared.push_workspace((n * OVERSAMPLING) as i16);
            assert_eq!(done, n == FFT_SAMPLES - 1);
        }
        assert!(!shared.capturing());
        assert!(shared.ready(1));
        assert!(!shared.ready(0));

        let mut out = [0.0; FFT_SAMPLES];
        shared.load_workspace(1, &mut out);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[FFT_SAMPLES - 1], (FFT_SAMPLES - 1) as f32);

        shared.release(1);
        assert!(!shared.ready(1));
    }

    #[test]
    fn drawn_slot_survives_capture_lapping_it() {
        let shared = Acquisition::new();
        shared.reset(false);
        shared.start_epoch(0, 0);
        shared.push_trace(0, 0);
        assert_eq!(shared.begin_draw(), Some(0));
        for n in 1..OSC_WIDTH {
            shared.push_trace(n as i16, n as i16);
        }
        assert_eq!(shared.capture_index(), 1);

        shared.restart_cursor();
        shared.start_epoch(0, 0);
        for _ in 0..OSC_WIDTH {
            shared.push_trace(999, 999);
        }
        // Back on the slot still being drawn
        assert_eq!(shared.capture_index(), 0);
        assert!(shared.blocked());
        assert_eq!(shared.captured(0), OSC_WIDTH);

        let pos = shared.capture_pos();
        for _ in 0..10 {
            shared.push_trace(-1, -1);
        }
        assert_eq!(shared.capture_pos(), pos);
        assert_eq!(shared.buffer_samples(), 0);
        for n in 0..OSC_WIDTH {
            assert_eq!(shared.sample(0, n), (n as i16, n as i16));
        }

        shared.end_draw();
        shared.push_trace(-1, -1);
        assert_eq!(shared.buffer_samples(), 1);
        assert_eq!(shared.sample(0, pos), (-1, -1));
    }

    #[test]
    fn drawing_blocks_same_slot_only() {
        let shared = Acquisition::new();
        shared.reset(false);
        assert!(!shared.blocked());
        assert_eq!(shared.begin_draw(), None);

        shared.start_epoch(0, 0);
        assert_eq!(shared.begin_draw(), Some(0));
        assert!(shared.blocked());

        for _ in 0..OSC_WIDTH {
            shared.push_trace(1, 2);
        }
        assert_eq!(shared.capture_index(), 1);
        assert!(!shared.blocked());

        shared.end_draw();
        assert!(!shared.drawing());
    }

    #[test]
    fn reset_clears_handoff_state() {
        let shared = Acquisition::new();
        shared.reset(false);
        shared.start_epoch(12, 5);
        shared.push_trace(3, 4);
        shared.begin_draw();

        shared.reset(true);
        assert!(shared.spectrum());
        assert!(!shared.capturing());
        assert!(!shared.drawing());
        assert_eq!(shared.capture_pos(), 0);
        assert_eq!(shared.captured(0), 0);
        assert_eq!(shared.draw_offset(0), 0);
        assert_eq!(shared.previous(), 0);
    }
}
