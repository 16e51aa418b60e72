use crate::config::{FFT_SAMPLES, LUT_SIZE};
use crate::lut::SineLut;

/// Rendered bins: 1..=N/2, DC is skipped.
pub const BINS: usize = FFT_SAMPLES / 2;

const BITS: u32 = FFT_SAMPLES.trailing_zeros();

/// Reverses the lowest `bits` bits of `value`.
pub fn bit_reverse(value: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    value.reverse_bits() >> (usize::BITS - bits)
}

/// Reorders `data` into bit-reversed index order. Applying it twice is a no-op.
pub fn permute<T>(data: &mut [T]) {
    debug_assert!(data.len().is_power_of_two());
    let bits = data.len().trailing_zeros();
    for i in 0..data.len() {
        let reversed = bit_reverse(i, bits);
        if reversed > i {
            data.swap(i, reversed);
        }
    }
}

/// Approximate `sqrt(a² + b²)`, max error ~1.04 %.
pub fn quick_hypot(a: f32, b: f32) -> f32 {
    let (mut small, mut large) = (libm::fabsf(a), libm::fabsf(b));
    if small > large {
        core::mem::swap(&mut small, &mut large);
    }
    if large < 0.1 {
        return small;
    }
    large + 0.428 * small * small / large
}

fn magnitude(sin: f32, cos: f32) -> f32 {
    if cfg!(feature = "fast-hypot") {
        quick_hypot(sin, cos)
    } else {
        libm::sqrtf(sin * sin + cos * cos)
    }
}

/// In-place radix-2 decimation-in-time transform over `FFT_SAMPLES` real samples.
///
/// The real input goes into the "sine" part, the "cosine" part is built up by the
/// butterflies. Twiddle factors come from the shared sine table.
pub struct Fft {
    lut: SineLut,
    sin: [f32; FFT_SAMPLES],
    cos: [f32; FFT_SAMPLES],
    magnitudes: [f32; BINS],
}

impl Fft {
    pub fn new() -> Self {
        Fft {
            lut: SineLut::new(),
            sin: [0.0; FFT_SAMPLES],
            cos: [0.0; FFT_SAMPLES],
            magnitudes: [0.0; BINS],
        }
    }

    /// Sample slots for the next `run`.
    pub fn input(&mut self) -> &mut [f32; FFT_SAMPLES] {
        &mut self.sin
    }

    /// Transforms the loaded samples, returns the magnitude of bins 1..=N/2
    /// (index 0 holds bin 1).
    pub fn run(&mut self) -> &[f32; BINS] {
        permute(&mut self.sin);
        self.butterflies();
        for (bin, magnitude_out) in self.magnitudes.iter_mut().enumerate() {
            let i = bin + 1;
            *magnitude_out = magnitude(self.sin[i], self.cos[i]);
        }
        &self.magnitudes
    }

    fn butterflies(&mut self) {
        // First stage twiddle is unity, pairs are plain sums and differences
        for p1 in (0..FFT_SAMPLES).step_by(2) {
            let p2 = p1 + 1;
            let sin_p2 = self.sin[p2];
            self.sin[p2] = self.sin[p1] - sin_p2;
            self.cos[p2] = 0.0;
            self.sin[p1] += sin_p2;
            self.cos[p1] = 0.0;
        }

        let mut node = 2;
        for _ in 1..BITS {
            for w in 0..node {
                let angle = w * LUT_SIZE / (2 * node);
                let s = self.lut.sin(angle);
                let c = self.lut.cos(angle);

                for p1 in (w..FFT_SAMPLES).step_by(node * 2) {
                    let p2 = p1 + node;

                    let (sin_p1, cos_p1) = (self.sin[p1], self.cos[p1]);
                    let (sin_p2, cos_p2) = (self.sin[p2], self.cos[p2]);

                    let t1 = c * sin_p2 - s * cos_p2;
                    let t2 = c * cos_p2 + s * sin_p2;

                    self.sin[p2] = sin_p1 - t1;
                    self.cos[p2] = cos_p1 - t2;
                    self.sin[p1] = sin_p1 + t1;
                    self.cos[p1] = cos_p1 + t2;
                }
            }
            node *= 2;
        }
    }
}

impl Default for Fft {
    fn default() -> Self {
        Fft::new()
    }
}
