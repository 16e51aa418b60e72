use crate::config::OVERSAMPLING;
use crate::Buffer;

/// Latest reading of both channels, kept as the sum of the oversampled
/// conversions so the mean stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    sum_a: u16,
    sum_b: u16,
}

impl RawSample {
    /// Reading where every conversion returned `a` and `b`.
    pub fn new(a: u16, b: u16) -> Self {
        let n = OVERSAMPLING as u16;
        RawSample::from_sums(a * n, b * n)
    }

    pub fn from_sums(sum_a: u16, sum_b: u16) -> Self {
        RawSample { sum_a, sum_b }
    }

    pub fn sum_a(&self) -> u16 {
        self.sum_a
    }

    /// Mean of channel A, fractional part included.
    pub fn a(&self) -> f32 {
        self.sum_a as f32 / OVERSAMPLING as f32
    }

    pub fn b(&self) -> f32 {
        self.sum_b as f32 / OVERSAMPLING as f32
    }
}

pub struct Sampler {
    buffer: &'static Buffer,
}

impl Sampler {
    /// `buffer` is the circular DMA target, conversions interleaved as `[A, B]` pairs.
    pub fn new(buffer: &'static Buffer) -> Self {
        Sampler { buffer }
    }

    pub fn read(&self) -> RawSample {
        let (mut a, mut b) = (0u16, 0u16);
        for pair in 0..OVERSAMPLING {
            let (raw_a, raw_b) = self.get_raw_data(pair);
            a += raw_a;
            b += raw_b;
        }
        RawSample::from_sums(a, b)
    }

    fn get_raw_data(&self, pair: usize) -> (u16, u16) {
        // Written by DMA behind our back
        unsafe {
            (
                core::ptr::read_volatile(&self.buffer[2 * pair]),
                core::ptr::read_volatile(&self.buffer[2 * pair + 1]),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static DMA: Buffer = [100, 4000, 104, 4002, 96, 3998, 100, 4004];
    static UNEVEN: Buffer = [100, 7, 101, 8, 101, 8, 101, 8];

    #[test]
    fn averages_each_channel() {
        let sampler = Sampler::new(&DMA);
        let sample = sampler.read();
        assert_eq!(sample, RawSample::new(100, 4001));
        assert_eq!(sample.a(), 100.0);
        assert_eq!(sample.b(), 4001.0);
    }

    #[test]
    fn mean_keeps_fraction() {
        let sample = Sampler::new(&UNEVEN).read();
        assert_eq!(sample.sum_a(), 403);
        assert_eq!(sample.a(), 100.75);
        assert_eq!(sample.b(), 7.75);
    }
}
