use crate::config::LUT_SIZE;

/// One period of `sin`, sampled `LUT_SIZE` times.
///
/// Cosine comes from the same table a quarter period ahead.
pub struct SineLut {
    table: [f32; LUT_SIZE],
}

impl SineLut {
    pub fn new() -> Self {
        let mut table = [0.0; LUT_SIZE];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = libm::sinf(i as f32 * 2.0 * core::f32::consts::PI / LUT_SIZE as f32);
        }
        SineLut { table }
    }

    pub fn sin(&self, index: usize) -> f32 {
        self.table[index % LUT_SIZE]
    }

    pub fn cos(&self, index: usize) -> f32 {
        self.table[(index + LUT_SIZE / 4) % LUT_SIZE]
    }
}

impl Default for SineLut {
    fn default() -> Self {
        SineLut::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_points() {
        let lut = SineLut::new();
        assert!(lut.sin(0).abs() < 1e-6);
        assert!((lut.sin(LUT_SIZE / 4) - 1.0).abs() < 1e-6);
        assert!((lut.cos(0) - 1.0).abs() < 1e-6);
        assert!((lut.cos(LUT_SIZE / 2) + 1.0).abs() < 1e-6);
        assert!((lut.cos(3 * LUT_SIZE / 4)).abs() < 1e-6);
    }

    #[test]
    fn matches_libm_everywhere() {
        let lut = SineLut::new();
        for i in 0..LUT_SIZE {
            let angle = 2.0 * core::f64::consts::PI * i as f64 / LUT_SIZE as f64;
            assert!((lut.sin(i) as f64 - angle.sin()).abs() < 1e-5, "sin {}", i);
            assert!((lut.cos(i) as f64 - angle.cos()).abs() < 1e-5, "cos {}", i);
        }
    }
}
