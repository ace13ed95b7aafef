use ndarray::{s, Array2, ArrayView2};

use crate::comparison::domain::frame_comparator::FrameComparator;
use crate::shared::constants::{SSIM_C1, SSIM_C2, SSIM_STRIDE, SSIM_WINDOW};
use crate::shared::error::CompareError;
use crate::shared::frame::Frame;

/// Mean structural similarity of the luma planes of two frames.
///
/// Statistics are taken over square windows of `window` pixels stepped by
/// `stride`. Images smaller than one window are scored as a single window.
pub struct SsimComparator {
    window: usize,
    stride: usize,
}

impl SsimComparator {
    pub fn new(window: usize, stride: usize) -> Self {
        Self {
            window: window.max(1),
            stride: stride.max(1),
        }
    }
}

impl Default for SsimComparator {
    fn default() -> Self {
        Self::new(SSIM_WINDOW, SSIM_STRIDE)
    }
}

impl FrameComparator for SsimComparator {
    fn compare(&self, reference: &Frame, transformed: &Frame) -> Result<f64, CompareError> {
        if !reference.has_same_dimensions(transformed) {
            return Err(CompareError::DimensionMismatch {
                expected: reference.dimensions(),
                actual: transformed.dimensions(),
            });
        }
        Ok(self.ssim(&reference.luma(), &transformed.luma()))
    }
}

impl SsimComparator {
    fn ssim(&self, a: &Array2<f64>, b: &Array2<f64>) -> f64 {
        let (height, width) = a.dim();
        if height == 0 || width == 0 {
            return 1.0;
        }

        if height < self.window || width < self.window {
            return window_ssim(a.view(), b.view());
        }

        let mut total = 0.0;
        let mut count = 0usize;
        for y in (0..=height - self.window).step_by(self.stride) {
            for x in (0..=width - self.window).step_by(self.stride) {
                let (rows, cols) = (y..y + self.window, x..x + self.window);
                total += window_ssim(
                    a.slice(s![rows.clone(), cols.clone()]),
                    b.slice(s![rows, cols]),
                );
                count += 1;
            }
        }
        total / count as f64
    }
}

fn window_ssim(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.sum() / n;
    let mean_b = b.sum() / n;

    let (mut var_a, mut var_b, mut covar) = (0.0, 0.0, 0.0);
    for (&pa, &pb) in a.iter().zip(b.iter()) {
        let da = pa - mean_a;
        let db = pb - mean_b;
        var_a += da * da;
        var_b += db * db;
        covar += da * db;
    }
    var_a /= n;
    var_b /= n;
    covar /= n;

    let numerator = (2.0 * mean_a * mean_b + SSIM_C1) * (2.0 * covar + SSIM_C2);
    let denominator = (mean_a * mean_a + mean_b * mean_b + SSIM_C1) * (var_a + var_b + SSIM_C2);
    numerator / denominator
}
