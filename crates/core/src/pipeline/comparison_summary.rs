use crate::comparison::domain::comparison_record::ComparisonRecord;
use crate::shared::error::StreamRole;

/// Aggregate outcome of a comparison run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComparisonSummary {
    pub frames: usize,
    /// Pairs whose transformed frame had to be rescaled first.
    pub rescaled: usize,
    /// Lowest score and the index it occurred at.
    pub min: Option<(usize, f64)>,
    /// Set when the run stopped early because this stream ended first.
    pub truncated: Option<StreamRole>,
    ssim_sum: f64,
}

impl ComparisonSummary {
    pub fn record(&mut self, record: &ComparisonRecord) {
        self.frames += 1;
        self.ssim_sum += record.ssim;
        if self.min.map_or(true, |(_, min)| record.ssim < min) {
            self.min = Some((record.index, record.ssim));
        }
    }

    pub fn mean_ssim(&self) -> Option<f64> {
        (self.frames > 0).then(|| self.ssim_sum / self.frames as f64)
    }
}
