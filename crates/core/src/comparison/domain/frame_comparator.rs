use crate::shared::error::CompareError;
use crate::shared::frame::Frame;

/// Scores how similar two equally-sized frames are.
///
/// Callers must rescale first; implementations reject frames whose
/// dimensions differ with [`CompareError::DimensionMismatch`].
pub trait FrameComparator: Send {
    fn compare(&self, reference: &Frame, transformed: &Frame) -> Result<f64, CompareError>;
}
