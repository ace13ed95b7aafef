use std::time::Instant;

use crate::comparison::domain::comparison_record::ComparisonRecord;
use crate::comparison::domain::frame_comparator::FrameComparator;
use crate::comparison::domain::record_sink::RecordSink;
use crate::pipeline::comparison_logger::{ComparisonLogger, NullComparisonLogger};
use crate::pipeline::comparison_summary::ComparisonSummary;
use crate::shared::error::{CompareError, StreamRole};
use crate::shared::frame::Frame;
use crate::video::domain::frame_reader::FrameReader;

/// What to do when one stream runs out of frames before the other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LengthMismatchPolicy {
    /// Stop with [`CompareError::StreamLengthMismatch`].
    #[default]
    Fail,
    /// Stop at the shorter stream and log a warning.
    Truncate,
}

/// Pairs frames from a reference and a transformed stream by output order,
/// scores each pair and emits one record per pair.
///
/// The reference resolution is authoritative: a transformed frame of a
/// different size is rescaled to match before scoring.
pub struct CompareStreamsUseCase<P> {
    reference: FrameReader<P>,
    transformed: FrameReader<P>,
    comparator: Box<dyn FrameComparator>,
    sink: Box<dyn RecordSink>,
    mismatch_policy: LengthMismatchPolicy,
    logger: Box<dyn ComparisonLogger>,
    total_frames: usize,
}

impl<P> CompareStreamsUseCase<P> {
    pub fn new(
        reference: FrameReader<P>,
        transformed: FrameReader<P>,
        comparator: Box<dyn FrameComparator>,
        sink: Box<dyn RecordSink>,
    ) -> Self {
        Self {
            reference,
            transformed,
            comparator,
            sink,
            mismatch_policy: LengthMismatchPolicy::default(),
            logger: Box::new(NullComparisonLogger),
            total_frames: 0,
        }
    }

    pub fn with_mismatch_policy(mut self, policy: LengthMismatchPolicy) -> Self {
        self.mismatch_policy = policy;
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn ComparisonLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Expected pair count, used only for progress reporting.
    pub fn with_total_frames(mut self, total_frames: usize) -> Self {
        self.total_frames = total_frames;
        self
    }

    /// Runs until both streams end. Records already written stay written if
    /// an error stops the run part way.
    pub fn execute(&mut self) -> Result<ComparisonSummary, CompareError> {
        let mut summary = ComparisonSummary::default();

        for index in 1.. {
            let Some((reference, transformed)) = self.next_pair(index, &mut summary)? else {
                break;
            };

            let transformed = if reference.has_same_dimensions(&transformed) {
                transformed
            } else {
                if summary.rescaled == 0 {
                    self.logger.info(&format!(
                        "Transformed frames are {}x{}; rescaling to {}x{}",
                        transformed.width(),
                        transformed.height(),
                        reference.width(),
                        reference.height()
                    ));
                }
                let started = Instant::now();
                let rescaled = transformed.rescale(reference.width(), reference.height());
                self.logger.timing("rescale", elapsed_ms(started));
                summary.rescaled += 1;
                rescaled
            };

            let started = Instant::now();
            let ssim = self.comparator.compare(&reference, &transformed)?;
            self.logger.timing("ssim", elapsed_ms(started));

            let record = ComparisonRecord {
                index,
                keyframe_pos: self.transformed.last_keyframe_pos(),
                ssim,
            };
            self.sink.write(&record)?;
            summary.record(&record);

            self.logger.progress(index, self.total_frames);
        }

        self.sink.finish()?;
        self.logger.summary(&summary);
        Ok(summary)
    }

    /// Pulls one frame from each stream. `Ok(None)` ends the run.
    fn next_pair(
        &mut self,
        index: usize,
        summary: &mut ComparisonSummary,
    ) -> Result<Option<(Frame, Frame)>, CompareError> {
        let started = Instant::now();
        let reference = self.reference.next_frame()?;
        let transformed = self.transformed.next_frame()?;
        self.logger.timing("decode", elapsed_ms(started));

        let exhausted = match (reference, transformed) {
            (Some(reference), Some(transformed)) => return Ok(Some((reference, transformed))),
            (None, None) => return Ok(None),
            (None, Some(_)) => StreamRole::Reference,
            (Some(_), None) => StreamRole::Transformed,
        };

        match self.mismatch_policy {
            LengthMismatchPolicy::Fail => {
                Err(CompareError::StreamLengthMismatch { index, exhausted })
            }
            LengthMismatchPolicy::Truncate => {
                log::warn!(
                    "{exhausted} stream ended after {} frames; ignoring the rest of the {} stream",
                    index - 1,
                    exhausted.other()
                );
                summary.truncated = Some(exhausted);
                Ok(None)
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
