use std::collections::HashMap;
use std::time::Instant;

use crate::pipeline::comparison_summary::ComparisonSummary;

/// Observer for comparison runs.
///
/// Keeps the use case free of output concerns: the CLI reports through the
/// `log` crate, tests plug in [`NullComparisonLogger`].
pub trait ComparisonLogger: Send {
    /// Report how many frame pairs have been compared. `total` is 0 when the
    /// container did not declare a frame count.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one frame pair.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-run report. Default: no-op.
    fn summary(&self, _summary: &ComparisonSummary) {}
}

/// Discards all events.
pub struct NullComparisonLogger;

impl ComparisonLogger for NullComparisonLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Reports through `log::info!`, throttling progress to every
/// `throttle_frames` pairs and adding stage timings to the final summary.
pub struct StdoutComparisonLogger {
    throttle_frames: usize,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
}

impl StdoutComparisonLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            start_time: Instant::now(),
        }
    }

    /// Returns the formatted summary, or `None` if nothing was compared.
    pub fn summary_string(&self, summary: &ComparisonSummary) -> Option<String> {
        let mean = summary.mean_ssim()?;

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Comparison summary ({} frames, {:.1}s total):",
            summary.frames,
            elapsed_ms / 1000.0
        )];

        lines.push(format!("  SSIM mean: {mean:.6}"));
        if let Some((index, ssim)) = summary.min {
            lines.push(format!("  SSIM min:  {ssim:.6} at frame {index}"));
        }
        if summary.rescaled > 0 {
            lines.push(format!(
                "  Rescaled: {} of {} pairs",
                summary.rescaled, summary.frames
            ));
        }
        if let Some(exhausted) = summary.truncated {
            lines.push(format!(
                "  Truncated: {exhausted} stream ended first, rest of the {} stream ignored",
                exhausted.other()
            ));
        }

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len() as f64;
            lines.push(format!(
                "  {stage:8}: avg {avg_ms:6.2}ms  total {total_ms:7.0}ms"
            ));
        }

        if elapsed_ms > 0.0 {
            let fps = summary.frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }
}

impl Default for StdoutComparisonLogger {
    fn default() -> Self {
        Self::new(crate::shared::constants::DEFAULT_PROGRESS_EVERY)
    }
}

impl ComparisonLogger for StdoutComparisonLogger {
    fn progress(&mut self, current: usize, total: usize) {
        if current % self.throttle_frames != 0 && current != total {
            return;
        }
        if total > 0 {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Compared {current}/{total} frames ({pct:.1}%)");
        } else {
            log::info!("Compared {current} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self, summary: &ComparisonSummary) {
        if let Some(text) = self.summary_string(summary) {
            log::info!("\n\n{text}");
        }
    }
}
