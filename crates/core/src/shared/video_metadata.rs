use std::fmt;
use std::path::PathBuf;

/// Container-level facts about an opened stream, as reported before decoding.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Frame count declared by the container; 0 when unknown.
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl fmt::Display for VideoMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} {} @ {:.3} fps",
            self.width, self.height, self.codec, self.fps
        )?;
        if self.total_frames > 0 {
            write!(f, ", {} frames", self.total_frames)?;
        }
        Ok(())
    }
}
