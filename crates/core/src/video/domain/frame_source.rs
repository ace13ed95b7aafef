use crate::shared::error::CompareError;
use crate::shared::raw_frame::RawFrame;

/// Demuxes one container and yields compressed frames in stream order.
///
/// `Ok(None)` means the container is exhausted.
pub trait FrameSource: Send {
    /// What the paired [`FrameDecoder`](super::frame_decoder::FrameDecoder) consumes.
    type Packet;

    fn fetch_next(&mut self) -> Result<Option<RawFrame<Self::Packet>>, CompareError>;
}
