use crate::shared::error::CompareError;
use crate::shared::frame::Frame;
use crate::shared::raw_frame::RawFrame;

/// Turns compressed frames into displayable ones.
///
/// A decoder may hold input back for reordering, so `decode` yields zero or
/// one frame per call. `Ok(None)` is the "buffered, feed me more" signal, not
/// a failure.
pub trait FrameDecoder: Send {
    type Packet;

    fn decode(&mut self, raw: &RawFrame<Self::Packet>) -> Result<Option<Frame>, CompareError>;

    /// Signals end of input and asks for one frame held back by earlier
    /// `decode` calls. Equivalent to feeding an empty raw frame.
    fn flush(&mut self) -> Result<Option<Frame>, CompareError>;
}
