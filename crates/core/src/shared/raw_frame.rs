/// A compressed unit as demuxed from a container, before decoding.
///
/// `position` is the byte offset of the packet in its file; a negative value
/// means the demuxer could not place it. `payload` is whatever the paired
/// decoder consumes, handed over untouched so codec side data survives.
#[derive(Clone, Debug, PartialEq)]
pub struct RawFrame<P> {
    pub position: i64,
    pub is_keyframe: bool,
    pub payload: P,
}

impl<P> RawFrame<P> {
    pub fn new(position: i64, is_keyframe: bool, payload: P) -> Self {
        Self {
            position,
            is_keyframe,
            payload,
        }
    }

    pub fn has_valid_position(&self) -> bool {
        self.position >= 0
    }
}
