use crate::shared::error::CompareError;
use crate::shared::frame::Frame;
use crate::video::domain::frame_decoder::FrameDecoder;
use crate::video::domain::frame_source::FrameSource;

/// How many held-back frames to recover once the source is exhausted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrainPolicy {
    /// Flush once and stop, recovering at most one buffered frame.
    Single,
    /// Flush until the decoder has nothing left.
    #[default]
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReaderPhase {
    Reading,
    Draining,
    Done,
}

/// Presents one source/decoder pair as a pull sequence of decoded frames.
///
/// Decoder buffering is invisible to the caller: `next_frame` only returns
/// `Ok(None)` at true end of stream, and keeps returning it afterwards.
pub struct FrameReader<P> {
    name: String,
    source: Box<dyn FrameSource<Packet = P>>,
    decoder: Box<dyn FrameDecoder<Packet = P>>,
    drain_policy: DrainPolicy,
    phase: ReaderPhase,
    last_keyframe_pos: i64,
    pending_buffered: usize,
    flushing: bool,
    packets_read: usize,
    frames_emitted: usize,
}

impl<P> FrameReader<P> {
    pub fn new(
        name: impl Into<String>,
        source: Box<dyn FrameSource<Packet = P>>,
        decoder: Box<dyn FrameDecoder<Packet = P>>,
        drain_policy: DrainPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            decoder,
            drain_policy,
            phase: ReaderPhase::Reading,
            last_keyframe_pos: 0,
            pending_buffered: 0,
            flushing: false,
            packets_read: 0,
            frames_emitted: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> ReaderPhase {
        self.phase
    }

    /// Position of the most recent keyframe fed to the decoder, 0 before any.
    pub fn last_keyframe_pos(&self) -> i64 {
        self.last_keyframe_pos
    }

    /// Frames the decoder currently owes us.
    pub fn pending_buffered(&self) -> usize {
        self.pending_buffered
    }

    pub fn frames_emitted(&self) -> usize {
        self.frames_emitted
    }

    /// Pulls the next decoded frame. A fatal error also ends the sequence.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, CompareError> {
        let result = self.advance();
        match &result {
            Ok(Some(_)) => self.frames_emitted += 1,
            Ok(None) => {}
            Err(_) => self.phase = ReaderPhase::Done,
        }
        result
    }

    fn advance(&mut self) -> Result<Option<Frame>, CompareError> {
        loop {
            match self.phase {
                ReaderPhase::Reading => {
                    if let Some(frame) = self.read_one()? {
                        return Ok(Some(frame));
                    }
                }
                ReaderPhase::Draining => return self.drain(),
                ReaderPhase::Done => return Ok(None),
            }
        }
    }

    /// Feeds one raw frame to the decoder. `Ok(None)` means "go round again",
    /// either because the decoder buffered or because the source ran dry.
    fn read_one(&mut self) -> Result<Option<Frame>, CompareError> {
        let Some(raw) = self.source.fetch_next()? else {
            log::debug!(
                "{}: source exhausted after {} packets, {} buffered",
                self.name,
                self.packets_read,
                self.pending_buffered
            );
            self.phase = ReaderPhase::Draining;
            return Ok(None);
        };

        let packet_index = self.packets_read;
        self.packets_read += 1;

        if !raw.has_valid_position() {
            return Err(CompareError::CorruptStream {
                stream: self.name.clone(),
                packet_index,
                position: raw.position,
            });
        }

        if raw.is_keyframe {
            self.last_keyframe_pos = raw.position;
        }

        match self.decoder.decode(&raw)? {
            Some(frame) => Ok(Some(frame)),
            None => {
                self.pending_buffered += 1;
                Ok(None)
            }
        }
    }

    fn drain(&mut self) -> Result<Option<Frame>, CompareError> {
        if self.pending_buffered == 0 && !self.flushing {
            self.phase = ReaderPhase::Done;
            return Ok(None);
        }
        self.flushing = true;

        let Some(frame) = self.decoder.flush()? else {
            log::debug!("{}: decoder drained", self.name);
            self.pending_buffered = 0;
            self.phase = ReaderPhase::Done;
            return Ok(None);
        };
        self.pending_buffered = self.pending_buffered.saturating_sub(1);

        if self.drain_policy == DrainPolicy::Single {
            if self.pending_buffered > 0 {
                log::warn!(
                    "{}: abandoning {} buffered frame(s) after single drain",
                    self.name,
                    self.pending_buffered
                );
            }
            self.phase = ReaderPhase::Done;
        }
        Ok(Some(frame))
    }
}
