use ffmpeg_next::software::scaling;
use ffmpeg_next::util::frame::video::Video;

use crate::shared::error::CompareError;
use crate::shared::frame::Frame;
use crate::shared::raw_frame::RawFrame;
use crate::video::domain::frame_decoder::FrameDecoder;

/// Decodes compressed frames via libavcodec and converts them to RGB24.
///
/// Each `decode` call sends at most one packet and receives at most one
/// frame. The first flush sends end-of-stream; later flushes only collect
/// what the codec still holds.
pub struct FfmpegDecoder {
    name: String,
    decoder: ffmpeg_next::decoder::Video,
    scaler: Option<scaling::Context>,
    eof_sent: bool,
    frame_index: usize,
}

// Safety: FfmpegDecoder is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegDecoder {}

impl FfmpegDecoder {
    pub fn new(name: impl Into<String>, decoder: ffmpeg_next::decoder::Video) -> Self {
        Self {
            name: name.into(),
            decoder,
            scaler: None,
            eof_sent: false,
            frame_index: 0,
        }
    }

    fn decode_error(&self, err: impl std::fmt::Display) -> CompareError {
        CompareError::Decode {
            stream: self.name.clone(),
            reason: err.to_string(),
        }
    }

    fn try_receive(&mut self) -> Result<Option<Frame>, CompareError> {
        let mut decoded = Video::empty();
        match self.decoder.receive_frame(&mut decoded) {
            Ok(()) => self.convert_to_rgb(&decoded).map(Some),
            Err(ffmpeg_next::Error::Other { errno }) if errno == ffmpeg_next::util::error::EAGAIN => {
                Ok(None)
            }
            Err(ffmpeg_next::Error::Eof) => Ok(None),
            Err(e) => Err(self.decode_error(e)),
        }
    }

    fn convert_to_rgb(&mut self, decoded: &Video) -> Result<Frame, CompareError> {
        let width = decoded.width();
        let height = decoded.height();
        let format = decoded.format();

        let stale = self.scaler.as_ref().map_or(true, |s| {
            let input = s.input();
            input.format != format || input.width != width || input.height != height
        });
        if stale {
            let scaler = scaling::Context::get(
                format,
                width,
                height,
                ffmpeg_next::format::Pixel::RGB24,
                width,
                height,
                scaling::Flags::BILINEAR,
            )
            .map_err(|e| self.decode_error(e))?;
            self.scaler = Some(scaler);
        }

        let mut rgb_frame = Video::empty();
        if let Some(scaler) = self.scaler.as_mut() {
            scaler
                .run(decoded, &mut rgb_frame)
                .map_err(|e| CompareError::Decode {
                    stream: self.name.clone(),
                    reason: e.to_string(),
                })?;
        }

        let pixels = extract_rgb_pixels(&rgb_frame, width, height);
        let frame = Frame::new(pixels, width, height, 3, self.frame_index);
        self.frame_index += 1;
        Ok(frame)
    }
}

impl FrameDecoder for FfmpegDecoder {
    type Packet = ffmpeg_next::Packet;

    fn decode(
        &mut self,
        raw: &RawFrame<ffmpeg_next::Packet>,
    ) -> Result<Option<Frame>, CompareError> {
        let packet = &raw.payload;
        match self.decoder.send_packet(packet) {
            Ok(()) => self.try_receive(),
            Err(ffmpeg_next::Error::Other { errno }) if errno == ffmpeg_next::util::error::EAGAIN => {
                // Codec output is full: hand out the waiting frame, then the
                // packet is accepted and its output stays buffered.
                let frame = self.try_receive()?;
                self.decoder
                    .send_packet(packet)
                    .map_err(|e| self.decode_error(e))?;
                Ok(frame)
            }
            Err(e) => Err(self.decode_error(e)),
        }
    }

    fn flush(&mut self) -> Result<Option<Frame>, CompareError> {
        if !self.eof_sent {
            self.decoder
                .send_eof()
                .map_err(|e| self.decode_error(e))?;
            self.eof_sent = true;
        }
        self.try_receive()
    }
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer,
/// dropping the per-row padding (stride > width * 3).
fn extract_rgb_pixels(rgb_frame: &Video, width: u32, height: u32) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let row_bytes = width as usize * 3;

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + row_bytes]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::domain::frame_source::FrameSource;
    use crate::video::infrastructure::ffmpeg_source::FfmpegSource;
    use crate::video::infrastructure::test_video::TestVideo;
    use std::path::Path;

    fn open(path: &Path) -> (FfmpegSource, FfmpegDecoder) {
        ffmpeg_next::init().unwrap();
        let ictx = ffmpeg_next::format::input(path).unwrap();
        let stream = ictx.streams().best(ffmpeg_next::media::Type::Video).unwrap();
        let index = stream.index();
        let decoder = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .unwrap()
            .decoder()
            .video()
            .unwrap();
        (FfmpegSource::new(ictx, index), FfmpegDecoder::new("test", decoder))
    }

    #[test]
    fn test_flush_before_any_input_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.mp4");
        TestVideo::new(2, 64, 48).write(&path);

        let (_, mut decoder) = open(&path);
        assert!(decoder.flush().unwrap().is_none());
        assert!(decoder.flush().unwrap().is_none());
    }

    /// Decodes every packet, then flushes. Returns (frames from decode,
    /// frames from flush).
    fn decode_all(path: &Path) -> (usize, usize) {
        let (mut source, mut decoder) = open(path);
        let mut decoded = 0;
        while let Some(raw) = source.fetch_next().unwrap() {
            assert!(raw.has_valid_position());
            if decoder.decode(&raw).unwrap().is_some() {
                decoded += 1;
            }
        }
        let mut flushed = 0;
        while decoder.flush().unwrap().is_some() {
            flushed += 1;
        }
        assert!(source.fetch_next().unwrap().is_none());
        (decoded, flushed)
    }

    #[test]
    fn test_decode_then_flush_accounts_for_every_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.mp4");
        TestVideo::new(4, 64, 48).write(&path);

        let (decoded, flushed) = decode_all(&path);
        assert_eq!(decoded + flushed, 4);
    }

    #[test]
    fn test_b_frames_leave_frames_for_the_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bframes.mp4");
        TestVideo::new(9, 64, 48)
            .with_b_frames(2)
            .with_gop(6)
            .write(&path);

        let (decoded, flushed) = decode_all(&path);
        assert_eq!(decoded + flushed, 9);
        assert!(flushed >= 1, "reordering decoder returned nothing on flush");
    }

    #[test]
    fn test_frames_are_tightly_packed_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.mp4");
        // 66 * 3 bytes per row is not a multiple of the row alignment.
        TestVideo::new(1, 66, 50).write(&path);

        let (mut source, mut decoder) = open(&path);
        let raw = source.fetch_next().unwrap().unwrap();
        assert!(raw.is_keyframe);
        let frame = match decoder.decode(&raw).unwrap() {
            Some(frame) => frame,
            None => decoder.flush().unwrap().unwrap(),
        };
        assert_eq!(frame.dimensions(), (66, 50));
        assert_eq!(frame.data().len(), 66 * 50 * 3);
        assert_eq!(frame.index(), 0);
    }
}
