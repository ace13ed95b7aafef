use crate::shared::error::CompareError;
use crate::shared::raw_frame::RawFrame;
use crate::video::domain::frame_source::FrameSource;

/// Demuxes the packets of one video stream via libavformat.
///
/// Packets belonging to other streams (audio, subtitles) are skipped.
/// Video packets are passed on whole, so duration and codec side data
/// (new extradata, parameter changes, palettes) reach the decoder.
pub struct FfmpegSource {
    input_ctx: ffmpeg_next::format::context::Input,
    video_stream_index: usize,
}

// Safety: FfmpegSource is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegSource {}

impl FfmpegSource {
    pub fn new(input_ctx: ffmpeg_next::format::context::Input, video_stream_index: usize) -> Self {
        Self {
            input_ctx,
            video_stream_index,
        }
    }
}

impl FrameSource for FfmpegSource {
    type Packet = ffmpeg_next::Packet;

    fn fetch_next(&mut self) -> Result<Option<RawFrame<ffmpeg_next::Packet>>, CompareError> {
        loop {
            let Some((stream, packet)) = self.input_ctx.packets().next() else {
                return Ok(None);
            };

            if stream.index() != self.video_stream_index {
                continue;
            }

            if packet.size() == 0 {
                log::debug!("skipping empty packet at {}", packet.position());
                continue;
            }

            // The packet travels to the decoder as demuxed, side data included.
            return Ok(Some(RawFrame::new(
                packet.position() as i64,
                packet.is_key(),
                packet,
            )));
        }
    }
}
