use std::path::Path;

use crate::shared::error::CompareError;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_reader::{DrainPolicy, FrameReader};
use crate::video::infrastructure::ffmpeg_decoder::FfmpegDecoder;
use crate::video::infrastructure::ffmpeg_source::FfmpegSource;

/// Reader over a demuxed file: packets go to the decoder as demuxed.
pub type FfmpegFrameReader = FrameReader<ffmpeg_next::Packet>;

/// Opens the best video stream of `path` and wraps it in a [`FrameReader`].
///
/// The reader is named after the file so errors point at the right input.
pub fn open_stream(
    path: &Path,
    drain_policy: DrainPolicy,
) -> Result<(FfmpegFrameReader, VideoMetadata), CompareError> {
    let unsupported = |reason: String| CompareError::UnsupportedInput {
        path: path.to_path_buf(),
        reason,
    };

    ffmpeg_next::init().map_err(|e| unsupported(e.to_string()))?;

    let input_ctx = ffmpeg_next::format::input(path).map_err(|e| unsupported(e.to_string()))?;

    let stream = input_ctx
        .streams()
        .best(ffmpeg_next::media::Type::Video)
        .ok_or_else(|| unsupported("no video stream found".to_string()))?;

    let video_stream_index = stream.index();
    let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
        .map_err(|e| unsupported(e.to_string()))?;
    let decoder = codec_ctx
        .decoder()
        .video()
        .map_err(|e| unsupported(e.to_string()))?;

    let rate = stream.rate();
    let fps = if rate.denominator() != 0 {
        rate.numerator() as f64 / rate.denominator() as f64
    } else {
        0.0
    };

    let metadata = VideoMetadata {
        width: decoder.width(),
        height: decoder.height(),
        fps,
        total_frames: stream.frames().max(0) as usize,
        codec: decoder
            .codec()
            .map(|c| c.name().to_string())
            .unwrap_or_default(),
        source_path: Some(path.to_path_buf()),
    };

    let name = path.display().to_string();
    let reader = FrameReader::new(
        name.clone(),
        Box::new(FfmpegSource::new(input_ctx, video_stream_index)),
        Box::new(FfmpegDecoder::new(name, decoder)),
        drain_policy,
    );

    Ok((reader, metadata))
}
