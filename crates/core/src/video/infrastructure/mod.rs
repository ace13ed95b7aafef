pub mod ffmpeg_decoder;
pub mod ffmpeg_source;
pub mod ffmpeg_stream;
#[cfg(test)]
pub(crate) mod test_video;
