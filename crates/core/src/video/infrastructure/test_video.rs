use std::path::Path;

use ffmpeg_next::format::Pixel;
use ffmpeg_next::util::frame::video::Video;
use ffmpeg_next::{codec, encoder, format, Packet, Rational};

/// Synthetic MPEG-4 clip for decoder tests: flat grey frames that brighten by
/// 40 (RGB) per frame, written straight into YUV420P planes.
pub(crate) struct TestVideo {
    frames: usize,
    width: u32,
    height: u32,
    fps: i32,
    b_frames: usize,
    gop: u32,
}

impl TestVideo {
    pub(crate) fn new(frames: usize, width: u32, height: u32) -> Self {
        Self {
            frames,
            width,
            height,
            fps: 25,
            b_frames: 0,
            gop: 12,
        }
    }

    pub(crate) fn with_fps(mut self, fps: i32) -> Self {
        self.fps = fps;
        self
    }

    /// Allows runs of up to `b_frames` B-frames. The decoder then has to
    /// hold each reference frame back until the next one arrives.
    pub(crate) fn with_b_frames(mut self, b_frames: usize) -> Self {
        self.b_frames = b_frames;
        self
    }

    pub(crate) fn with_gop(mut self, gop: u32) -> Self {
        self.gop = gop;
        self
    }

    pub(crate) fn write(&self, path: &Path) {
        ffmpeg_next::init().unwrap();

        let mut octx = format::output(path).unwrap();
        let global_header = octx
            .format()
            .flags()
            .contains(format::Flags::GLOBAL_HEADER);

        let codec = encoder::find(codec::Id::MPEG4).unwrap();
        let time_base = Rational(1, self.fps);

        let mut ctx = codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()
            .unwrap();
        ctx.set_width(self.width);
        ctx.set_height(self.height);
        ctx.set_format(Pixel::YUV420P);
        ctx.set_time_base(time_base);
        ctx.set_frame_rate(Some(Rational(self.fps, 1)));
        ctx.set_gop(self.gop);
        ctx.set_max_b_frames(self.b_frames);
        if global_header {
            ctx.set_flags(codec::Flags::GLOBAL_HEADER);
        }

        let mut encoder = ctx.open_with(ffmpeg_next::Dictionary::new()).unwrap();
        octx.add_stream(Some(codec))
            .unwrap()
            .set_parameters(&encoder);
        octx.write_header().unwrap();
        let stream_time_base = octx.stream(0).unwrap().time_base();

        for i in 0..self.frames {
            let mut frame = self.grey_frame(i);
            frame.set_pts(Some(i as i64));
            encoder.send_frame(&frame).unwrap();
            mux_pending(&mut encoder, &mut octx, time_base, stream_time_base);
        }

        encoder.send_eof().unwrap();
        mux_pending(&mut encoder, &mut octx, time_base, stream_time_base);
        octx.write_trailer().unwrap();
    }

    fn grey_frame(&self, i: usize) -> Video {
        let shade = ((i * 40) % 256) as u32;
        let luma = (16 + shade * 219 / 255) as u8;
        let (w, h) = (self.width as usize, self.height as usize);

        let mut frame = Video::new(Pixel::YUV420P, self.width, self.height);
        fill_plane(&mut frame, 0, w, h, luma);
        fill_plane(&mut frame, 1, w.div_ceil(2), h.div_ceil(2), 128);
        fill_plane(&mut frame, 2, w.div_ceil(2), h.div_ceil(2), 128);
        frame
    }
}

fn fill_plane(frame: &mut Video, plane: usize, cols: usize, rows: usize, value: u8) {
    let stride = frame.stride(plane);
    let data = frame.data_mut(plane);
    for row in 0..rows {
        data[row * stride..row * stride + cols].fill(value);
    }
}

fn mux_pending(
    encoder: &mut encoder::Video,
    octx: &mut format::context::Output,
    encoder_time_base: Rational,
    stream_time_base: Rational,
) {
    let mut packet = Packet::empty();
    while encoder.receive_packet(&mut packet).is_ok() {
        packet.set_stream(0);
        // One frame in encoder ticks; the encoder leaves it unset.
        packet.set_duration(1);
        packet.rescale_ts(encoder_time_base, stream_time_base);
        packet.write_interleaved(octx).unwrap();
    }
}
