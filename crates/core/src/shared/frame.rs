use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, Rgb, Rgba};
use ndarray::{Array2, ArrayView3};

/// A decoded video frame: contiguous 8-bit pixels in row-major order.
///
/// Decoders convert to packed RGB before handing frames out; the comparison
/// layer only ever reads pixels and never mutates a frame it received.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Zero-based output order within the stream that produced this frame.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn has_same_dimensions(&self, other: &Frame) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Returns a resampled copy at `width` x `height`. `self` is untouched.
    pub fn rescale(&self, width: u32, height: u32) -> Frame {
        if self.width == width && self.height == height {
            return self.clone();
        }

        let data = match self.channels {
            1 => resize_buffer::<Luma<u8>>(self, width, height),
            4 => resize_buffer::<Rgba<u8>>(self, width, height),
            _ => resize_buffer::<Rgb<u8>>(self, width, height),
        };
        Frame::new(data, width, height, self.channels, self.index)
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// BT.601 luma plane as `(height, width)` floats in 0..=255.
    pub fn luma(&self) -> Array2<f64> {
        let pixels = self.as_ndarray();
        if self.channels < 3 {
            return pixels.index_axis(ndarray::Axis(2), 0).mapv(f64::from);
        }
        Array2::from_shape_fn((self.height as usize, self.width as usize), |(y, x)| {
            0.299 * f64::from(pixels[[y, x, 0]])
                + 0.587 * f64::from(pixels[[y, x, 1]])
                + 0.114 * f64::from(pixels[[y, x, 2]])
        })
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

fn resize_buffer<P>(frame: &Frame, width: u32, height: u32) -> Vec<u8>
where
    P: image::Pixel<Subpixel = u8> + 'static,
{
    let src: ImageBuffer<P, &[u8]> =
        ImageBuffer::from_raw(frame.width(), frame.height(), frame.data())
            .expect("Frame data length must match dimensions");
    imageops::resize(&src, width, height, FilterType::Triangle).into_raw()
}
