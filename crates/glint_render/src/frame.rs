//! Rendered output: a row-major grid of linear RGB colors.

use image::RgbImage;

use crate::Color;

/// A finished (or in-progress) render target.
///
/// Channels are linear floats; conversion to bytes happens only at
/// [`Frame::to_rgb_image`] time.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Row-major pixels, row 0 at the top.
    pub pixels: Vec<Color>,
}

impl Frame {
    /// An all-black frame of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to an 8-bit RGB image ready for [`RgbImage::save`].
    pub fn to_rgb_image(&self) -> RgbImage {
        let mut image = RgbImage::new(self.width, self.height);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let color = self.get(x, y);
            *pixel = image::Rgb([
                channel_to_byte(color.x),
                channel_to_byte(color.y),
                channel_to_byte(color.z),
            ]);
        }
        image
    }
}

/// Scale a [0, 1] channel to a byte, truncating. No gamma correction.
#[inline]
fn channel_to_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}
