// Core buffer types shared by the road projector, lens distorter and vignette.
// Pixels are packed 0xAARRGGBB. minifb only looks at the low 24 bits, so a
// buffer can go straight to the window; the alpha byte tells the compositor
// which pixels the distorter left empty.

use crate::error::Error;
use serde::Deserialize;

/// Fully transparent black. Visual: what the distorter leaves where it has no sample.
pub const TRANSPARENT: u32 = 0x00_00_00_00;

/// Opaque black.
pub const BLACK: u32 = 0xFF_00_00_00;

/// Pack an opaque colour.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    rgba(r, g, b, 0xFF)
}

#[inline]
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Split a packed pixel into (r, g, b, a).
#[inline]
pub const fn channels(px: u32) -> (u8, u8, u8, u8) {
    (
        ((px >> 16) & 0xFF) as u8,
        ((px >> 8) & 0xFF) as u8,
        (px & 0xFF) as u8,
        ((px >> 24) & 0xFF) as u8,
    )
}

/// Colour as written in a config file: `(135, 206, 235)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    #[inline]
    pub const fn packed(self) -> u32 {
        rgb(self.0, self.1, self.2)
    }
}

/// The two scalars the game loop hands the renderer every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInputs {
    pub lateral_offset: f32,  // camera shift sideways; unbounded, not clamped
    pub scroll_position: f32, // distance travelled so far; only ever grows
}

fn check_geometry(width: usize, height: usize) -> Result<(), Error> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidGeometry { width, height });
    }
    Ok(())
}

/// Row-major colour buffer. Owned by whichever stage produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    /// Transparent black buffer. Zero-area buffers are rejected.
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        Self::filled(width, height, TRANSPARENT)
    }

    pub fn filled(width: usize, height: usize, color: u32) -> Result<Self, Error> {
        check_geometry(width, height)?;
        Ok(Self { width, height, pixels: vec![color; width * height] })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Raw pixels, ready for `Window::update_with_buffer`.
    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Write one pixel; coordinates off the buffer are ignored.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: u32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[y * self.width + x] = color;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u32] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Mirror left/right in place. Visual: the road is seen as a reflection.
    pub fn flip_horizontal(&mut self) {
        for row in self.pixels.chunks_exact_mut(self.width) {
            row.reverse();
        }
    }

    /// Copy into an `image` RGB buffer (alpha dropped), e.g. for saving a PNG.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let (r, g, b, _) = channels(self.pixels[y as usize * self.width + x as usize]);
            image::Rgb([r, g, b])
        })
    }
}

/// Per-pixel alpha with no colour of its own (0 = clear, 255 = solid).
#[derive(Clone, Debug, PartialEq)]
pub struct AlphaMask {
    width: usize,
    height: usize,
    alpha: Vec<u8>,
}

impl AlphaMask {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        check_geometry(width, height)?;
        Ok(Self { width, height, alpha: vec![0; width * height] })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.alpha[y * self.width + x])
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        &self.alpha[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn alpha_mut(&mut self) -> &mut [u8] {
        &mut self.alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_and_split() {
        let px = rgba(1, 2, 3, 4);
        assert_eq!(px, 0x04_01_02_03);
        assert_eq!(channels(px), (1, 2, 3, 4));
        assert_eq!(rgb(255, 0, 0), 0xFF_FF_00_00);
    }

    #[test]
    fn test_zero_area_rejected() {
        assert!(matches!(
            FrameBuffer::new(0, 10),
            Err(Error::InvalidGeometry { width: 0, height: 10 })
        ));
        assert!(FrameBuffer::new(10, 0).is_err());
        assert!(AlphaMask::new(0, 0).is_err());
    }

    #[test]
    fn test_put_ignores_out_of_range() {
        let mut fb = FrameBuffer::new(4, 3).unwrap();
        fb.put(-1, 0, BLACK);
        fb.put(4, 0, BLACK);
        fb.put(0, 3, BLACK);
        assert!(fb.pixels().iter().all(|&p| p == TRANSPARENT));
        fb.put(3, 2, BLACK);
        assert_eq!(fb.get(3, 2), Some(BLACK));
        assert_eq!(fb.get(4, 2), None);
    }

    #[test]
    fn test_flip_horizontal() {
        let mut fb = FrameBuffer::new(3, 2).unwrap();
        fb.put(0, 0, rgb(9, 9, 9));
        fb.put(2, 1, rgb(7, 7, 7));
        fb.flip_horizontal();
        assert_eq!(fb.get(2, 0), Some(rgb(9, 9, 9)));
        assert_eq!(fb.get(0, 1), Some(rgb(7, 7, 7)));
        assert_eq!(fb.get(0, 0), Some(TRANSPARENT));
    }

    #[test]
    fn test_to_rgb_image() {
        let fb = FrameBuffer::filled(2, 2, rgb(10, 20, 30)).unwrap();
        let img = fb.to_rgb_image();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(1, 1).0, [10, 20, 30]);
    }
}
