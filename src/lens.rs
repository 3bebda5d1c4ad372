// Convex-lens remap. Every output pixel pulls its colour from a point further
// out along the same ray from the centre, by a factor 1 + k*r².
// Visual: the middle of the lens looks squeezed, the rim looks stretched, and
// the corners go black where the sample falls off the source image.

use crate::error::Error;
use crate::types::{FrameBuffer, TRANSPARENT};
use rayon::prelude::*;
use tracing::debug;

/// Centre and half-diagonal of a w×h buffer.
#[inline]
pub(crate) fn lens_geometry(width: usize, height: usize) -> (f32, f32, f32) {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    (cx, cy, (cx * cx + cy * cy).sqrt())
}

/// Source pixel for destination (x, y), or `None` when it lands off the buffer.
#[inline]
fn source_of(x: usize, y: usize, width: usize, height: usize, k: f32) -> Option<(usize, usize)> {
    let (cx, cy, max_r) = lens_geometry(width, height);
    let (ox, oy) = (x as f32 - cx, y as f32 - cy);
    let (dx, dy) = (ox / max_r, oy / max_r);
    let f = 1.0 + k * (dx * dx + dy * dy);

    // dx * max_r is just the pixel offset again, so f == 1 maps exactly onto itself.
    // Truncate toward zero, then reject anything outside: no clamping, no wrap.
    let sx = (cx + ox * f).trunc();
    let sy = (cy + oy * f).trunc();
    if sx < 0.0 || sy < 0.0 || sx >= width as f32 || sy >= height as f32 {
        return None;
    }
    Some((sx as usize, sy as usize))
}

/// One-shot distortion of any buffer, computing the mapping as it goes.
pub fn distort(src: &FrameBuffer, k: f32) -> FrameBuffer {
    let (w, h) = src.dimensions();
    let mut out = src.clone();
    out.pixels_mut().par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, px) in row.iter_mut().enumerate() {
            *px = match source_of(x, y, w, h, k) {
                Some((sx, sy)) => src.pixels()[sy * w + sx],
                None => TRANSPARENT,
            };
        }
    });
    out
}

/// Precomputed `(x, y) -> source index` table for one buffer size.
#[derive(Debug, Clone, PartialEq)]
pub struct DistortionMap {
    width: usize,
    height: usize,
    source: Vec<Option<u32>>,
}

impl DistortionMap {
    pub fn new(width: usize, height: usize, k: f32) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidGeometry { width, height });
        }
        let mut source = vec![None; width * height];
        source.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            for (x, slot) in row.iter_mut().enumerate() {
                *slot = source_of(x, y, width, height, k).map(|(sx, sy)| (sy * width + sx) as u32);
            }
        });
        let misses = source.iter().filter(|s| s.is_none()).count();
        debug!(width, height, k, misses, "built distortion map");
        Ok(Self { width, height, source })
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Source pixel index for destination (x, y).
    #[inline]
    pub fn lookup(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.source[y * self.width + x].map(|i| i as usize)
    }
}

/// Lens distorter bound to one lens size; the mapping is built once.
pub struct LensDistorter {
    map: DistortionMap,
}

impl LensDistorter {
    pub fn new(width: usize, height: usize, k: f32) -> Result<Self, Error> {
        Ok(Self { map: DistortionMap::new(width, height, k)? })
    }

    pub fn map(&self) -> &DistortionMap {
        &self.map
    }

    /// Gather every output pixel from `src` through the map. Pixels with no
    /// source stay transparent black.
    pub fn distort(&self, src: &FrameBuffer) -> Result<FrameBuffer, Error> {
        let dims = self.map.dimensions();
        if src.dimensions() != dims {
            return Err(Error::SizeMismatch { expected: dims, actual: src.dimensions() });
        }
        let mut out = FrameBuffer::new(dims.0, dims.1)?;
        let pixels = src.pixels();
        out.pixels_mut()
            .par_chunks_mut(dims.0)
            .zip(self.map.source.par_chunks(dims.0))
            .for_each(|(row, sources)| {
                for (px, s) in row.iter_mut().zip(sources) {
                    if let Some(i) = s {
                        *px = pixels[*i as usize];
                    }
                }
            });
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::rgb;

    const K: f32 = 0.35;

    fn gradient(w: usize, h: usize) -> FrameBuffer {
        let mut fb = FrameBuffer::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                fb.put(x as i32, y as i32, rgb(x as u8, y as u8, 7));
            }
        }
        fb
    }

    #[test]
    fn test_center_maps_to_itself() {
        let map = DistortionMap::new(260, 160, K).unwrap();
        assert_eq!(map.lookup(130, 80), Some(80 * 260 + 130));

        let src = gradient(260, 160);
        let out = LensDistorter::new(260, 160, K).unwrap().distort(&src).unwrap();
        assert_eq!(out.get(130, 80), src.get(130, 80));
    }

    #[test]
    fn test_solid_buffer_stays_solid_where_sampled() {
        let color = rgb(200, 10, 10);
        let src = FrameBuffer::filled(260, 160, color).unwrap();
        let out = LensDistorter::new(260, 160, K).unwrap().distort(&src).unwrap();
        assert_eq!(out.get(130, 80), Some(color));
        for &px in out.pixels() {
            assert!(px == color || px == TRANSPARENT);
        }
        // corners sample past the edge
        assert_eq!(out.get(0, 0), Some(TRANSPARENT));
        assert_eq!(out.get(259, 159), Some(TRANSPARENT));
    }

    #[test]
    fn test_samples_pulled_outward() {
        let map = DistortionMap::new(260, 160, K).unwrap();
        // a point halfway to the right edge samples further right
        let i = map.lookup(195, 80).unwrap();
        assert_eq!(i / 260, 80);
        assert!(i % 260 > 195);
    }

    #[test]
    fn test_zero_k_is_identity() {
        let src = gradient(40, 30);
        let out = LensDistorter::new(40, 30, 0.0).unwrap().distort(&src).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn test_free_function_matches_map() {
        let src = gradient(64, 48);
        let cached = LensDistorter::new(64, 48, K).unwrap().distort(&src).unwrap();
        assert_eq!(distort(&src, K), cached);
    }

    #[test]
    fn test_size_mismatch_and_zero_area() {
        let d = LensDistorter::new(10, 10, K).unwrap();
        let src = FrameBuffer::new(11, 10).unwrap();
        assert!(matches!(d.distort(&src), Err(Error::SizeMismatch { .. })));
        assert!(matches!(LensDistorter::new(0, 10, K), Err(Error::InvalidGeometry { .. })));
    }
}
