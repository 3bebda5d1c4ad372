// Finishing pass for one lens: distorted road over black, then the sunglass
// tint, then the vignette mask on top.
// Visual: a dark-blue tinted lens whose rim fades out, with solid black where
// the distortion found nothing to sample.

use crate::config::RenderConfig;
use crate::draw::blend_over;
use crate::error::Error;
use crate::types::{AlphaMask, BLACK, FrameBuffer};
use rayon::prelude::*;

pub struct LensCompositor {
    tint: u32,
    tint_alpha: u8,
    mask_color: u32,
}

impl LensCompositor {
    pub fn new(cfg: &RenderConfig) -> Self {
        Self {
            tint: cfg.tint.packed(),
            tint_alpha: cfg.tint_alpha,
            mask_color: cfg.vignette_color.packed(),
        }
    }

    /// Fully opaque lens image ready to blit onto the screen.
    pub fn compose(&self, lens: &FrameBuffer, mask: &AlphaMask) -> Result<FrameBuffer, Error> {
        if lens.dimensions() != mask.dimensions() {
            return Err(Error::SizeMismatch { expected: lens.dimensions(), actual: mask.dimensions() });
        }
        let w = lens.width();
        let mut out = lens.clone();
        out.pixels_mut()
            .par_chunks_mut(w)
            .zip(mask.alpha().par_chunks(w))
            .for_each(|(row, alphas)| {
                for (px, &a) in row.iter_mut().zip(alphas) {
                    let base = blend_over(BLACK, *px, (*px >> 24) as u8);
                    let tinted = blend_over(base, self.tint, self.tint_alpha);
                    *px = blend_over(tinted, self.mask_color, a);
                }
            });
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TRANSPARENT, channels, rgb};
    use crate::vignette::build_mask;

    fn compositor() -> LensCompositor {
        LensCompositor::new(&RenderConfig::default())
    }

    #[test]
    fn test_output_is_opaque() {
        let mut lens = FrameBuffer::filled(40, 30, rgb(200, 200, 200)).unwrap();
        lens.put(0, 0, TRANSPARENT);
        let mask = build_mask(40, 30, 140, 1.8).unwrap();
        let out = compositor().compose(&lens, &mask).unwrap();
        assert!(out.pixels().iter().all(|&px| px >> 24 == 0xFF));
    }

    #[test]
    fn test_tint_applied_where_mask_is_clear() {
        let lens = FrameBuffer::filled(4, 4, rgb(255, 255, 255)).unwrap();
        let mask = AlphaMask::new(4, 4).unwrap();
        let out = compositor().compose(&lens, &mask).unwrap();
        // 90/255 of (10, 10, 30) over white
        let (r, g, b, _) = channels(out.get(1, 1).unwrap());
        assert_eq!((r, g, b), (169, 169, 176));
    }

    #[test]
    fn test_empty_pixels_come_out_tinted_black() {
        let lens = FrameBuffer::new(4, 4).unwrap();
        let mask = AlphaMask::new(4, 4).unwrap();
        let out = compositor().compose(&lens, &mask).unwrap();
        let (r, g, b, _) = channels(out.get(2, 2).unwrap());
        assert_eq!((r, g, b), (4, 4, 11));
    }

    #[test]
    fn test_mask_darkens_rim() {
        let lens = FrameBuffer::filled(60, 40, rgb(200, 200, 200)).unwrap();
        let mask = build_mask(60, 40, 140, 1.8).unwrap();
        let out = compositor().compose(&lens, &mask).unwrap();
        let (centre, ..) = channels(out.get(30, 20).unwrap());
        let (rim, ..) = channels(out.get(1, 1).unwrap());
        assert!(rim < centre);
    }

    #[test]
    fn test_size_mismatch() {
        let lens = FrameBuffer::new(4, 4).unwrap();
        let mask = AlphaMask::new(5, 4).unwrap();
        assert!(matches!(compositor().compose(&lens, &mask), Err(Error::SizeMismatch { .. })));
    }
}
