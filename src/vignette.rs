// Static edge mask laid over each lens after the tint.
// Visual: the centre of the lens is clear and the rim darkens, slowly at first
// and then faster toward the corners.

use crate::error::Error;
use crate::lens::lens_geometry;
use crate::types::AlphaMask;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Alpha at every pixel: round(max_alpha * r^exponent), r = distance from the
/// centre over the half-diagonal (0 at the centre, 1 at the corners).
pub fn build_mask(width: usize, height: usize, max_alpha: u8, exponent: f32) -> Result<AlphaMask, Error> {
    let mut mask = AlphaMask::new(width, height)?;
    let (cx, cy, max_r) = lens_geometry(width, height);
    let amax = max_alpha as f32;

    mask.alpha_mut().par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let dy = y as f32 - cy;
        for (x, a) in row.iter_mut().enumerate() {
            let dx = x as f32 - cx;
            let r = (dx * dx + dy * dy).sqrt() / max_r;
            *a = (amax * r.powf(exponent)).round().clamp(0.0, 255.0) as u8;
        }
    });
    Ok(mask)
}

/// Mask for the current lens size, rebuilt only when the size changes.
///
/// Callers get an `Arc`, so a resize swaps in a fresh mask while frames that
/// already hold the old one finish with it untouched.
pub struct VignetteCache {
    max_alpha: u8,
    exponent: f32,
    generation: u64,
    current: Option<Arc<AlphaMask>>,
}

impl VignetteCache {
    pub fn new(max_alpha: u8, exponent: f32) -> Self {
        Self { max_alpha, exponent, generation: 0, current: None }
    }

    /// Bumped every time a new mask is built.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&mut self, width: usize, height: usize) -> Result<Arc<AlphaMask>, Error> {
        if let Some(mask) = &self.current {
            if mask.dimensions() == (width, height) {
                return Ok(Arc::clone(mask));
            }
        }
        let mask = Arc::new(build_mask(width, height, self.max_alpha, self.exponent)?);
        self.generation += 1;
        debug!(width, height, generation = self.generation, "built vignette mask");
        self.current = Some(Arc::clone(&mask));
        Ok(mask)
    }

    /// Drop the cached mask; the next `get` rebuilds it.
    pub fn invalidate(&mut self) {
        self.current = None;
    }
}
