//! Per-frame lens pipeline: project -> mirror -> distort -> tint + vignette.
//!
//! Both lenses run the same stages on their own buffers, so they are rendered
//! side by side with `rayon::join`.

use crate::composite::LensCompositor;
use crate::config::RenderConfig;
use crate::error::Error;
use crate::lens::LensDistorter;
use crate::road::RoadProjector;
use crate::types::{AlphaMask, FrameBuffer, FrameInputs};
use crate::vignette::VignetteCache;
use tracing::info;

pub struct LensPipeline {
    cfg: RenderConfig,
    projector: RoadProjector,
    distorter: LensDistorter,
    compositor: LensCompositor,
    vignette: VignetteCache,
}

impl LensPipeline {
    pub fn new(cfg: &RenderConfig) -> Result<Self, Error> {
        let projector = RoadProjector::new(cfg)?;
        let distorter = LensDistorter::new(cfg.lens_width, cfg.lens_height, cfg.distortion_k)?;
        info!(width = cfg.lens_width, height = cfg.lens_height, k = cfg.distortion_k, "lens pipeline ready");
        Ok(Self {
            cfg: cfg.clone(),
            projector,
            distorter,
            compositor: LensCompositor::new(cfg),
            vignette: VignetteCache::new(cfg.vignette_max_alpha, cfg.vignette_exponent),
        })
    }

    #[inline]
    pub fn lens_size(&self) -> (usize, usize) {
        self.projector.dimensions()
    }

    pub fn vignette_generation(&self) -> u64 {
        self.vignette.generation()
    }

    /// Road image before the lens, mirrored if configured.
    pub fn road(&self, inputs: &FrameInputs) -> FrameBuffer {
        let mut road = self.projector.project(inputs);
        if self.cfg.mirror {
            road.flip_horizontal();
        }
        road
    }

    fn render_lens(&self, inputs: &FrameInputs, mask: &AlphaMask) -> Result<FrameBuffer, Error> {
        let road = self.road(inputs);
        let distorted = self.distorter.distort(&road)?;
        self.compositor.compose(&distorted, mask)
    }

    /// Finished left and right lens images for this frame.
    pub fn render(&mut self, inputs: &FrameInputs) -> Result<[FrameBuffer; 2], Error> {
        let (w, h) = self.lens_size();
        let mask = self.vignette.get(w, h)?;
        let this = &*self;
        let (left, right) = rayon::join(|| this.render_lens(inputs, &mask), || this.render_lens(inputs, &mask));
        Ok([left?, right?])
    }

    /// Rebuild every size-dependent stage for a new lens size.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), Error> {
        let cfg = RenderConfig { lens_width: width, lens_height: height, ..self.cfg.clone() };
        self.projector = RoadProjector::new(&cfg)?;
        self.distorter = LensDistorter::new(width, height, cfg.distortion_k)?;
        self.vignette.invalidate();
        self.cfg = cfg;
        info!(width, height, "lens resized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_two_identical_lenses() {
        let mut p = LensPipeline::new(&RenderConfig::default()).unwrap();
        let inputs = FrameInputs { lateral_offset: 30.0, scroll_position: 900.0 };
        let [left, right] = p.render(&inputs).unwrap();
        assert_eq!(left.dimensions(), (260, 160));
        assert_eq!(left, right);
        assert!(left.pixels().iter().all(|&px| px >> 24 == 0xFF));
    }

    #[test]
    fn test_mask_built_once() {
        let mut p = LensPipeline::new(&RenderConfig::default()).unwrap();
        let inputs = FrameInputs::default();
        p.render(&inputs).unwrap();
        p.render(&inputs).unwrap();
        assert_eq!(p.vignette_generation(), 1);
    }

    #[test]
    fn test_resize_rebuilds_mask() {
        let mut p = LensPipeline::new(&RenderConfig::default()).unwrap();
        p.render(&FrameInputs::default()).unwrap();
        p.resize(120, 80).unwrap();
        let [left, _] = p.render(&FrameInputs::default()).unwrap();
        assert_eq!(left.dimensions(), (120, 80));
        assert_eq!(p.vignette_generation(), 2);
        assert!(matches!(p.resize(0, 80), Err(Error::InvalidGeometry { .. })));
    }

    #[test]
    fn test_mirror() {
        let cfg = RenderConfig { mirror: false, ..RenderConfig::default() };
        let plain = LensPipeline::new(&cfg).unwrap();
        let mirrored = LensPipeline::new(&RenderConfig::default()).unwrap();
        let inputs = FrameInputs { lateral_offset: 200.0, scroll_position: 10.0 };
        let mut a = plain.road(&inputs);
        a.flip_horizontal();
        assert_eq!(a, mirrored.road(&inputs));
    }
}
