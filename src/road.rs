// Pseudo-3D road: sky/ground split at the horizon, then a strip of quads from
// the horizon down to the bottom edge, one per scanline segment.
// Visual: a grey road bending left and right as you drive, banded so the
// motion reads, with a dashed white centre line that thickens up close.

use crate::config::RenderConfig;
use crate::draw::{fill_rect, fill_strip};
use crate::error::Error;
use crate::types::{FrameBuffer, FrameInputs};

/// Left edge, right edge and screen y of one scanline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub left: f32,
    pub right: f32,
    pub y: f32,
}

impl Edge {
    #[inline]
    pub fn mid(&self) -> f32 {
        (self.left + self.right) / 2.0
    }
}

/// One step of the projection. `far` is the previous scanline, `near` this one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub index: u32, // 1..=N, grows toward the viewer
    pub scale: f32,
    pub curve: f32,
    pub center: f32, // road centre relative to the buffer's middle column
    pub far: Edge,
    pub near: Edge,
}

pub struct RoadProjector {
    width: usize,
    height: usize,
    horizon: f32,
    backdrop: FrameBuffer, // sky above the horizon, ground below; copied every frame
    cfg: RenderConfig,
}

impl RoadProjector {
    pub fn new(cfg: &RenderConfig) -> Result<Self, Error> {
        cfg.validate()?;
        let (width, height) = (cfg.lens_width, cfg.lens_height);
        let horizon = (height as f32 * cfg.horizon_fraction).floor();

        let mut backdrop = FrameBuffer::filled(width, height, cfg.sky.packed())?;
        let top = horizon as i32;
        fill_rect(&mut backdrop, 0, top, width as i32, height as i32 - top, cfg.ground.packed());

        Ok(Self { width, height, horizon, backdrop, cfg: cfg.clone() })
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Screen y of the horizon line.
    #[inline]
    pub fn horizon(&self) -> f32 {
        self.horizon
    }

    /// Geometry of scanline `i` (1-based). Starting at 1 keeps `scale_k / i` finite.
    fn scanline(&self, i: u32, inputs: &FrameInputs) -> (f32, f32, f32, Edge) {
        let c = &self.cfg;
        let fi = i as f32;
        let n = c.segments as f32;
        let y = self.horizon + (self.height as f32 - self.horizon) * fi / n;
        let scale = c.scale_k / fi;
        let curve = (inputs.scroll_position * c.curve_freq + fi * c.curve_phase).sin() * c.curve_amp / fi;
        let x = inputs.lateral_offset / fi + curve;
        let half_width = c.width_k * scale / 2.0;
        let mid = self.width as f32 / 2.0;
        let edge = Edge { left: mid + x - half_width, right: mid + x + half_width, y };
        (scale, curve, x, edge)
    }

    /// All N segments, far to near. Each carries the previous scanline's edge
    /// forward; the first starts from the vanishing point at the horizon.
    pub fn segments<'a>(&'a self, inputs: &'a FrameInputs) -> impl Iterator<Item = Segment> + 'a {
        let mid = self.width as f32 / 2.0;
        let vanishing = Edge { left: mid, right: mid, y: self.horizon };
        (1..=self.cfg.segments).scan(vanishing, move |far, i| {
            let (scale, curve, center, near) = self.scanline(i, inputs);
            let seg = Segment { index: i, scale, curve, center, far: *far, near };
            *far = near;
            Some(seg)
        })
    }

    /// Paint a fresh, fully opaque road image for this frame.
    pub fn project(&self, inputs: &FrameInputs) -> FrameBuffer {
        let c = &self.cfg;
        let mut fb = self.backdrop.clone();

        let (road, alt_road, line) = (c.road.packed(), c.alt_road.packed(), c.line.packed());
        for seg in self.segments(inputs) {
            let color = if seg.index % 2 == 0 { road } else { alt_road };
            fill_strip(
                &mut fb,
                (seg.far.left, seg.far.right, seg.far.y),
                (seg.near.left, seg.near.right, seg.near.y),
                color,
            );

            // Dashed centre line, painted on the road surface between the two midpoints.
            if seg.index % c.dash_period < c.dash_on {
                let half = ((c.line_k * seg.scale) as i32).max(1) as f32 / 2.0;
                let (m0, m1) = (seg.far.mid(), seg.near.mid());
                fill_strip(&mut fb, (m0 - half, m0 + half, seg.far.y), (m1 - half, m1 + half, seg.near.y), line);
            }
        }
        fb
    }
}
