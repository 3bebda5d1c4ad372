// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the composed cabin + lens frame, capped at 60 fps.
// 2) Raster primitives: rects, polygons, road strips, thick lines, circles, alpha blits.
// 3) A tiny 5x7 bitmap font (integer-scaled) for the HUD.

use crate::error::Error;
use crate::types::{FrameBuffer, channels, rgb};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window of the requested size, limited to `fps` presents per second.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize, fps: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(fps);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(framebuffer.pixels(), framebuffer.width(), framebuffer.height())
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Held, not edge-triggered: steering is continuous.
    pub fn left_down(&self) -> bool {
        self.window.is_key_down(Key::Left)
    }

    pub fn right_down(&self) -> bool {
        self.window.is_key_down(Key::Right)
    }

    pub fn r_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::R, KeyRepeat::No)
    }

    // screenshot key
    pub fn p_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::P, KeyRepeat::No)
    }
}

/* ---------- Software drawing ---------- */

/// Source-over blend of `color` onto one pixel with coverage `alpha`.
#[inline]
pub fn blend_over(dst: u32, color: u32, alpha: u8) -> u32 {
    let a = alpha as u32;
    let (sr, sg, sb, _) = channels(color);
    let (dr, dg, db, da) = channels(dst);
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
    let out_a = (a + da as u32 * (255 - a) / 255).min(255) as u8;
    crate::types::rgba(mix(sr, dr), mix(sg, dg), mix(sb, db), out_a)
}

/// Blend one pixel if (x,y) is inside bounds.
#[inline]
fn blend_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32, alpha: u8) {
    if x < 0 || y < 0 {
        return;
    }
    if let Some(old) = fb.get(x as usize, y as usize) {
        fb.put(x, y, blend_over(old, color, alpha));
    }
}

/// Fill a horizontal run [x0, x1] on row y, clipped.
#[inline]
fn span(fb: &mut FrameBuffer, y: i32, x0: i32, x1: i32, color: u32) {
    if y < 0 || y as usize >= fb.height() {
        return;
    }
    let x0 = x0.max(0);
    let x1 = x1.min(fb.width() as i32 - 1);
    if x0 > x1 {
        return;
    }
    let w = fb.width();
    let row = &mut fb.pixels_mut()[y as usize * w..(y as usize + 1) * w];
    row[x0 as usize..=x1 as usize].fill(color);
}

pub fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    for yy in y..y + h {
        span(fb, yy, x, x + w - 1, color);
    }
}

/// Fill the strip between two horizontal edges: (l0..r0 at y0) and (l1..r1 at y1), y0 <= y1.
/// Every row the strip touches gets at least one span, so strips thinner than a
/// pixel still leave no gaps between neighbours.
pub fn fill_strip(fb: &mut FrameBuffer, (l0, r0, y0): (f32, f32, f32), (l1, r1, y1): (f32, f32, f32), color: u32) {
    let h = fb.height() as i32;
    let top = (y0.floor() as i32).max(0);
    let bottom = (y1.floor() as i32).min(h - 1);
    let dy = y1 - y0;
    for y in top..=bottom {
        let t = if dy > 0.0 { ((y as f32 + 0.5 - y0) / dy).clamp(0.0, 1.0) } else { 1.0 };
        let l = l0 + (l1 - l0) * t;
        let r = r0 + (r1 - r0) * t;
        span(fb, y, l.min(r).round() as i32, l.max(r).round() as i32, color);
    }
}

/// Scanline fill of a simple polygon, sampling pixel centres (even-odd rule).
pub fn fill_polygon(fb: &mut FrameBuffer, pts: &[(f32, f32)], color: u32) {
    fill_polygon_with(fb, pts, |fb, y, x0, x1| span(fb, y, x0, x1, color));
}

/// Same as `fill_polygon` but blended with constant `alpha`.
pub fn blend_polygon(fb: &mut FrameBuffer, pts: &[(f32, f32)], color: u32, alpha: u8) {
    fill_polygon_with(fb, pts, |fb, y, x0, x1| {
        for x in x0..=x1 {
            blend_pixel(fb, x, y, color, alpha);
        }
    });
}

fn fill_polygon_with(
    fb: &mut FrameBuffer,
    pts: &[(f32, f32)],
    mut run: impl FnMut(&mut FrameBuffer, i32, i32, i32),
) {
    if pts.len() < 3 {
        return;
    }
    let min_y = pts.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
    let max_y = pts.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
    let top = (min_y.floor() as i32).max(0);
    let bottom = (max_y.ceil() as i32).min(fb.height() as i32 - 1);

    let mut xs: Vec<f32> = Vec::with_capacity(pts.len());
    for y in top..=bottom {
        let sy = y as f32 + 0.5;
        xs.clear();
        for i in 0..pts.len() {
            let (ax, ay) = pts[i];
            let (bx, by) = pts[(i + 1) % pts.len()];
            if (ay <= sy && by > sy) || (by <= sy && ay > sy) {
                xs.push(ax + (sy - ay) / (by - ay) * (bx - ax));
            }
        }
        xs.sort_by(f32::total_cmp);
        for pair in xs.chunks_exact(2) {
            let x0 = (pair[0] - 0.5).ceil() as i32;
            let x1 = (pair[1] - 0.5).floor() as i32;
            if x0 <= x1 {
                run(fb, y, x0, x1);
            }
        }
    }
}

/// Line of the given thickness: square brush stamped along a Bresenham walk.
pub fn draw_thick_line(fb: &mut FrameBuffer, (x0, y0): (f32, f32), (x1, y1): (f32, f32), thickness: i32, color: u32) {
    let t = thickness.max(1);
    let lo = -(t - 1) / 2;
    let hi = t / 2;
    let (mut x0, mut y0) = (x0.round() as i32, y0.round() as i32);
    let (x1, y1) = (x1.round() as i32, y1.round() as i32);

    // Skip walks that can't reach the buffer.
    let (w, h) = (fb.width() as i32, fb.height() as i32);
    if (x0.max(x1) + hi < 0) || (x0.min(x1) + lo >= w) || (y0.max(y1) + hi < 0) || (y0.min(y1) + lo >= h) {
        return;
    }

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        fill_rect(fb, x0 + lo, y0 + lo, hi - lo + 1, hi - lo + 1, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

pub fn fill_circle(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, color: u32) {
    fill_ellipse(fb, cx, cy, radius, radius, color);
}

/// Axis-aligned filled ellipse with half-axes (rx, ry).
pub fn fill_ellipse(fb: &mut FrameBuffer, cx: i32, cy: i32, rx: i32, ry: i32, color: u32) {
    if rx <= 0 || ry <= 0 {
        return;
    }
    for dy in -ry..=ry {
        let t = dy as f32 / ry as f32;
        let half = (rx as f32 * (1.0 - t * t).max(0.0).sqrt()).round() as i32;
        span(fb, cy + dy, cx - half, cx + half, color);
    }
}

/// Circle outline `width` pixels thick, growing inward from `radius`.
pub fn draw_ring(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, width: i32, color: u32) {
    let outer = (radius * radius) as i64;
    let inner_r = (radius - width).max(0);
    let inner = (inner_r * inner_r) as i64;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d2 = (dx * dx + dy * dy) as i64;
            if d2 <= outer && d2 > inner {
                fb.put(cx + dx, cy + dy, color);
            }
        }
    }
}

/// Rectangle outline `border` pixels wide with rounded corners of radius `corner`.
pub fn draw_rounded_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, border: i32, corner: i32, color: u32) {
    let c = corner.min(w / 2).min(h / 2).max(0);
    let inside = |px: i32, py: i32, inset: i32| -> bool {
        let (l, t, r, b) = (x + inset, y + inset, x + w - 1 - inset, y + h - 1 - inset);
        if px < l || px > r || py < t || py > b {
            return false;
        }
        let rad = (c - inset).max(0);
        // Distance check only in the corner squares.
        let cx = if px < l + rad { l + rad } else if px > r - rad { r - rad } else { return true };
        let cy = if py < t + rad { t + rad } else if py > b - rad { b - rad } else { return true };
        let (dx, dy) = (px - cx, py - cy);
        dx * dx + dy * dy <= rad * rad
    };
    for py in y..y + h {
        for px in x..x + w {
            if inside(px, py, 0) && !inside(px, py, border) {
                fb.put(px, py, color);
            }
        }
    }
}

/// Alpha-over `src` onto `dst` with its top-left at (x, y), clipped.
/// Source pixels carry their own alpha byte; fully transparent ones are skipped.
pub fn blit(dst: &mut FrameBuffer, src: &FrameBuffer, x: i32, y: i32) {
    for sy in 0..src.height() {
        let dy = y + sy as i32;
        if dy < 0 || dy as usize >= dst.height() {
            continue;
        }
        for (sx, &px) in src.row(sy).iter().enumerate() {
            let dx = x + sx as i32;
            let a = (px >> 24) as u8;
            match a {
                0 => {}
                255 => dst.put(dx, dy, px),
                _ => blend_pixel(dst, dx, dy, px, a),
            }
        }
    }
}

/* ---------- 5x7 bitmap font ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y), each font pixel a `scale`x`scale` block.
/// Visual: a glyph with a 1-block black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, scale: i32, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (offset, c) in [(scale, rgb(0, 0, 0)), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        fill_rect(fb, x + rx * scale + offset, y + ry as i32 * scale + offset, scale, scale, c);
                    }
                }
            }
        }
    }
}

/// Width in pixels of `text` at `scale`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    (text.chars().count() as i32 * 6 - 1).max(0) * scale
}

/// Draw a text string using 5x7 glyphs; each glyph advances 6 font pixels.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, scale: i32, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, scale, color);
        x += 6 * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BLACK, TRANSPARENT, rgba};

    const RED: u32 = rgb(255, 0, 0);

    #[test]
    fn test_fill_rect_clips() {
        let mut fb = FrameBuffer::filled(4, 4, BLACK).unwrap();
        fill_rect(&mut fb, -2, -2, 4, 4, RED);
        assert_eq!(fb.get(0, 0), Some(RED));
        assert_eq!(fb.get(1, 1), Some(RED));
        assert_eq!(fb.get(2, 2), Some(BLACK));
    }

    #[test]
    fn test_fill_strip_thin_strip_still_covers_a_row() {
        let mut fb = FrameBuffer::filled(10, 10, BLACK).unwrap();
        fill_strip(&mut fb, (2.0, 6.0, 4.1), (2.0, 6.0, 4.4), RED);
        assert_eq!(fb.get(2, 4), Some(RED));
        assert_eq!(fb.get(6, 4), Some(RED));
        assert_eq!(fb.get(7, 4), Some(BLACK));
        assert_eq!(fb.get(4, 3), Some(BLACK));
        assert_eq!(fb.get(4, 5), Some(BLACK));
    }

    #[test]
    fn test_fill_polygon_square() {
        let mut fb = FrameBuffer::filled(8, 8, BLACK).unwrap();
        fill_polygon(&mut fb, &[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)], RED);
        let count = fb.pixels().iter().filter(|&&p| p == RED).count();
        assert_eq!(count, 16);
        assert_eq!(fb.get(2, 2), Some(RED));
        assert_eq!(fb.get(6, 6), Some(BLACK));
    }

    #[test]
    fn test_thick_line_width() {
        let mut fb = FrameBuffer::filled(10, 10, BLACK).unwrap();
        draw_thick_line(&mut fb, (5.0, 0.0), (5.0, 9.0), 3, RED);
        let row: Vec<u32> = fb.row(5).to_vec();
        assert_eq!(row.iter().filter(|&&p| p == RED).count(), 3);
        assert_eq!(row[4], RED);
        assert_eq!(row[6], RED);
    }

    #[test]
    fn test_blend_over() {
        assert_eq!(blend_over(BLACK, RED, 255), RED);
        assert_eq!(blend_over(RED, BLACK, 0), RED);
        let (r, _, _, a) = channels(blend_over(BLACK, RED, 128));
        assert_eq!(r, 128);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_blit_skips_transparent() {
        let mut dst = FrameBuffer::filled(4, 4, BLACK).unwrap();
        let mut src = FrameBuffer::new(2, 2).unwrap();
        src.put(0, 0, RED);
        src.put(1, 1, rgba(0, 0, 255, 0));
        blit(&mut dst, &src, 1, 1);
        assert_eq!(dst.get(1, 1), Some(RED));
        assert_eq!(dst.get(2, 2), Some(BLACK));
        assert_eq!(dst.get(2, 1), Some(BLACK));
        assert_ne!(dst.get(1, 1), Some(TRANSPARENT));
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 1), 0);
        assert_eq!(text_width("AB", 2), 22);
    }
}
