// Cabin scenery drawn behind the lenses every frame.
// Visual: a dark car interior with a faint windshield, pillars, dashboard and
// wheel, the driver's hands, and the back of the driver's head wearing the
// sunglasses the road is seen through.

use crate::config::GameConfig;
use crate::draw::{blend_polygon, draw_ring, draw_rounded_rect, draw_thick_line, fill_circle, fill_ellipse, fill_polygon, fill_rect};
use crate::types::{FrameBuffer, rgb};

const INTERIOR_DARK: u32 = rgb(15, 15, 20);
const INTERIOR_MID: u32 = rgb(35, 35, 45);
const WINDSHIELD: u32 = rgb(180, 200, 220);
const WINDSHIELD_ALPHA: u8 = 30;
const DASH: u32 = rgb(22, 22, 28);
const DASH_HL: u32 = rgb(60, 60, 70);
const FRAME: u32 = rgb(0, 0, 0);
const SKIN: u32 = rgb(245, 205, 170);
const HAIR: u32 = rgb(40, 30, 20);

const HEAD_RADIUS: i32 = 220;
const WHEEL_RADIUS: i32 = 95;

/// Everything except the lens frames.
pub fn draw_cabin(screen: &mut FrameBuffer) {
    let w = screen.width() as f32;
    let h = screen.height() as f32;
    let (wi, hi) = (w as i32, h as i32);

    screen.fill(INTERIOR_DARK);

    // windshield
    blend_polygon(screen, &[(0.0, 0.0), (w, 0.0), (w - 120.0, h / 2.0), (120.0, h / 2.0)], WINDSHIELD, WINDSHIELD_ALPHA);

    // A-pillars
    fill_polygon(screen, &[(0.0, 0.0), (120.0, h / 2.0), (180.0, h / 2.0), (40.0, 0.0)], INTERIOR_MID);
    fill_polygon(screen, &[(w, 0.0), (w - 120.0, h / 2.0), (w - 180.0, h / 2.0), (w - 40.0, 0.0)], INTERIOR_MID);

    // dashboard
    fill_rect(screen, 0, hi - 150, wi, 150, DASH);
    fill_rect(screen, 0, hi - 170, wi, 20, DASH_HL);

    // steering wheel: rim + 8 spokes
    let (wx, wy) = (wi / 2, hi - 80);
    draw_ring(screen, wx, wy, WHEEL_RADIUS, 14, FRAME);
    for step in 0..8 {
        let a = (step as f32 * 45.0).to_radians();
        let end = (wx as f32 + 85.0 * a.cos(), wy as f32 + 85.0 * a.sin());
        draw_thick_line(screen, (wx as f32, wy as f32), end, 8, FRAME);
    }

    // hands
    fill_circle(screen, wx - 60, wy + 25, 34, SKIN);
    fill_circle(screen, wx + 60, wy + 25, 34, SKIN);

    // driver's head, hair on top
    let (hx, hy) = (wi / 2, hi / 2 + 40);
    fill_circle(screen, hx, hy, HEAD_RADIUS, SKIN);
    let (rx, ry) = ((HEAD_RADIUS as f32 * 0.9) as i32, (HEAD_RADIUS as f32 * 0.5) as i32);
    let top = hy - (HEAD_RADIUS as f32 * 1.1) as i32;
    fill_ellipse(screen, hx, top + ry, rx, ry, HAIR);
}

/// Sunglasses rims around both lens slots. Drawn before the lens images.
pub fn draw_lens_frames(screen: &mut FrameBuffer, game: &GameConfig, lens_size: (usize, usize)) {
    let (lw, lh) = (lens_size.0 as i32, lens_size.1 as i32);
    for (x, y) in [game.lens_left, game.lens_right] {
        draw_rounded_rect(screen, x, y, lw, lh, 10, 18, FRAME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cabin_landmarks() {
        let mut screen = FrameBuffer::new(900, 700).unwrap();
        draw_cabin(&mut screen);
        // dashboard corner, hands, head
        assert_eq!(screen.get(5, 695), Some(DASH));
        assert_eq!(screen.get(5, 535), Some(DASH_HL));
        assert_eq!(screen.get(390, 645), Some(SKIN));
        assert_eq!(screen.get(450, 390), Some(SKIN));
        assert_eq!(screen.get(450, 200), Some(HAIR));
        // wheel rim right of the hub; the top of the wheel is hidden by the head
        assert_eq!(screen.get(540, 620), Some(FRAME));
        assert_eq!(screen.get(450, 530), Some(SKIN));
    }

    #[test]
    fn test_lens_frames_leave_lens_interior_alone() {
        let mut screen = FrameBuffer::filled(900, 700, INTERIOR_DARK).unwrap();
        let game = GameConfig::default();
        draw_lens_frames(&mut screen, &game, (260, 160));
        let (x, y) = game.lens_left;
        assert_eq!(screen.get(x as usize + 2, y as usize + 80), Some(FRAME));
        assert_eq!(screen.get(x as usize + 130, y as usize + 80), Some(INTERIOR_DARK));
        // rounded corner leaves the very corner pixel untouched
        assert_eq!(screen.get(x as usize, y as usize), Some(INTERIOR_DARK));
    }
}
