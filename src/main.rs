// What you SEE:
// • The inside of a car from behind the driver, who is wearing sunglasses.
// • Each lens shows the road ahead, mirrored, warped like a convex lens, tinted and vignetted.
// • Left/Right arrows steer; the road also pulls you sideways. Drift too far and you crash.
// • R restarts after a crash. P saves a PNG screenshot. ESC quits.
//
// Usage: hindsight [config.ron]

use hindsight::config::Config;
use hindsight::draw::{Drawer, blit, draw_text_5x7, text_width};
use hindsight::error::Error;
use hindsight::game::GameState;
use hindsight::interior::{draw_cabin, draw_lens_frames};
use hindsight::pipeline::LensPipeline;
use hindsight::types::{FrameBuffer, rgb};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TARGET_FPS: usize = 60;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hindsight=info")))
        .init();

    /* --- Config ---
       Built-in defaults unless a RON file is passed as the first argument. */
    let config_path = std::env::args().nth(1);
    let config = Config::load(config_path.as_deref())?;
    info!(path = config_path.as_deref().unwrap_or("<defaults>"), "config loaded");
    let game_cfg = &config.game;

    /* --- Window + reusable screen buffer ---
       Visual: a window the size of the cabin view, refreshed at most 60 times a second. */
    let mut drawer = Drawer::new("HINDSIGHT", game_cfg.window_width, game_cfg.window_height, TARGET_FPS)?;
    let mut screen = FrameBuffer::new(game_cfg.window_width, game_cfg.window_height)?;

    /* --- Lens pipeline + game state --- */
    let mut pipeline = LensPipeline::new(&config.render)?;
    let mut game = GameState::new(game_cfg);

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");
    let mut last_frame_time = Instant::now();
    let mut screenshots: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32();
        last_frame_time = now;

        /* 1) Inputs → game state */
        if game.crashed && drawer.r_pressed_once() {
            game.restart();
        }
        game.update(dt, drawer.left_down(), drawer.right_down());

        /* 2) Cabin, then the empty sunglass rims */
        draw_cabin(&mut screen);
        draw_lens_frames(&mut screen, game_cfg, pipeline.lens_size());

        /* 3) Both lenses: road → mirror → lens warp → tint → vignette, then onto the screen */
        let [left, right] = pipeline.render(&game.frame_inputs())?;
        blit(&mut screen, &left, game_cfg.lens_left.0, game_cfg.lens_left.1);
        blit(&mut screen, &right, game_cfg.lens_right.0, game_cfg.lens_right.1);

        /* 4) HUD */
        draw_hud(&mut screen, &game, &hud_fps_text);

        /* 5) Present */
        drawer.present(&screen)?;

        if drawer.p_pressed_once() {
            screenshots += 1;
            let path = format!("hindsight-{screenshots:03}.png");
            match screen.to_rgb_image().save(&path) {
                Ok(()) => info!(%path, "screenshot saved"),
                Err(e) => warn!(%path, error = %Error::from(e), "screenshot failed"),
            }
        }

        /* 6) FPS counter (log + HUD once per second) */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            info!(fps = f64::from(fps), score = game.score, "frame rate");
            hud_fps_text = format!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}

/// Title, distance, FPS and the crash banner.
fn draw_hud(screen: &mut FrameBuffer, game: &GameState, fps_text: &str) {
    let (w, h) = (screen.width() as i32, screen.height() as i32);
    draw_text_5x7(screen, 20, 20, "HINDSIGHT", 3, rgb(220, 220, 220));
    draw_text_5x7(screen, 20, 55, &format!("{} M", game.score), 5, rgb(200, 255, 200));
    draw_text_5x7(screen, 20, h - 20, fps_text, 1, rgb(255, 255, 255));

    if game.crashed {
        let (cx, cy) = (w / 2, h / 2);
        let over = "CRASHED";
        draw_text_5x7(screen, cx - text_width(over, 6) / 2, cy - 40, over, 6, rgb(255, 60, 60));
        let restart = "PRESS R TO RESTART";
        draw_text_5x7(screen, cx - text_width(restart, 3) / 2, cy + 10, restart, 3, rgb(220, 220, 220));
    }
}
