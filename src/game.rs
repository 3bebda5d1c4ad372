// Driving state behind the lenses: where the car is, how far it has gone, and
// whether it has left the road.
// Visual: holding an arrow slides the road sideways in the lenses, the road
// itself keeps tugging the car, and drifting too far shows "CRASHED".

use crate::config::GameConfig;
use crate::types::FrameInputs;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub player_x: f32, // sideways position; 0 = centre of the road
    pub position: f32, // distance travelled
    pub score: u32,    // metres shown on the HUD
    pub crashed: bool,
    cfg: GameConfig,
}

impl GameState {
    pub fn new(cfg: &GameConfig) -> Self {
        Self { player_x: 0.0, position: 0.0, score: 0, crashed: false, cfg: cfg.clone() }
    }

    /// Advance by `dt` seconds. Nothing moves once crashed.
    pub fn update(&mut self, dt: f32, steer_left: bool, steer_right: bool) {
        if self.crashed {
            return;
        }
        let c = &self.cfg;
        if steer_left {
            self.player_x -= c.steer_rate * dt;
        }
        if steer_right {
            self.player_x += c.steer_rate * dt;
        }

        self.player_x += c.drift_amp * (self.position * c.drift_freq).sin() * dt;
        self.position += c.speed * dt;
        self.score = (self.position / c.metres_per_point).floor() as u32;

        if self.player_x.abs() > c.max_off_road {
            self.crashed = true;
            info!(score = self.score, player_x = self.player_x, "crashed");
        }
    }

    pub fn restart(&mut self) {
        *self = Self::new(&self.cfg);
        info!("restarted");
    }

    /// What the lens pipeline needs this frame.
    pub fn frame_inputs(&self) -> FrameInputs {
        FrameInputs {
            lateral_offset: self.player_x / self.cfg.offset_divisor,
            scroll_position: self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> GameState {
        GameState::new(&GameConfig::default())
    }

    #[test]
    fn test_scrolls_and_scores() {
        let mut g = game();
        g.update(1.0, false, false);
        assert_eq!(g.position, 250.0);
        assert_eq!(g.score, 31);
        // sin(0) drift on the first step
        assert_eq!(g.player_x, 0.0);
    }

    #[test]
    fn test_steering() {
        let mut g = game();
        g.update(0.1, true, false);
        assert!((g.player_x + 360.0).abs() < 1e-3);
        let mut g = game();
        g.update(0.1, false, true);
        assert!((g.player_x - 360.0).abs() < 1e-3);
        let mut g = game();
        g.update(0.1, true, true);
        assert!(g.player_x.abs() < 1e-3);
    }

    #[test]
    fn test_crash_freezes_until_restart() {
        let mut g = game();
        for _ in 0..10 {
            g.update(0.1, false, true);
        }
        assert!(g.crashed);
        let frozen = g.clone();
        g.update(0.1, false, true);
        assert_eq!(g, frozen);

        g.restart();
        assert_eq!(g, game());
    }

    #[test]
    fn test_frame_inputs() {
        let mut g = game();
        g.player_x = 120.0;
        g.position = 42.0;
        let inputs = g.frame_inputs();
        assert_eq!(inputs.lateral_offset, 10.0);
        assert_eq!(inputs.scroll_position, 42.0);
    }
}
