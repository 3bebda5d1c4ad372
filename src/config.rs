//! Render and game constants.
//!
//! Everything is fixed for the lifetime of the process. Defaults reproduce the
//! look of the game; a RON file can override any field, e.g.
//!
//! ```ron
//! (
//!     render: (lens_width: 320, distortion_k: 0.5),
//!     game: (speed: 400.0),
//! )
//! ```

use crate::error::Error;
use crate::types::Rgb;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Constants for the three lens kernels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub lens_width: usize,
    pub lens_height: usize,

    // Road projector
    pub horizon_fraction: f32,
    pub segments: u32,
    pub scale_k: f32,     // scale = scale_k / i
    pub width_k: f32,     // road width = width_k * scale
    pub curve_freq: f32,  // sin(scroll * curve_freq + i * curve_phase)
    pub curve_phase: f32,
    pub curve_amp: f32,
    pub dash_period: u32, // centre line drawn while i % period < dash_on
    pub dash_on: u32,
    pub line_k: f32,      // centre line thickness = line_k * scale
    pub mirror: bool,     // flip the road left/right before the lens

    pub sky: Rgb,
    pub ground: Rgb,
    pub road: Rgb,
    pub alt_road: Rgb,
    pub line: Rgb,

    // Lens distorter
    pub distortion_k: f32,

    // Tint + vignette
    pub tint: Rgb,
    pub tint_alpha: u8,
    pub vignette_max_alpha: u8,
    pub vignette_exponent: f32,
    pub vignette_color: Rgb,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            lens_width: 260,
            lens_height: 160,
            horizon_fraction: 0.22,
            segments: 240,
            scale_k: 90.0,
            width_k: 1700.0,
            curve_freq: 0.0018,
            curve_phase: 0.03,
            curve_amp: 700.0,
            dash_period: 8,
            dash_on: 4,
            line_k: 4.0,
            mirror: true,
            sky: Rgb(135, 206, 235),
            ground: Rgb(34, 139, 34),
            road: Rgb(55, 55, 55),
            alt_road: Rgb(60, 60, 60),
            line: Rgb(255, 255, 255),
            distortion_k: 0.35,
            tint: Rgb(10, 10, 30),
            tint_alpha: 90,
            vignette_max_alpha: 140,
            vignette_exponent: 1.8,
            vignette_color: Rgb(0, 0, 0),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.lens_width == 0 || self.lens_height == 0 {
            return Err(Error::InvalidGeometry { width: self.lens_width, height: self.lens_height });
        }
        if self.segments == 0 {
            return Err(Error::InvalidConfig("segments must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&self.horizon_fraction) {
            return Err(Error::InvalidConfig(format!(
                "horizon_fraction {} outside [0, 1)",
                self.horizon_fraction
            )));
        }
        if !(self.scale_k > 0.0) {
            return Err(Error::InvalidConfig("scale_k must be positive".into()));
        }
        if self.dash_period == 0 || self.dash_on > self.dash_period {
            return Err(Error::InvalidConfig(format!(
                "dash_on {} / dash_period {} is not a valid cycle",
                self.dash_on, self.dash_period
            )));
        }
        if !(self.distortion_k >= 0.0) {
            return Err(Error::InvalidConfig("distortion_k must not be negative".into()));
        }
        Ok(())
    }
}

/// Constants for the game shell around the lenses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window_width: usize,
    pub window_height: usize,
    pub lens_left: (i32, i32),  // top-left corner of each lens on screen
    pub lens_right: (i32, i32),

    pub speed: f32,           // forward units per second
    pub steer_rate: f32,      // sideways units per second while an arrow is held
    pub drift_amp: f32,       // the road pulls the car sideways by drift_amp * sin(pos * drift_freq)
    pub drift_freq: f32,
    pub max_off_road: f32,    // |player_x| beyond this is a crash
    pub offset_divisor: f32,  // lateral offset fed to the projector = player_x / offset_divisor
    pub metres_per_point: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 900,
            window_height: 700,
            lens_left: (260, 280),
            lens_right: (500, 280),
            speed: 250.0,
            steer_rate: 3600.0,
            drift_amp: 1000.0,
            drift_freq: 0.002,
            max_off_road: 2400.0,
            offset_divisor: 12.0,
            metres_per_point: 8.0,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(Error::InvalidGeometry { width: self.window_width, height: self.window_height });
        }
        if self.offset_divisor == 0.0 || !(self.metres_per_point > 0.0) {
            return Err(Error::InvalidConfig("offset_divisor and metres_per_point must be non-zero".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub game: GameConfig,
}

impl Config {
    /// Parse and validate a RON config.
    pub fn from_ron_str(s: &str) -> Result<Self, Error> {
        let config: Config = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a RON config file; `None` means built-in defaults.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, Error> {
        match path {
            Some(p) => {
                let contents = fs::read_to_string(p)?;
                Self::from_ron_str(&contents)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.render.validate()?;
        self.game.validate()
    }
}
