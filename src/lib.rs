//! Driving seen through a pair of sunglasses: a scanline pseudo-3D road,
//! warped by a convex-lens remap and darkened by a vignette, once per lens.

pub mod composite;
pub mod config;
pub mod draw;
pub mod error;
pub mod game;
pub mod interior;
pub mod lens;
pub mod pipeline;
pub mod road;
pub mod types;
pub mod vignette;

pub use config::{Config, GameConfig, RenderConfig};
pub use error::Error;
pub use pipeline::LensPipeline;
pub use types::{AlphaMask, FrameBuffer, FrameInputs};
