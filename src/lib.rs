//! Software sprite compositing
//!
//! Sprites are rectangles sampled from an [`ImageSource`] and drawn into a
//! fixed-size [`PixelBuffer`] with a binary alpha key, optional mirroring on
//! either axis, and clipping against the buffer edges. The blit itself comes
//! in scalar, 4-lane and 8-lane flavors that produce identical output.

pub mod blit;
pub mod clip;
pub mod config;
pub mod display;
pub mod error;
pub mod image_source;
pub mod tilemap;
pub mod util;

pub use blit::{Blitter, Capabilities, DrawRequest, Strategy, StrategyMode};
pub use clip::{clip, ClipRect, Rect};
pub use config::SessionConfig;
pub use display::PixelBuffer;
pub use error::{Error, Result};
pub use image_source::{argb, ImageSource};
pub use tilemap::{TileLayer, TileMap};
