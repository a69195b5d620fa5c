//! Sprite blitting
//!
//! A `DrawRequest` names a destination rectangle, a source origin in an
//! `ImageSource`, and two mirror flags. `Blitter::draw_sprite` validates the
//! source rectangle, clips the destination against the buffer and hands the
//! visible span to one of three interchangeable strategies:
//!
//! - `Strategy::Scalar`: per-pixel alpha key, the reference behavior
//! - `Strategy::Vector4` / `Strategy::Vector8`: bit-blit masking over
//!   4 or 8 lanes at a time, `(dst & (src == 0)) | src`
//!
//! All three produce identical buffers for identical inputs. Which one runs
//! depends only on the clipped span width and what the CPU supports.

mod scalar;
mod vector;

pub use scalar::Scalar;
pub use vector::{Vector4, Vector8};

use serde::{Deserialize, Serialize};

use crate::clip::{clip, ClipRect, Rect, SourceMap};
use crate::display::PixelBuffer;
use crate::error::Result;
use crate::image_source::ImageSource;

/// One sprite draw: where it goes, where it samples from, how it is mirrored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRequest {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub tex_x: i32,
    pub tex_y: i32,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl DrawRequest {
    pub const fn new(x: i32, y: i32, width: i32, height: i32, tex_x: i32, tex_y: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            tex_x,
            tex_y,
            flip_x: false,
            flip_y: false,
        }
    }

    #[must_use]
    pub const fn flipped(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        self
    }

    /// Requested rectangle in buffer space, before clipping
    pub const fn dest_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Texels the sprite samples from
    pub const fn source_rect(&self) -> Rect {
        Rect::new(self.tex_x, self.tex_y, self.width, self.height)
    }
}

/// Composites a clipped span of `src` into `dst`.
///
/// `map` must only produce coordinates inside `src`; `Blitter` checks the
/// whole source rectangle before calling in.
pub trait Compositor {
    fn composite(
        &self,
        dst: &mut PixelBuffer,
        src: &ImageSource,
        clip: &ClipRect,
        map: &SourceMap,
    );
}

/// Which compositing implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Scalar,
    Vector4,
    Vector8,
}

impl Strategy {
    pub const ALL: [Self; 3] = [Self::Scalar, Self::Vector4, Self::Vector8];

    pub fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Vector4 => "vector4",
            Self::Vector8 => "vector8",
        }
    }

    /// Pixels processed per step
    pub fn lanes(self) -> i32 {
        match self {
            Self::Scalar => 1,
            Self::Vector4 => 4,
            Self::Vector8 => 8,
        }
    }
}

impl Compositor for Strategy {
    #[inline]
    fn composite(
        &self,
        dst: &mut PixelBuffer,
        src: &ImageSource,
        clip: &ClipRect,
        map: &SourceMap,
    ) {
        match self {
            Self::Scalar => Scalar.composite(dst, src, clip, map),
            Self::Vector4 => Vector4.composite(dst, src, clip, map),
            Self::Vector8 => Vector8.composite(dst, src, clip, map),
        }
    }
}

/// Vector widths the running CPU handles natively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub vector4: bool,
    pub vector8: bool,
}

impl Capabilities {
    /// Probe the CPU at runtime
    pub fn detect() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            Self {
                vector4: is_x86_feature_detected!("sse2"),
                vector8: is_x86_feature_detected!("avx2"),
            }
        }
        #[cfg(target_arch = "aarch64")]
        {
            Self {
                vector4: std::arch::is_aarch64_feature_detected!("neon"),
                vector8: false,
            }
        }
        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Self::none()
        }
    }

    pub const fn all() -> Self {
        Self {
            vector4: true,
            vector8: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            vector4: false,
            vector8: false,
        }
    }
}

/// Pick the widest strategy whose lane count divides `span_x` evenly
pub fn select_strategy(span_x: i32, caps: Capabilities) -> Strategy {
    if span_x <= 0 {
        return Strategy::Scalar;
    }
    if caps.vector8 && span_x % 8 == 0 {
        Strategy::Vector8
    } else if caps.vector4 && span_x % 4 == 0 {
        Strategy::Vector4
    } else {
        Strategy::Scalar
    }
}

/// Strategy policy for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyMode {
    /// Choose per draw call from span width and CPU support
    #[default]
    Auto,
    Scalar,
    Vector4,
    Vector8,
}

/// Draws sprites into a `PixelBuffer`, choosing a strategy per call
#[derive(Debug, Clone, Copy)]
pub struct Blitter {
    caps: Capabilities,
    mode: StrategyMode,
}

impl Blitter {
    /// Auto strategy selection with detected CPU capabilities
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::detect())
    }

    pub fn with_capabilities(caps: Capabilities) -> Self {
        Self {
            caps,
            mode: StrategyMode::Auto,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: StrategyMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    pub fn mode(&self) -> StrategyMode {
        self.mode
    }

    /// Strategy used for a clipped span of `span_x` pixels.
    /// A forced mode wins even without hardware support; `wide` then runs
    /// its portable fallback and the output is unchanged.
    pub fn strategy_for(&self, span_x: i32) -> Strategy {
        match self.mode {
            StrategyMode::Auto => select_strategy(span_x, self.caps),
            StrategyMode::Scalar => Strategy::Scalar,
            StrategyMode::Vector4 => Strategy::Vector4,
            StrategyMode::Vector8 => Strategy::Vector8,
        }
    }

    /// Alpha-keyed sprite draw.
    ///
    /// Off-canvas or zero-sized requests are no-ops. A source rectangle that
    /// leaves `image` is an error and nothing is written.
    pub fn draw_sprite(
        &self,
        dst: &mut PixelBuffer,
        image: &ImageSource,
        req: &DrawRequest,
    ) -> Result<()> {
        let Some((clip, map)) = prepare(dst, image, req)? else {
            return Ok(());
        };
        self.strategy_for(clip.span_x).composite(dst, image, &clip, &map);
        Ok(())
    }

    /// Like `draw_sprite` but with an explicit strategy
    pub fn draw_sprite_with(
        strategy: Strategy,
        dst: &mut PixelBuffer,
        image: &ImageSource,
        req: &DrawRequest,
    ) -> Result<()> {
        let Some((clip, map)) = prepare(dst, image, req)? else {
            return Ok(());
        };
        strategy.composite(dst, image, &clip, &map);
        Ok(())
    }
}

impl Default for Blitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate the source rectangle, then clip. `Ok(None)` means nothing to draw.
fn prepare(
    dst: &PixelBuffer,
    image: &ImageSource,
    req: &DrawRequest,
) -> Result<Option<(ClipRect, SourceMap)>> {
    if req.dest_rect().is_empty() {
        return Ok(None);
    }
    image.check_rect(&req.source_rect())?;
    Ok(clip(req.dest_rect(), dst.width(), dst.height()).map(|c| (c, SourceMap::new(req, &c))))
}
