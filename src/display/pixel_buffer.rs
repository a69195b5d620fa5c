use super::{pixel_count, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::blit::DrawRequest;
use crate::clip::{clip, Rect, SourceMap};
use crate::error::{Error, Result};
use crate::image_source::{ImageSource, ALPHA_MASK};

// ============================================================================
// Utility Functions
// ============================================================================

/// Alpha-key one pixel: `src` wins if its alpha byte is non-zero, otherwise
/// `dst` is kept. No blending.
#[inline]
pub fn alpha_key(dst: u32, src: u32) -> u32 {
    if src & ALPHA_MASK != 0 {
        src
    } else {
        dst
    }
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// ARGB8888 render target, one `u32` per pixel, row-major.
/// Dimensions are fixed at construction; every draw call clips against them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new pixel buffer with default resolution (320x240)
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a new, fully transparent pixel buffer with custom resolution
    pub fn with_size(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    /// Create a pixel buffer with every pixel set to `color`
    ///
    /// # Panics
    ///
    /// If `width * height` is not addressable; see `try_filled`.
    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        match Self::try_filled(width, height, color) {
            Ok(buf) => buf,
            Err(e) => panic!("{}", e),
        }
    }

    /// Like `filled`, but reports oversized dimensions instead of panicking
    pub fn try_filled(width: u32, height: u32, color: u32) -> Result<Self> {
        let len = pixel_count(width, height).ok_or(Error::TooLarge { width, height })?;
        Ok(Self {
            pixels: vec![color; len],
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Word offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Overwrite every pixel
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Read a pixel from the buffer (bounds checked)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if self.in_bounds(x, y) {
            Some(self.pixels[self.pixel_index(x as u32, y as u32)])
        } else {
            None
        }
    }

    /// Alpha-keyed write: stores `color` only when its alpha byte is non-zero.
    /// Out-of-bounds coordinates are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx] = alpha_key(self.pixels[idx], color);
        }
    }

    /// The `len` pixels of row `y` starting at column `x`.
    /// Callers pass clipped coordinates.
    #[inline]
    pub(crate) fn span_mut(&mut self, x: i32, y: i32, len: i32) -> &mut [u32] {
        let start = self.pixel_index(x as u32, y as u32);
        &mut self.pixels[start..start + len as usize]
    }

    /// Fill a rectangle with an alpha-keyed solid color.
    /// A color whose alpha byte is zero leaves the buffer untouched.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        let Some(c) = clip(Rect::new(x, y, width, height), self.width, self.height) else {
            return;
        };
        if color & ALPHA_MASK == 0 {
            return;
        }
        for iy in 0..c.span_y {
            self.span_mut(c.start_x, c.start_y + iy, c.span_x).fill(color);
        }
    }

    /// Copy a sprite verbatim, transparent texels included.
    ///
    /// Clipping and mirroring follow the same rules as `Blitter::draw_sprite`;
    /// only the alpha key is skipped. Fails without touching the buffer if the
    /// source rectangle leaves the image.
    pub fn copy_sprite(&mut self, image: &ImageSource, req: &DrawRequest) -> Result<()> {
        if req.dest_rect().is_empty() {
            return Ok(());
        }
        image.check_rect(&req.source_rect())?;
        let Some(c) = clip(req.dest_rect(), self.width, self.height) else {
            return Ok(());
        };
        let map = SourceMap::new(req, &c);

        for iy in 0..c.span_y {
            let src_row = image.row(map.src_y(iy));
            let dst = self.span_mut(c.start_x, c.start_y + iy, c.span_x);
            if map.flipped_x() {
                for (ix, d) in dst.iter_mut().enumerate() {
                    *d = src_row[map.src_x(ix as i32) as usize];
                }
            } else {
                let sx = map.origin_x as usize;
                dst.copy_from_slice(&src_row[sx..sx + c.span_x as usize]);
            }
        }
        Ok(())
    }

    /// Raw words, row-major
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw bytes for texture upload: `width * height * 4` bytes, row pitch
    /// `width * 4`, native-endian ARGB8888 words
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Row pitch of `as_bytes()` in bytes
    #[inline]
    pub fn pitch(&self) -> usize {
        self.width as usize * 4
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}
