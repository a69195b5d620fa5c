//! Read-only sprite sheets
//!
//! An `ImageSource` holds packed ARGB8888 words (alpha in the top byte),
//! row-major with a stride of `width` words.
//!
//! Every constructor normalizes pixels whose alpha byte is zero to the
//! all-zero word. The vector blit strategies depend on this: they treat a
//! source word of `0` as transparent and anything else as opaque.

use std::path::Path;

use crate::clip::Rect;
use crate::display::pixel_count;
use crate::error::{Error, Result};

/// Alpha byte of a packed ARGB word
pub const ALPHA_MASK: u32 = 0xFF00_0000;

/// Pack 8-bit channels into an ARGB8888 word
#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

#[inline]
fn normalize(pixel: u32) -> u32 {
    if pixel & ALPHA_MASK == 0 {
        0
    } else {
        pixel
    }
}

/// Sprite sheet pixels, exclusively owned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl ImageSource {
    /// A fully transparent image
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    /// Image filled with one color
    ///
    /// # Panics
    ///
    /// If `width * height` exceeds `display::MAX_PIXELS`.
    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        let Some(len) = pixel_count(width, height) else {
            panic!("{}", Error::TooLarge { width, height });
        };
        Self {
            width,
            height,
            pixels: vec![normalize(color); len],
        }
    }

    /// Take ownership of packed ARGB words
    pub fn from_argb(width: u32, height: u32, mut pixels: Vec<u32>) -> Result<Self> {
        let len = pixel_count(width, height).ok_or(Error::TooLarge { width, height })?;
        if pixels.len() != len {
            return Err(Error::InvalidDimensions {
                width,
                height,
                len: pixels.len(),
            });
        }
        for p in &mut pixels {
            *p = normalize(*p);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert byte-ordered RGBA (as decoders hand it out) into packed ARGB
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let len = pixel_count(width, height).ok_or(Error::TooLarge { width, height })?;
        if data.len() / 4 != len || data.len() % 4 != 0 {
            return Err(Error::InvalidDimensions {
                width,
                height,
                len: data.len() / 4,
            });
        }
        let pixels = data
            .chunks_exact(4)
            .map(|c| normalize(argb(c[3], c[0], c[1], c[2])))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode an image file. Any format the decoder accepts is converted to
    /// ARGB8888; no storage is held if decoding fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|e| Error::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let rgba = decoded.to_rgba8();
        let (w, h) = rgba.dimensions();
        log::debug!("decoded {} ({}x{})", path.display(), w, h);
        Self::from_rgba8(w, h, rgba.as_raw())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read one texel. Coordinates must be inside the image.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> u32 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// One full row of texels
    #[inline]
    pub fn row(&self, y: i32) -> &[u32] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// True when every texel of `rect` lies inside the image
    pub fn contains_rect(&self, rect: &Rect) -> bool {
        rect.x >= 0
            && rect.y >= 0
            && i64::from(rect.x) + i64::from(rect.width) <= i64::from(self.width)
            && i64::from(rect.y) + i64::from(rect.height) <= i64::from(self.height)
    }

    /// Fail with `SourceOutOfBounds` unless `rect` fits the image
    pub fn check_rect(&self, rect: &Rect) -> Result<()> {
        if self.contains_rect(rect) {
            Ok(())
        } else {
            Err(Error::SourceOutOfBounds {
                rect: *rect,
                image_width: self.width,
                image_height: self.height,
            })
        }
    }

    /// Write a texel (normalizing transparency). Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: u32) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = normalize(color);
        }
    }
}

// ============================================================================
// Procedural sheets
// ============================================================================

impl ImageSource {
    /// Checkerboard of `tile_size` squares alternating between two colors
    pub fn checkerboard(width: u32, height: u32, tile_size: u32, c1: u32, c2: u32) -> Self {
        let tile_size = tile_size.max(1);
        let mut img = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / tile_size) + (y / tile_size)) % 2 == 0;
                img.set_pixel(x, y, if checker { c1 } else { c2 });
            }
        }
        img
    }

    /// Stand-in tile sheet shaped like the demo's `tiles.png`: an opaque
    /// ground tile at (0, 0) and a partly transparent overlay tile at
    /// (0, 40), each `tile_size` square.
    pub fn placeholder_sheet(tile_size: u32) -> Self {
        let ts = tile_size.max(1);
        let height = (40 + ts).max(2 * ts);
        let mut img = Self::new(ts * 2, height);

        let ground = Self::checkerboard(
            ts,
            ts,
            (ts / 4).max(1),
            argb(255, 86, 148, 64),
            argb(255, 70, 122, 52),
        );
        for y in 0..ts {
            for x in 0..ts {
                img.set_pixel(x, y, ground.pixel(x as i32, y as i32));
            }
        }

        // Diamond with a transparent surround
        let half = ts as i32 / 2;
        for y in 0..ts as i32 {
            for x in 0..ts as i32 {
                let d = (x - half).abs() + (y - half).abs();
                if d < half {
                    let shade = (255 - d * 8).clamp(0, 255) as u8;
                    img.set_pixel(x as u32, 40 + y as u32, argb(255, shade, shade / 2, 32));
                }
            }
        }
        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_packing() {
        assert_eq!(argb(0xFF, 0x12, 0x34, 0x56), 0xFF12_3456);
        assert_eq!(argb(0, 0, 0, 0), 0);
    }

    #[test]
    fn test_from_argb_normalizes_transparent_pixels() {
        let img = ImageSource::from_argb(2, 1, vec![0x00FF_FFFF, 0x01FF_FFFF]).unwrap();
        assert_eq!(img.pixel(0, 0), 0);
        assert_eq!(img.pixel(1, 0), 0x01FF_FFFF);
    }

    #[test]
    fn test_from_argb_rejects_wrong_length() {
        let err = ImageSource::from_argb(4, 4, vec![0; 15]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { len: 15, .. }));
    }

    #[test]
    fn test_from_argb_rejects_unaddressable_size() {
        let err = ImageSource::from_argb(70_000, 70_000, Vec::new()).unwrap_err();
        assert!(matches!(err, Error::TooLarge { .. }));
    }

    #[test]
    fn test_from_rgba8_byte_order() {
        let img = ImageSource::from_rgba8(2, 1, &[0x11, 0x22, 0x33, 0xFF, 9, 9, 9, 0]).unwrap();
        assert_eq!(img.pixel(0, 0), 0xFF11_2233);
        assert_eq!(img.pixel(1, 0), 0);
    }

    #[test]
    fn test_load_missing_file_is_load_error() {
        let err = ImageSource::load("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
    }

    #[test]
    fn test_check_rect() {
        let img = ImageSource::new(32, 64);
        assert!(img.check_rect(&Rect::new(0, 0, 32, 64)).is_ok());
        assert!(img.check_rect(&Rect::new(16, 48, 16, 16)).is_ok());
        assert!(img.check_rect(&Rect::new(17, 0, 16, 16)).is_err());
        assert!(img.check_rect(&Rect::new(0, 49, 16, 16)).is_err());
        assert!(img.check_rect(&Rect::new(-1, 0, 16, 16)).is_err());
        assert!(img.check_rect(&Rect::new(i32::MAX, 0, 16, 16)).is_err());
    }

    #[test]
    fn test_row_matches_pixels() {
        let img = ImageSource::checkerboard(8, 4, 2, 0xFF00_0000, 0xFFFF_FFFF);
        let row = img.row(3);
        assert_eq!(row.len(), 8);
        for (x, &p) in row.iter().enumerate() {
            assert_eq!(p, img.pixel(x as i32, 3));
        }
    }

    #[test]
    fn test_placeholder_sheet_layout() {
        let img = ImageSource::placeholder_sheet(16);
        assert!(img.contains_rect(&Rect::new(0, 0, 16, 16)));
        assert!(img.contains_rect(&Rect::new(0, 40, 16, 16)));
        // Ground tile is fully opaque
        assert!(img.row(0)[..16].iter().all(|p| p & ALPHA_MASK != 0));
        // Overlay corner is transparent, centre is not
        assert_eq!(img.pixel(0, 40), 0);
        assert_ne!(img.pixel(8, 48), 0);
    }
}
