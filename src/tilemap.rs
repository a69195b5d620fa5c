//! Tile map frame pass
//!
//! Covers the buffer with a grid of `tile_size` cells and, for each cell,
//! draws every layer's sprite in order. Later layers overwrite earlier ones
//! wherever their texels are opaque.

use serde::{Deserialize, Serialize};

use crate::blit::{Blitter, DrawRequest};
use crate::display::PixelBuffer;
use crate::error::Result;
use crate::image_source::ImageSource;

/// Source origin of one tile in the sheet, plus optional mirroring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    pub tex_x: i32,
    pub tex_y: i32,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
}

impl TileLayer {
    pub const fn new(tex_x: i32, tex_y: i32) -> Self {
        Self {
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
}

#[derive(Debug, Clone)]
pub struct TileMap {
    cols: i32,
    rows: i32,
    tile_size: i32,
    layers: Vec<TileLayer>,
}

impl TileMap {
    /// Grid of whole tiles fitting a `width` x `height` buffer
    pub fn covering(width: u32, height: u32, tile_size: u32, layers: Vec<TileLayer>) -> Self {
        let tile_size = tile_size.max(1);
        Self {
            cols: (width / tile_size) as i32,
            rows: (height / tile_size) as i32,
            tile_size: tile_size as i32,
            layers,
        }
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Draw requests for one frame, in issue order
    pub fn requests(&self) -> impl Iterator<Item = DrawRequest> + '_ {
        let ts = self.tile_size;
        (0..self.rows).flat_map(move |y| {
            (0..self.cols).flat_map(move |x| {
                self.layers.iter().map(move |l| {
                    DrawRequest::new(x * ts, y * ts, ts, ts, l.tex_x, l.tex_y)
                        .flipped(l.flip_x, l.flip_y)
                })
            })
        })
    }

    /// Issue every request against `buffer`. Stops at the first layer whose
    /// tile does not fit in `sheet`.
    pub fn draw(
        &self,
        blitter: &Blitter,
        buffer: &mut PixelBuffer,
        sheet: &ImageSource,
    ) -> Result<()> {
        for req in self.requests() {
            blitter.draw_sprite(buffer, sheet, &req)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covering_counts_whole_tiles() {
        let map = TileMap::covering(320, 240, 16, vec![TileLayer::new(0, 0)]);
        assert_eq!((map.cols(), map.rows()), (20, 15));
        assert_eq!(map.requests().count(), 300);
    }

    #[test]
    fn test_requests_interleave_layers_per_cell() {
        let layers = vec![TileLayer::new(0, 0), TileLayer::new(0, 40)];
        let map = TileMap::covering(32, 16, 16, layers);
        let reqs: Vec<DrawRequest> = map.requests().collect();
        assert_eq!(reqs.len(), 4);
        assert_eq!((reqs[0].x, reqs[0].tex_y), (0, 0));
        assert_eq!((reqs[1].x, reqs[1].tex_y), (0, 40));
        assert_eq!((reqs[2].x, reqs[2].tex_y), (16, 0));
    }

    #[test]
    fn test_overlay_layer_keeps_ground_under_transparency() {
        let sheet = ImageSource::placeholder_sheet(16);
        let layers = vec![TileLayer::new(0, 0), TileLayer::new(0, 40)];
        let map = TileMap::covering(32, 32, 16, layers);
        let mut buf = PixelBuffer::filled(32, 32, 0xFFFF_FFFF);
        map.draw(&Blitter::new(), &mut buf, &sheet).unwrap();

        // Corner of each cell shows the ground tile, centre shows the overlay
        assert_eq!(buf.get_pixel(16, 16), Some(sheet.pixel(0, 0)));
        assert_eq!(buf.get_pixel(24, 24), Some(sheet.pixel(8, 48)));
        assert!(buf.pixels().iter().all(|&p| p != 0xFFFF_FFFF));
    }

    #[test]
    fn test_layer_outside_sheet_fails() {
        let sheet = ImageSource::new(16, 16);
        let map = TileMap::covering(32, 32, 16, vec![TileLayer::new(0, 40)]);
        let mut buf = PixelBuffer::with_size(32, 32);
        assert!(map.draw(&Blitter::new(), &mut buf, &sheet).is_err());
    }
}
