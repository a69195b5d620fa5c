//! Clipping and source-coordinate mapping
//!
//! Every draw call goes through `clip()` first. The clip is a plain
//! destination-space intersection; mapping a clipped destination cell back
//! to its source texel is the job of `SourceMap`, which all blit strategies
//! share so they agree on which texel lands where.

use crate::blit::DrawRequest;

/// Axis-aligned rectangle in pixel space. Origin may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the rectangle covers no cells at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Visible part of a draw rectangle, in buffer coordinates.
/// Spans are always positive; an empty intersection is `None` from `clip()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub start_x: i32,
    pub start_y: i32,
    pub span_x: i32,
    pub span_y: i32,
}

impl ClipRect {
    /// Buffer x one past the last visible column
    #[inline]
    pub fn end_x(&self) -> i32 {
        self.start_x + self.span_x
    }

    /// Buffer y one past the last visible row
    #[inline]
    pub fn end_y(&self) -> i32 {
        self.start_y + self.span_y
    }
}

/// Intersect `rect` with a `buf_w` x `buf_h` buffer.
///
/// Returns `None` when nothing is visible, which callers treat as a no-op.
pub fn clip(rect: Rect, buf_w: u32, buf_h: u32) -> Option<ClipRect> {
    let start_x = rect.x.max(0);
    let start_y = rect.y.max(0);
    let end_x = rect.x.saturating_add(rect.width).min(buf_w as i32);
    let end_y = rect.y.saturating_add(rect.height).min(buf_h as i32);
    let span_x = end_x - start_x;
    let span_y = end_y - start_y;

    if span_x <= 0 || span_y <= 0 {
        return None;
    }

    Some(ClipRect {
        start_x,
        start_y,
        span_x,
        span_y,
    })
}

/// Maps offsets inside a `ClipRect` to source texel coordinates.
///
/// Column `ix` of the clipped span samples `origin_x + step_x * ix`, where
/// `step_x` is `-1` when the sprite is mirrored horizontally. Rows work the
/// same way. The origin already accounts for however much of the sprite was
/// cut off on the left/top, so a clipped sprite shows the same texels it
/// would have shown unclipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMap {
    pub origin_x: i32,
    pub origin_y: i32,
    pub step_x: i32,
    pub step_y: i32,
}

impl SourceMap {
    pub fn new(req: &DrawRequest, clip: &ClipRect) -> Self {
        // How far into the sprite the visible span begins
        let skip_x = clip.start_x - req.x;
        let skip_y = clip.start_y - req.y;

        let (origin_x, step_x) = axis(req.tex_x, req.width, skip_x, req.flip_x);
        let (origin_y, step_y) = axis(req.tex_y, req.height, skip_y, req.flip_y);

        Self {
            origin_x,
            origin_y,
            step_x,
            step_y,
        }
    }

    #[inline]
    pub fn src_x(&self, ix: i32) -> i32 {
        self.origin_x + self.step_x * ix
    }

    #[inline]
    pub fn src_y(&self, iy: i32) -> i32 {
        self.origin_y + self.step_y * iy
    }

    #[inline]
    pub fn flipped_x(&self) -> bool {
        self.step_x < 0
    }
}

/// Start texel and direction along one axis
#[inline]
fn axis(tex: i32, extent: i32, skip: i32, flip: bool) -> (i32, i32) {
    if flip {
        (tex + extent - 1 - skip, -1)
    } else {
        (tex + skip, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_fully_inside() {
        let c = clip(Rect::new(10, 20, 16, 16), 320, 240).unwrap();
        assert_eq!(
            c,
            ClipRect {
                start_x: 10,
                start_y: 20,
                span_x: 16,
                span_y: 16
            }
        );
    }

    #[test]
    fn test_clip_negative_origin() {
        let c = clip(Rect::new(-8, -8, 16, 16), 320, 240).unwrap();
        assert_eq!((c.start_x, c.start_y, c.span_x, c.span_y), (0, 0, 8, 8));
    }

    #[test]
    fn test_clip_past_far_edge() {
        let c = clip(Rect::new(310, 235, 16, 16), 320, 240).unwrap();
        assert_eq!((c.start_x, c.start_y, c.span_x, c.span_y), (310, 235, 10, 5));
        assert_eq!((c.end_x(), c.end_y()), (320, 240));
    }

    #[test]
    fn test_clip_off_canvas_is_none() {
        assert!(clip(Rect::new(-16, 0, 16, 16), 320, 240).is_none());
        assert!(clip(Rect::new(320, 0, 16, 16), 320, 240).is_none());
        assert!(clip(Rect::new(0, 240, 16, 16), 320, 240).is_none());
        assert!(clip(Rect::new(0, -100, 16, 16), 320, 240).is_none());
    }

    #[test]
    fn test_clip_degenerate_extent_is_none() {
        assert!(clip(Rect::new(5, 5, 0, 16), 320, 240).is_none());
        assert!(clip(Rect::new(5, 5, 16, -3), 320, 240).is_none());
    }

    #[test]
    fn test_clip_huge_extent_saturates() {
        let c = clip(Rect::new(100, 0, i32::MAX, 1), 320, 240).unwrap();
        assert_eq!(c.span_x, 220);
    }

    #[test]
    fn test_source_map_plain() {
        let req = DrawRequest::new(-3, 0, 16, 16, 32, 8);
        let c = clip(req.dest_rect(), 320, 240).unwrap();
        let map = SourceMap::new(&req, &c);
        // Three columns were clipped off the left
        assert_eq!(map.src_x(0), 35);
        assert_eq!(map.src_x(12), 47);
        assert_eq!(map.src_y(0), 8);
        assert!(!map.flipped_x());
    }

    #[test]
    fn test_source_map_flipped() {
        let req = DrawRequest::new(0, 0, 16, 8, 32, 8).flipped(true, true);
        let c = clip(req.dest_rect(), 320, 240).unwrap();
        let map = SourceMap::new(&req, &c);
        assert_eq!(map.src_x(0), 47);
        assert_eq!(map.src_x(15), 32);
        assert_eq!(map.src_y(0), 15);
        assert_eq!(map.src_y(7), 8);
    }

    #[test]
    fn test_source_map_flipped_and_clipped() {
        // Left 4 columns hidden: visible column 0 is sprite column 4,
        // which mirrors to sprite column 11
        let req = DrawRequest::new(-4, 0, 16, 16, 0, 0).flipped(true, false);
        let c = clip(req.dest_rect(), 320, 240).unwrap();
        let map = SourceMap::new(&req, &c);
        assert_eq!(map.src_x(0), 11);
        assert_eq!(map.src_x(11), 0);
    }
}
