use super::Compositor;
use crate::clip::{ClipRect, SourceMap};
use crate::display::{alpha_key, PixelBuffer};
use crate::image_source::ImageSource;

/// Per-pixel alpha key. Handles any span width and both mirror axes by
/// stepping the source coordinate; the vector strategies are checked
/// against this one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scalar;

impl Compositor for Scalar {
    fn composite(
        &self,
        dst: &mut PixelBuffer,
        src: &ImageSource,
        clip: &ClipRect,
        map: &SourceMap,
    ) {
        for iy in 0..clip.span_y {
            let src_row = src.row(map.src_y(iy));
            let dst_row = dst.span_mut(clip.start_x, clip.start_y + iy, clip.span_x);
            composite_run(dst_row, src_row, map, 0);
        }
    }
}

/// Alpha-key `dst` from `src_row`, where `dst[0]` is clipped column `first_ix`
#[inline]
pub(super) fn composite_run(dst: &mut [u32], src_row: &[u32], map: &SourceMap, first_ix: i32) {
    for (i, d) in dst.iter_mut().enumerate() {
        let color = src_row[map.src_x(first_ix + i as i32) as usize];
        *d = alpha_key(*d, color);
    }
}
