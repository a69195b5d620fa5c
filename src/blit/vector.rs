//! Bit-blit strategies over 4 and 8 lanes
//!
//! Per group of lanes:
//!
//! ```text
//! mask   = dst & (src == 0)    // all-ones lanes where src is transparent
//! result = src | mask
//! ```
//!
//! Transparent lanes keep `dst`, opaque lanes take `src`. This relies on
//! `ImageSource` storing every transparent texel as the zero word.
//! Horizontal mirroring loads the mirrored run of texels and reverses the
//! lane order. Columns left over after the last full group go through the
//! scalar path.

use wide::{u32x4, u32x8};

use super::scalar::composite_run;
use super::Compositor;
use crate::clip::{ClipRect, SourceMap};
use crate::display::PixelBuffer;
use crate::image_source::ImageSource;

macro_rules! bit_blit_strategy {
    ($(#[$doc:meta])* $name:ident, $simd:ty, $lanes:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            pub const LANES: i32 = $lanes;

            /// Composite one group. `src` holds the texels in memory order.
            #[inline]
            fn blit_group(dst: &mut [u32], src: &[u32], flip_x: bool) {
                let mut texels = [0u32; $lanes];
                texels.copy_from_slice(src);
                let mut s = <$simd>::new(texels);
                if flip_x {
                    let mut reversed = s.to_array();
                    reversed.reverse();
                    s = <$simd>::new(reversed);
                }

                let mut under = [0u32; $lanes];
                under.copy_from_slice(dst);
                let d = <$simd>::new(under);

                let mask = d & s.simd_eq(<$simd>::splat(0));
                let result = s | mask;
                dst.copy_from_slice(&result.to_array());
            }
        }

        impl Compositor for $name {
            fn composite(
                &self,
                dst: &mut PixelBuffer,
                src: &ImageSource,
                clip: &ClipRect,
                map: &SourceMap,
            ) {
                let flip_x = map.flipped_x();
                let whole = clip.span_x - clip.span_x % $lanes;

                for iy in 0..clip.span_y {
                    let src_row = src.row(map.src_y(iy));
                    let dst_row = dst.span_mut(clip.start_x, clip.start_y + iy, clip.span_x);

                    for ix in (0..whole).step_by($lanes) {
                        // Lowest texel address the group touches
                        let sx = if flip_x {
                            map.src_x(ix + $lanes - 1)
                        } else {
                            map.src_x(ix)
                        } as usize;
                        let dx = ix as usize;
                        Self::blit_group(
                            &mut dst_row[dx..dx + $lanes],
                            &src_row[sx..sx + $lanes],
                            flip_x,
                        );
                    }

                    if whole < clip.span_x {
                        composite_run(&mut dst_row[whole as usize..], src_row, map, whole);
                    }
                }
            }
        }
    };
}

bit_blit_strategy!(
    /// Four pixels per step (SSE2 / NEON class hardware)
    Vector4,
    u32x4,
    4
);

bit_blit_strategy!(
    /// Eight pixels per step (AVX2 class hardware)
    Vector8,
    u32x8,
    8
);
