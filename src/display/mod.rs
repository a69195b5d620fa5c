mod pixel_buffer;

pub use pixel_buffer::{alpha_key, PixelBuffer};

pub const DEFAULT_WIDTH: u32 = 320;
pub const DEFAULT_HEIGHT: u32 = 240;

/// Upper bound on `width * height` for buffers and images. Pixel coordinates
/// are `i32`, so neither side nor the pixel count may exceed `i32::MAX`.
pub const MAX_PIXELS: usize = i32::MAX as usize;

/// Pixel count of a `width` x `height` surface, or `None` if it is too large
/// to address
pub fn pixel_count(width: u32, height: u32) -> Option<usize> {
    if width > i32::MAX as u32 || height > i32::MAX as u32 {
        return None;
    }
    (width as usize)
        .checked_mul(height as usize)
        .filter(|&n| n <= MAX_PIXELS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_count_limits() {
        assert_eq!(pixel_count(320, 240), Some(76_800));
        assert_eq!(pixel_count(0, 70_000), Some(0));
        assert_eq!(pixel_count(70_000, 70_000), None);
        assert_eq!(pixel_count(u32::MAX, 1), None);
        assert_eq!(pixel_count(1, i32::MAX as u32), Some(MAX_PIXELS));
    }
}
