//! Shared utilities

use std::collections::VecDeque;
use std::time::Duration;

/// Simple deterministic RNG using xorshift64
/// Used for randomized draw requests in tests and benches
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) } // Ensure non-zero
    }

    /// Get the next random u64
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Get a random u32
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    #[inline]
    pub fn next_bool(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }

    /// Get a random i32 in [min, max]
    ///
    /// # Panics
    /// Panics in debug builds if `min > max`
    #[inline]
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max, "range_i32: min ({}) must be <= max ({})", min, max);
        if min >= max {
            return min;
        }
        let range = (i64::from(max) - i64::from(min) + 1) as u64;
        (i64::from(min) + (self.next_u64() % range) as i64) as i32
    }

    /// Random ARGB word; roughly one in four comes out fully transparent
    pub fn next_pixel(&mut self) -> u32 {
        if self.next_u64() % 4 == 0 {
            0
        } else {
            self.next_u32() | 0x0100_0000
        }
    }
}

// ============================================================================
// Frame Timer
// ============================================================================

/// Frame composition timings: rolling window plus whole-session average
pub struct FrameTimer {
    frame_times: VecDeque<f32>,
    sample_count: usize,
    total_ms: f64,
    frames: u64,
}

impl FrameTimer {
    /// Create a timer with the given rolling window size
    pub fn new(sample_count: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            sample_count: sample_count.max(1),
            total_ms: 0.0,
            frames: 0,
        }
    }

    /// Record one frame's composition time. Returns it in milliseconds.
    pub fn record(&mut self, elapsed: Duration) -> f32 {
        let ms = elapsed.as_secs_f32() * 1000.0;
        self.frame_times.push_back(ms);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }
        self.total_ms += f64::from(ms);
        self.frames += 1;
        ms
    }

    /// Total number of frames recorded this session
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Frames currently held in the rolling window
    pub fn window_len(&self) -> usize {
        self.frame_times.len()
    }

    /// Mean over every recorded frame
    pub fn session_average_ms(&self) -> f32 {
        if self.frames == 0 {
            return 0.0;
        }
        (self.total_ms / self.frames as f64) as f32
    }

    /// Mean over the rolling window
    pub fn rolling_average_ms(&self) -> f32 {
        self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32
    }

    /// Fastest and slowest frame in the window
    pub fn min_max_ms(&self) -> (f32, f32) {
        if self.frame_times.is_empty() {
            return (0.0, 0.0);
        }
        let min = self.frame_times.iter().copied().fold(f32::INFINITY, f32::min);
        let max = self.frame_times.iter().copied().fold(0.0, f32::max);
        (min, max)
    }

    /// Percentile frame times in the window (sorted copy)
    /// Returns (1st percentile, 50th/median, 99th percentile)
    pub fn percentiles_ms(&self) -> (f32, f32, f32) {
        if self.frame_times.is_empty() {
            return (0.0, 0.0, 0.0);
        }
        let mut sorted: Vec<f32> = self.frame_times.iter().copied().collect();
        sorted.sort_by(f32::total_cmp);

        let len = sorted.len();
        let p1_idx = (len as f32 * 0.01).floor() as usize;
        let p50_idx = len / 2;
        let p99_idx = ((len as f32 * 0.99).floor() as usize).min(len - 1);

        (sorted[p1_idx], sorted[p50_idx], sorted[p99_idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_range_i32_bounds() {
        let mut rng = Rng::new(7);
        for _ in 0..1000 {
            let v = rng.range_i32(-20, 20);
            assert!((-20..=20).contains(&v));
        }
        assert_eq!(rng.range_i32(5, 5), 5);
    }

    #[test]
    fn test_next_pixel_transparent_is_zero() {
        let mut rng = Rng::new(99);
        for _ in 0..1000 {
            let p = rng.next_pixel();
            assert!(p == 0 || p & 0xFF00_0000 != 0);
        }
    }

    #[test]
    fn test_frame_timer_averages() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(2));
        timer.record(Duration::from_millis(4));
        timer.record(Duration::from_millis(6));
        assert_eq!(timer.frame_count(), 3);
        assert_eq!(timer.window_len(), 2);
        assert!((timer.session_average_ms() - 4.0).abs() < 0.01);
        // Window only holds the last two frames
        assert!((timer.rolling_average_ms() - 5.0).abs() < 0.01);
        let (min, max) = timer.min_max_ms();
        assert!((min - 4.0).abs() < 0.01 && (max - 6.0).abs() < 0.01);
    }

    #[test]
    fn test_frame_timer_empty() {
        let timer = FrameTimer::new(60);
        assert_eq!(timer.session_average_ms(), 0.0);
        assert_eq!(timer.percentiles_ms(), (0.0, 0.0, 0.0));
        assert_eq!(timer.rolling_average_ms(), 0.0);
        assert_eq!(timer.min_max_ms(), (0.0, 0.0));
    }
}
