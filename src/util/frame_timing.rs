use web_time::{Duration, Instant};

/// Weight of the running average in each FPS update (the new sample gets
/// `1 / FPS_SMOOTHING`).
const FPS_SMOOTHING: f32 = 50.0;

/// Frame timing with FPS calculation and optional frame limiting
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS, `None` until the first sample
    smoothed_fps: Option<f32>,
    /// Frames recorded so far
    frame_count: u64,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            target_fps,
            min_frame_duration,
            last_frame: Instant::now(),
            smoothed_fps: None,
            frame_count: 0,
        }
    }

    /// Returns true if enough time has passed since the last frame to render
    /// another one.
    pub fn should_render(&self) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Seconds since the previous frame ended.
    pub fn delta_time(&self) -> f32 {
        self.last_frame.elapsed().as_secs_f32()
    }

    /// Call after rendering to update timing. Returns the frame time in
    /// seconds.
    pub fn end_frame(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(elapsed);
        elapsed
    }

    /// Fold one frame time into the statistics.
    ///
    /// The instantaneous rate is `floor(1 / dt)`; the running value moves
    /// 1/50th of the way toward it each frame.
    pub fn record(&mut self, delta_seconds: f32) {
        self.frame_count += 1;
        if delta_seconds <= 0.0 {
            return;
        }
        let instant = (1.0 / delta_seconds).floor();
        self.smoothed_fps = Some(match self.smoothed_fps {
            None => instant,
            Some(last) => {
                (instant + last * (FPS_SMOOTHING - 1.0)) / FPS_SMOOTHING
            }
        });
    }

    /// Get the current FPS (smoothed), 0 before the first frame.
    pub fn fps(&self) -> f32 {
        self.smoothed_fps.unwrap_or(0.0)
    }

    /// Frames recorded so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_seeds_the_average() {
        let mut timing = FrameTiming::new(0);
        assert_eq!(timing.fps(), 0.0);
        timing.record(0.25);
        assert_eq!(timing.fps(), 4.0);
    }

    #[test]
    fn later_samples_move_one_fiftieth() {
        let mut timing = FrameTiming::new(0);
        timing.record(0.5);
        timing.record(0.25);
        // (4 + 2 * 49) / 50
        assert!((timing.fps() - 2.04).abs() < 1e-5);
        assert_eq!(timing.frame_count(), 2);
    }

    #[test]
    fn zero_delta_counts_the_frame_only() {
        let mut timing = FrameTiming::new(0);
        timing.record(0.0);
        assert_eq!(timing.frame_count(), 1);
        assert_eq!(timing.fps(), 0.0);
    }

    #[test]
    fn unlimited_always_renders() {
        assert!(FrameTiming::new(0).should_render());
    }
}
