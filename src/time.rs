//! Frame clock for scenes.
//!
//! Tracks delta time, a user-selected time scale, pause state and a running
//! clock that only advances while unpaused. The clock can be fed either from
//! the wall clock ([`Time::update`]) or from explicit deltas
//! ([`Time::advance`]), which is what tests use as a virtual clock.
//!
//! # Example
//!
//! ```ignore
//! use antimatter::time::{Time, TimeScale};
//!
//! let mut time = Time::new();
//! time.set_preset(TimeScale::Slow);
//!
//! // In your frame callback:
//! let step = time.update();
//! scene.step(&step);
//! ```

use std::time::{Duration, Instant};

/// Discrete time-scale presets offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeScale {
    Slow,
    Normal,
    Fast,
}

impl TimeScale {
    pub fn factor(self) -> f32 {
        match self {
            TimeScale::Slow => 0.2,
            TimeScale::Normal => 1.0,
            TimeScale::Fast => 3.0,
        }
    }
}

/// Timing for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    /// Unscaled seconds since the previous frame.
    pub raw: f32,
    /// `raw * time_scale`.
    pub scaled: f32,
    pub time_scale: f32,
}

impl FrameStep {
    /// A step of `raw` seconds at `time_scale`.
    pub fn new(raw: f32, time_scale: f32) -> Self {
        Self {
            raw,
            scaled: raw * time_scale,
            time_scale,
        }
    }

    /// A step that advances nothing.
    pub fn idle(time_scale: f32) -> Self {
        Self::new(0.0, time_scale)
    }

    pub fn is_idle(&self) -> bool {
        self.raw <= 0.0
    }
}

/// Time tracking for a scene's frame loop.
#[derive(Debug)]
pub struct Time {
    /// When the last wall-clock frame occurred.
    last_frame: Instant,
    /// Unscaled seconds accumulated while running.
    elapsed_secs: f32,
    /// Scaled seconds accumulated while running.
    sim_secs: f32,
    /// Unscaled time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            elapsed_secs: 0.0,
            sim_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            time_scale: 1.0,
        }
    }

    /// Sample the wall clock and advance by the time since the previous frame.
    pub fn update(&mut self) -> FrameStep {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.advance(raw)
    }

    /// Advance by `raw` seconds without consulting the wall clock.
    ///
    /// While paused the returned step is idle and no clock moves.
    pub fn advance(&mut self, raw: f32) -> FrameStep {
        if self.paused {
            self.delta_secs = 0.0;
            return FrameStep::idle(self.time_scale);
        }

        let raw = raw.max(0.0);
        let step = FrameStep::new(raw, self.time_scale);
        self.delta_secs = raw;
        self.elapsed_secs += step.raw;
        self.sim_secs += step.scaled;
        self.frame_count += 1;
        step
    }

    /// Unscaled seconds spent running.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Scaled seconds spent running.
    #[inline]
    pub fn sim_time(&self) -> f32 {
        self.sim_secs
    }

    /// Unscaled time since last frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// While paused, steps are idle and `elapsed()` stops increasing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after pausing. The pause interval is not counted as frame time.
    pub fn resume(&mut self) {
        if self.paused {
            self.last_frame = Instant::now();
            self.paused = false;
        }
    }

    /// Set time scale multiplier. Negative values clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn set_preset(&mut self, preset: TimeScale) {
        self.set_time_scale(preset.factor());
    }

    /// Reset counters and clocks. Pause state and time scale are kept.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.last_frame = now;
        self.elapsed_secs = 0.0;
        self.sim_secs = 0.0;
        self.delta_secs = 0.0;
        self.frame_count = 0;
        self.fps = 0.0;
        self.fps_frame_count = 0;
        self.fps_update_time = now;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert!(!time.is_paused());
        assert_eq!(time.time_scale(), 1.0);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let step = time.update();

        assert!(step.raw > 0.0);
        assert!(time.elapsed() > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_time_pause() {
        let mut time = Time::new();
        time.advance(0.5);

        time.pause();
        assert!(time.is_paused());

        let elapsed_before = time.elapsed();
        let step = time.advance(0.25);

        assert!(step.is_idle());
        assert_eq!(step.scaled, 0.0);
        assert_eq!(time.elapsed(), elapsed_before);
        assert_eq!(time.delta(), 0.0);

        time.resume();
        time.advance(0.25);
        assert_eq!(time.elapsed(), 0.75);
    }

    #[test]
    fn test_time_scale() {
        let mut time = Time::new();
        time.set_preset(TimeScale::Fast);
        let step = time.advance(0.5);
        assert_eq!(step.scaled, 1.5);
        assert_eq!(time.sim_time(), 1.5);
        assert_eq!(time.elapsed(), 0.5);

        // Negative scale should clamp to 0
        time.set_time_scale(-1.0);
        assert_eq!(time.time_scale(), 0.0);
    }

    #[test]
    fn presets_match_factors() {
        assert_eq!(TimeScale::Slow.factor(), 0.2);
        assert_eq!(TimeScale::Normal.factor(), 1.0);
        assert_eq!(TimeScale::Fast.factor(), 3.0);
    }
}
