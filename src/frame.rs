//! Frame timing: delta time plus periodic frame-time reports.

use std::time::{Duration, Instant};

/// How often average frame time is reported.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(3);

/// Average over one report window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTimeReport {
    pub frames: u32,
    pub ms_per_frame: f32,
    pub fps: f32,
}

/// Per-frame clock, ticked once at the start of every frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    window_start: Instant,
    window_frames: u32,
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            last: now,
            window_start: now,
            window_frames: 0,
            frame: 0,
        }
    }

    /// Frames ticked so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Begin a frame now. Returns delta seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now()).0
    }

    /// Begin a frame at `now`. Returns delta seconds and, once per
    /// [`REPORT_INTERVAL`], the average over the elapsed window.
    pub fn tick_at(&mut self, now: Instant) -> (f32, Option<FrameTimeReport>) {
        let dt = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        self.frame += 1;
        self.window_frames += 1;

        let window = now.saturating_duration_since(self.window_start);
        if window < REPORT_INTERVAL {
            return (dt, None);
        }

        let secs = window.as_secs_f32();
        let report = FrameTimeReport {
            frames: self.window_frames,
            ms_per_frame: secs * 1000.0 / self.window_frames as f32,
            fps: self.window_frames as f32 / secs,
        };
        tracing::info!("ms: {:.6}, FPS: {:.3}", report.ms_per_frame, report.fps);
        self.window_start = now;
        self.window_frames = 0;
        (dt, Some(report))
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
