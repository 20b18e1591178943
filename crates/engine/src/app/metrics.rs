use std::time::{Duration, Instant};

/// Loop health over the last closed window, as shown in the F3 overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    /// Mean wall time of one `Scene::update`.
    pub step_time_ms: f32,
    /// Most fixed steps run inside a single frame while catching up.
    pub peak_ticks_per_frame: u32,
    /// Fixed steps discarded because a frame hit the catch-up cap.
    pub dropped_ticks: u32,
}

/// Counters for the current window plus the last closed one. Owned by the
/// frame loop; nothing else writes to it.
#[derive(Debug)]
pub(crate) struct LoopMetrics {
    window_start: Instant,
    window: Duration,
    frames: u32,
    ticks: u32,
    dropped_ticks: u32,
    peak_ticks_per_frame: u32,
    frame_time_total: Duration,
    step_time_total: Duration,
    latest: LoopMetricsSnapshot,
}

impl LoopMetrics {
    pub(crate) fn new(window: Duration, now: Instant) -> Self {
        Self {
            window_start: now,
            window,
            frames: 0,
            ticks: 0,
            dropped_ticks: 0,
            peak_ticks_per_frame: 0,
            frame_time_total: Duration::ZERO,
            step_time_total: Duration::ZERO,
            latest: LoopMetricsSnapshot::default(),
        }
    }

    pub(crate) fn record_step(&mut self, elapsed: Duration) {
        self.ticks = self.ticks.saturating_add(1);
        self.step_time_total = self.step_time_total.saturating_add(elapsed);
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration, ticks_this_frame: u32) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_total = self.frame_time_total.saturating_add(frame_dt);
        self.peak_ticks_per_frame = self.peak_ticks_per_frame.max(ticks_this_frame);
    }

    pub(crate) fn record_dropped_ticks(&mut self, count: u32) {
        self.dropped_ticks = self.dropped_ticks.saturating_add(count);
    }

    pub(crate) fn latest(&self) -> LoopMetricsSnapshot {
        self.latest
    }

    /// Closes the window once it has run its length; returns the new figures.
    pub(crate) fn roll_window(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }

        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        self.latest = LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            frame_time_ms: mean_ms(self.frame_time_total, self.frames),
            step_time_ms: mean_ms(self.step_time_total, self.ticks),
            peak_ticks_per_frame: self.peak_ticks_per_frame,
            dropped_ticks: self.dropped_ticks,
        };
        *self = Self {
            latest: self.latest,
            ..Self::new(self.window, now)
        };
        Some(self.latest)
    }
}

fn mean_ms(total: Duration, count: u32) -> f32 {
    if count == 0 {
        0.0
    } else {
        total.as_secs_f32() * 1000.0 / count as f32
    }
}
