/// Per-frame statistics and stage timers
/// Each tick stage is timed and logged at trace level
use crate::rendering::RasterStats;
use log::trace;
use std::time::{Duration, Instant};

pub struct PerfTimer {
    name: &'static str,
    start: Instant,
}

impl PerfTimer {
    #[inline]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for PerfTimer {
    fn drop(&mut self) {
        trace!("[PERF] {}: {}μs", self.name, self.elapsed().as_micros());
    }
}

/// Wall time spent in each tick stage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageTimings {
    pub world: Duration,
    pub movement: Duration,
    pub raycast: Duration,
    pub collect: Duration,
    pub raster: Duration,
    pub total: Duration,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    /// Host-reported time since the previous tick.
    pub elapsed: Duration,
    pub recentered: bool,
    pub rebuilt: bool,
    pub candidates: usize,
    pub rendered_blocks: usize,
    pub colliders: usize,
    pub has_hit: bool,
    pub edited: bool,
    pub raster: RasterStats,
    pub timings: StageTimings,
}

impl FrameStats {
    pub fn log_summary(&self) {
        trace!(
            "frame {}: {} candidates, {} drawn blocks, {} tris ({} culled, {} clipped away), {}μs",
            self.frame,
            self.candidates,
            self.rendered_blocks,
            self.raster.triangles_drawn,
            self.raster.triangles_culled,
            self.raster.triangles_clipped_away,
            self.timings.total.as_micros()
        );
    }
}

/// Scoped stage timer
#[macro_export]
macro_rules! perf_scope {
    ($name:expr) => {
        let _timer = $crate::perf::PerfTimer::new($name);
    };
}
