//! Counters returned by the renderer for diagnostics and tests.

use std::ops::AddAssign;

/// What one buffer sync did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStats {
    pub segments_created: usize,
    /// Points whose quads were written this sync.
    pub points_uploaded: usize,
}

impl SyncStats {
    /// True when the sync touched no GPU memory.
    pub fn is_noop(&self) -> bool {
        self.segments_created == 0 && self.points_uploaded == 0
    }
}

impl AddAssign for SyncStats {
    fn add_assign(&mut self, rhs: Self) {
        self.segments_created += rhs.segments_created;
        self.points_uploaded += rhs.points_uploaded;
    }
}

/// What one frame drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub series_drawn: usize,
    pub segments_drawn: usize,
    pub vertices_drawn: u64,
}

impl AddAssign for FrameStats {
    fn add_assign(&mut self, rhs: Self) {
        self.series_drawn += rhs.series_drawn;
        self.segments_drawn += rhs.segments_drawn;
        self.vertices_drawn += rhs.vertices_drawn;
    }
}
