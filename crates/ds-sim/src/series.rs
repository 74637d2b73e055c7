//! Rolling time series for live charts.

use std::collections::VecDeque;

use ds_core::Tick;

pub const DEFAULT_SERIES_WINDOW: usize = 100;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesPoint {
    pub time:          Tick,
    /// Undelivered orders in the working set.
    pub pending:       usize,
    pub active_agents: usize,
}

/// The last `window` points, oldest first.
#[derive(Clone, Debug)]
pub struct LiveSeries {
    window: usize,
    points: VecDeque<SeriesPoint>,
}

impl Default for LiveSeries {
    fn default() -> Self {
        Self::new(DEFAULT_SERIES_WINDOW)
    }
}

impl LiveSeries {
    pub fn new(window: usize) -> Self {
        Self { window, points: VecDeque::with_capacity(window.min(1_024)) }
    }

    pub fn push(&mut self, point: SeriesPoint) {
        if self.window == 0 {
            return;
        }
        if self.points.len() == self.window {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesPoint> + '_ {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
