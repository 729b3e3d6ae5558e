// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Occupied time of one date, window by window.
//!
//! Each `WindowOccupancy` owns the `IntervalSet` of a single free window. A
//! `DayOccupancy` owns all windows of one date and is never shared across
//! dates, so dates can be processed independently.

use crate::intervalset::IntervalSet;
use study_alloc_core::time::{Minutes, TimeOffset, TimeWindow};

/// One free window together with the time already taken inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOccupancy {
    window: TimeWindow,
    occupied: IntervalSet<TimeOffset>,
}

impl WindowOccupancy {
    #[inline]
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            occupied: IntervalSet::new(),
        }
    }

    /// Seeds the window with pre-existing occupancy, clipped to the window.
    #[inline]
    pub fn build<I>(window: TimeWindow, occupied: I) -> Self
    where
        I: IntoIterator<Item = TimeWindow>,
    {
        Self {
            window,
            occupied: IntervalSet::build_occupied(window, occupied),
        }
    }

    #[inline]
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    #[inline]
    pub fn occupied(&self) -> &IntervalSet<TimeOffset> {
        &self.occupied
    }

    /// Candidate gaps in scan order, zero-length boundary gaps included.
    #[inline]
    pub fn free_gaps(&self) -> Vec<TimeWindow> {
        self.occupied.free_gaps(self.window)
    }

    #[inline]
    pub fn first_free_gap(&self, required: Minutes) -> Option<TimeOffset> {
        self.occupied.first_free_gap(self.window, required)
    }

    #[inline]
    pub fn largest_free_gap(&self) -> Option<TimeWindow> {
        self.occupied.largest_free_gap::<Minutes>(self.window)
    }

    #[inline]
    pub fn free_minutes(&self) -> Minutes {
        self.window.length::<Minutes>() - self.occupied.total_length::<Minutes>()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        !self.free_minutes().is_positive()
    }

    /// Marks `slot` as taken. The slot must lie in the window and be free.
    pub fn occupy(&mut self, slot: TimeWindow) {
        debug_assert!(
            self.window.contains_interval(&slot),
            "slot {} outside window {}",
            slot,
            self.window
        );
        debug_assert!(
            !self.occupied.overlaps(slot),
            "slot {} overlaps occupied time",
            slot
        );
        self.occupied.insert_and_coalesce(slot);
    }
}

/// A free gap of one window of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapCandidate {
    window_index: usize,
    gap: TimeWindow,
}

impl GapCandidate {
    #[inline]
    pub fn new(window_index: usize, gap: TimeWindow) -> Self {
        Self { window_index, gap }
    }

    #[inline]
    pub fn window_index(&self) -> usize {
        self.window_index
    }

    #[inline]
    pub fn gap(&self) -> TimeWindow {
        self.gap
    }

    #[inline]
    pub fn start(&self) -> TimeOffset {
        self.gap.start()
    }

    #[inline]
    pub fn size(&self) -> Minutes {
        self.gap.length()
    }

    #[inline]
    pub fn fits(&self, required: Minutes) -> bool {
        self.size() >= required
    }
}

/// All windows of one date.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayOccupancy {
    windows: Vec<WindowOccupancy>,
}

impl DayOccupancy {
    /// Builds one occupancy per window, each seeded from `pinned`.
    pub fn build(windows: &[TimeWindow], pinned: &[TimeWindow]) -> Self {
        Self {
            windows: windows
                .iter()
                .map(|w| WindowOccupancy::build(*w, pinned.iter().copied()))
                .collect(),
        }
    }

    #[inline]
    pub fn windows(&self) -> &[WindowOccupancy] {
        &self.windows
    }

    /// Every candidate gap, ordered by window and then by start.
    pub fn candidates(&self) -> impl Iterator<Item = GapCandidate> + '_ {
        self.windows.iter().enumerate().flat_map(|(index, w)| {
            w.free_gaps()
                .into_iter()
                .map(move |gap| GapCandidate::new(index, gap))
        })
    }

    pub fn free_minutes(&self) -> Minutes {
        self.windows.iter().map(WindowOccupancy::free_minutes).sum()
    }

    /// Length of the longest free gap over all windows.
    pub fn largest_free_gap(&self) -> Minutes {
        self.windows
            .iter()
            .filter_map(WindowOccupancy::largest_free_gap)
            .map(|g| g.length::<Minutes>())
            .max()
            .unwrap_or_default()
    }

    #[inline]
    pub fn occupy(&mut self, candidate: &GapCandidate, slot: TimeWindow) {
        self.windows[candidate.window_index()].occupy(slot);
    }
}
