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

use crate::{err::InputError, id::PlanDate, plan::PlanRequest};
use std::collections::BTreeMap;
use study_alloc_core::time::{Minutes, TimeWindow};

/// A validated block of time available for placement on one date.
pub type FreeWindow = TimeWindow;

/// Where the windows of a day came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowSource {
    /// Supplied by the schedule generator.
    Supplied,
    /// Nothing usable was supplied; the configured default window stands in.
    Default,
}

/// Everything the allocator needs for one date.
///
/// Windows are sorted by start and never overlap. `pending` keeps input order;
/// the allocator does its own (stable) sorting.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPlan {
    date: PlanDate,
    windows: Vec<FreeWindow>,
    window_source: WindowSource,
    pinned: Vec<PlanRequest>,
    pending: Vec<PlanRequest>,
}

impl DayPlan {
    pub fn new(date: PlanDate, windows: Vec<FreeWindow>, window_source: WindowSource) -> Self {
        Self {
            date,
            windows,
            window_source,
            pinned: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Adds a plan to the pinned or the pending list, depending on whether it
    /// already has a time.
    pub fn push(&mut self, plan: PlanRequest) {
        debug_assert_eq!(plan.date(), &self.date);
        if plan.is_pinned() {
            self.pinned.push(plan);
        } else {
            self.pending.push(plan);
        }
    }

    #[inline]
    pub fn date(&self) -> &PlanDate {
        &self.date
    }

    #[inline]
    pub fn windows(&self) -> &[FreeWindow] {
        &self.windows
    }

    #[inline]
    pub fn window_source(&self) -> WindowSource {
        self.window_source
    }

    #[inline]
    pub fn pinned(&self) -> &[PlanRequest] {
        &self.pinned
    }

    #[inline]
    pub fn pending(&self) -> &[PlanRequest] {
        &self.pending
    }

    #[inline]
    pub fn plan_count(&self) -> usize {
        self.pinned.len() + self.pending.len()
    }

    /// Sum of all window lengths, ignoring occupancy.
    pub fn window_minutes(&self) -> Minutes {
        self.windows.iter().map(|w| w.length::<Minutes>()).sum()
    }
}

/// A normalized allocation request, grouped by date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AllocationInput {
    days: BTreeMap<PlanDate, DayPlan>,
    content_duration_map: BTreeMap<String, f64>,
    rejected: Vec<InputError>,
}

impl AllocationInput {
    pub fn new(
        days: BTreeMap<PlanDate, DayPlan>,
        content_duration_map: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            days,
            content_duration_map,
            rejected: Vec::new(),
        }
    }

    /// Attaches the parts of the request that normalization refused.
    pub fn with_rejected(mut self, rejected: Vec<InputError>) -> Self {
        self.rejected = rejected;
        self
    }

    #[inline]
    pub fn days(&self) -> &BTreeMap<PlanDate, DayPlan> {
        &self.days
    }

    #[inline]
    pub fn iter_days(&self) -> impl Iterator<Item = &DayPlan> {
        self.days.values()
    }

    #[inline]
    pub fn day(&self, date: &PlanDate) -> Option<&DayPlan> {
        self.days.get(date)
    }

    #[inline]
    pub fn content_duration_map(&self) -> &BTreeMap<String, f64> {
        &self.content_duration_map
    }

    /// Windows and pins that were dropped as contract violations.
    #[inline]
    pub fn rejected(&self) -> &[InputError] {
        &self.rejected
    }

    pub fn plan_count(&self) -> usize {
        self.days.values().map(DayPlan::plan_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.plan_count() == 0
    }
}
