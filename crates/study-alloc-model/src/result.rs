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

use crate::{
    day::WindowSource,
    dto::{AllocateTimeResponse, AllocationData},
    err::{PartitionMismatchError, ResultValidationError, SlotOverlapError},
    id::{PlanDate, PlanId},
    plan::PlanRequest,
};
use std::{
    collections::{BTreeMap, HashSet},
    fmt::Display,
};
use study_alloc_core::time::{Minutes, TimeOffset, TimeWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotOrigin {
    /// Placed by the allocator in this run.
    Placed,
    /// Carried a fixed time on input and was left where it was.
    Pinned,
}

/// A plan with a resolved slot.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocatedPlan {
    request: PlanRequest,
    slot: TimeWindow,
    origin: SlotOrigin,
}

impl AllocatedPlan {
    #[inline]
    pub fn placed(request: PlanRequest, slot: TimeWindow) -> Self {
        Self {
            request,
            slot,
            origin: SlotOrigin::Placed,
        }
    }

    #[inline]
    pub fn pinned(request: PlanRequest, slot: TimeWindow) -> Self {
        Self {
            request,
            slot,
            origin: SlotOrigin::Pinned,
        }
    }

    #[inline]
    pub fn request(&self) -> &PlanRequest {
        &self.request
    }

    #[inline]
    pub fn id(&self) -> PlanId {
        self.request.id()
    }

    #[inline]
    pub fn slot(&self) -> TimeWindow {
        self.slot
    }

    #[inline]
    pub fn start(&self) -> TimeOffset {
        self.slot.start()
    }

    #[inline]
    pub fn end(&self) -> TimeOffset {
        self.slot.end()
    }

    #[inline]
    pub fn start_time(&self) -> String {
        self.slot.start().to_clock()
    }

    #[inline]
    pub fn end_time(&self) -> String {
        self.slot.end().to_clock()
    }

    #[inline]
    pub fn origin(&self) -> SlotOrigin {
        self.origin
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        self.origin == SlotOrigin::Placed
    }
}

impl Display for AllocatedPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}-{} ({:?})",
            self.request.date(),
            self.request.id(),
            self.start_time(),
            self.end_time(),
            self.origin
        )
    }
}

/// Why a plan could not be placed. Capacity exhaustion is data, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnallocatedReason {
    /// Free time remains, but no single gap is long enough.
    InsufficientTime {
        required: Minutes,
        largest_gap: Minutes,
    },
    /// Every window of the day is fully occupied.
    DayFull { required: Minutes },
    /// The date already holds the configured maximum number of plans.
    DailyLimit { limit: usize },
}

impl Display for UnallocatedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnallocatedReason::InsufficientTime {
                required,
                largest_gap,
            } => write!(
                f,
                "insufficient time: needs {}, largest free gap is {}",
                required, largest_gap
            ),
            UnallocatedReason::DayFull { required } => {
                write!(f, "day is full: needs {}, nothing free", required)
            }
            UnallocatedReason::DailyLimit { limit } => {
                write!(f, "daily limit of {} plans reached", limit)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnallocatedPlan {
    request: PlanRequest,
    reason: UnallocatedReason,
}

impl UnallocatedPlan {
    #[inline]
    pub fn new(request: PlanRequest, reason: UnallocatedReason) -> Self {
        Self { request, reason }
    }

    #[inline]
    pub fn request(&self) -> &PlanRequest {
        &self.request
    }

    #[inline]
    pub fn id(&self) -> PlanId {
        self.request.id()
    }

    #[inline]
    pub fn reason(&self) -> UnallocatedReason {
        self.reason
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocationStats {
    plans: usize,
    placed: usize,
    pinned: usize,
    unallocated: usize,
    placed_minutes: Minutes,
    free_minutes: Minutes,
    dates: usize,
    default_window_dates: usize,
}

impl AllocationStats {
    #[inline]
    pub fn plans(&self) -> usize {
        self.plans
    }

    #[inline]
    pub fn placed(&self) -> usize {
        self.placed
    }

    #[inline]
    pub fn pinned(&self) -> usize {
        self.pinned
    }

    #[inline]
    pub fn unallocated(&self) -> usize {
        self.unallocated
    }

    #[inline]
    pub fn placed_minutes(&self) -> Minutes {
        self.placed_minutes
    }

    /// Free window time before this run placed anything.
    #[inline]
    pub fn free_minutes(&self) -> Minutes {
        self.free_minutes
    }

    #[inline]
    pub fn dates(&self) -> usize {
        self.dates
    }

    #[inline]
    pub fn default_window_dates(&self) -> usize {
        self.default_window_dates
    }

    /// Share of the free time that was filled, in `[0, 1]`.
    pub fn utilization(&self) -> f64 {
        if self.free_minutes.value() <= 0 {
            return 0.0;
        }
        self.placed_minutes.value() as f64 / self.free_minutes.value() as f64
    }

    pub fn merge(&mut self, other: &AllocationStats) {
        self.plans += other.plans;
        self.placed += other.placed;
        self.pinned += other.pinned;
        self.unallocated += other.unallocated;
        self.placed_minutes = self.placed_minutes.saturating_add(other.placed_minutes);
        self.free_minutes = self.free_minutes.saturating_add(other.free_minutes);
        self.dates += other.dates;
        self.default_window_dates += other.default_window_dates;
    }
}

impl Display for AllocationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Allocation statistics:")?;
        writeln!(f, "  Plans: {}", self.plans)?;
        writeln!(f, "  Placed: {}", self.placed)?;
        writeln!(f, "  Pinned: {}", self.pinned)?;
        writeln!(f, "  Unallocated: {}", self.unallocated)?;
        writeln!(f, "  Placed minutes: {}", self.placed_minutes)?;
        writeln!(f, "  Free minutes: {}", self.free_minutes)?;
        writeln!(f, "  Utilization: {:.1}%", self.utilization() * 100.0)?;
        writeln!(
            f,
            "  Dates: {} ({} on the default window)",
            self.dates, self.default_window_dates
        )?;
        Ok(())
    }
}

/// The outcome for one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayAllocation {
    date: PlanDate,
    allocated: Vec<AllocatedPlan>,
    unallocated: Vec<UnallocatedPlan>,
    stats: AllocationStats,
}

impl DayAllocation {
    pub fn new(
        date: PlanDate,
        window_source: WindowSource,
        free_minutes: Minutes,
        allocated: Vec<AllocatedPlan>,
        unallocated: Vec<UnallocatedPlan>,
    ) -> Self {
        let placed: Vec<&AllocatedPlan> = allocated.iter().filter(|a| a.is_placed()).collect();
        let stats = AllocationStats {
            plans: allocated.len() + unallocated.len(),
            placed: placed.len(),
            pinned: allocated.len() - placed.len(),
            unallocated: unallocated.len(),
            placed_minutes: placed.iter().map(|a| a.slot().length::<Minutes>()).sum(),
            free_minutes,
            dates: 1,
            default_window_dates: usize::from(window_source == WindowSource::Default),
        };
        Self {
            date,
            allocated,
            unallocated,
            stats,
        }
    }

    #[inline]
    pub fn date(&self) -> &PlanDate {
        &self.date
    }

    #[inline]
    pub fn allocated(&self) -> &[AllocatedPlan] {
        &self.allocated
    }

    #[inline]
    pub fn unallocated(&self) -> &[UnallocatedPlan] {
        &self.unallocated
    }

    #[inline]
    pub fn stats(&self) -> &AllocationStats {
        &self.stats
    }
}

/// The partition of all input plans into allocated and unallocated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AllocationResult {
    allocated: Vec<AllocatedPlan>,
    unallocated: Vec<UnallocatedPlan>,
    stats: AllocationStats,
}

impl AllocationResult {
    /// Concatenates per-date outcomes in the order given.
    pub fn from_days<I>(days: I) -> Self
    where
        I: IntoIterator<Item = DayAllocation>,
    {
        let mut result = Self::default();
        for day in days {
            result.stats.merge(&day.stats);
            result.allocated.extend(day.allocated);
            result.unallocated.extend(day.unallocated);
        }
        result
    }

    #[inline]
    pub fn allocated(&self) -> &[AllocatedPlan] {
        &self.allocated
    }

    #[inline]
    pub fn unallocated(&self) -> &[UnallocatedPlan] {
        &self.unallocated
    }

    #[inline]
    pub fn stats(&self) -> &AllocationStats {
        &self.stats
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.allocated.len() + self.unallocated.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that the result partitions `expected` plans and that, per date,
    /// no placed slot intersects any other slot.
    ///
    /// Pinned slots are only compared against placed ones: two pinned plans
    /// that overlap were supplied that way.
    pub fn validate(&self, expected: usize) -> Result<(), ResultValidationError> {
        if self.len() != expected {
            return Err(PartitionMismatchError::new(expected, self.len()).into());
        }

        let mut seen: HashSet<PlanId> = HashSet::with_capacity(self.len());
        let ids = self
            .allocated
            .iter()
            .map(AllocatedPlan::id)
            .chain(self.unallocated.iter().map(UnallocatedPlan::id));
        for id in ids {
            if !seen.insert(id) {
                return Err(ResultValidationError::DuplicatePlan(id));
            }
        }

        let mut by_date: BTreeMap<&PlanDate, Vec<&AllocatedPlan>> = BTreeMap::new();
        for a in &self.allocated {
            by_date.entry(a.request().date()).or_default().push(a);
        }

        for (date, mut plans) in by_date {
            plans.sort_by_key(|a| (a.start(), a.end()));
            let mut active: Vec<&AllocatedPlan> = Vec::new();
            for cur in plans {
                active.retain(|x| x.end() > cur.start());
                for other in &active {
                    let both_pinned = !other.is_placed() && !cur.is_placed();
                    if !both_pinned && other.slot().intersects(&cur.slot()) {
                        return Err(SlotOverlapError::new(
                            date.clone(),
                            (other.id(), other.slot()),
                            (cur.id(), cur.slot()),
                        )
                        .into());
                    }
                }
                active.push(cur);
            }
        }
        Ok(())
    }

    /// The wire response: allocated records carry `start_time` / `end_time`,
    /// unallocated ones are returned untouched.
    pub fn to_response(&self) -> AllocateTimeResponse {
        AllocateTimeResponse {
            success: true,
            data: AllocationData {
                allocated_plans: self
                    .allocated
                    .iter()
                    .map(|a| a.request().to_dto_with_slot(a.start(), a.end()))
                    .collect(),
                unallocated_plans: self
                    .unallocated
                    .iter()
                    .map(|u| u.request().to_dto())
                    .collect(),
            },
        }
    }
}

impl Display for AllocationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Allocated:")?;
        for a in &self.allocated {
            writeln!(f, "  {}", a)?;
        }
        writeln!(f, "Unallocated:")?;
        for u in &self.unallocated {
            writeln!(f, "  {} ({})", u.request(), u.reason())?;
        }
        write!(f, "{}", self.stats)
    }
}
