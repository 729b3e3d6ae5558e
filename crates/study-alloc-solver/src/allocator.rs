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
    config::AllocatorConfig,
    normalize::normalize,
    occupancy::DayOccupancy,
};
use rayon::prelude::*;
use study_alloc_core::time::{Minutes, TimeWindow};
use study_alloc_model::{
    day::{AllocationInput, DayPlan},
    dto::{AllocateTimeRequest, AllocateTimeResponse},
    plan::PlanRequest,
    result::{AllocatedPlan, AllocationResult, DayAllocation, UnallocatedPlan, UnallocatedReason},
};
use tracing::{debug, info, instrument};

/// Places plans into the free windows of their date.
///
/// Every date is handled on its own: the date's pinned plans seed the
/// occupancy of each window, then the remaining plans are placed in order of
/// decreasing duration (stable, so equal durations keep their input order).
/// Each plan goes whole into the gap picked by the configured strategy or
/// ends up unallocated. A gap has to offer the configured minimum gap on top
/// of the plan's duration, and a date never holds more plans than the
/// configured daily limit.
#[derive(Debug, Clone, Default)]
pub struct TimeAllocator {
    config: AllocatorConfig,
}

impl TimeAllocator {
    #[inline]
    pub fn new(config: AllocatorConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Allocates every date of `input`. Dates appear in the result in date
    /// order whether or not they ran in parallel.
    #[instrument(skip_all, fields(
        dates = input.days().len(),
        plans = input.plan_count(),
        strategy = %self.config.strategy(),
        parallel = self.config.parallel()
    ))]
    pub fn allocate(&self, input: &AllocationInput) -> AllocationResult {
        let days: Vec<&DayPlan> = input.iter_days().collect();
        let outcomes: Vec<DayAllocation> = if self.config.parallel() {
            days.par_iter().map(|day| self.allocate_day(day)).collect()
        } else {
            days.iter().map(|day| self.allocate_day(day)).collect()
        };

        let result = AllocationResult::from_days(outcomes);
        debug_assert!(
            result.validate(input.plan_count()).is_ok(),
            "allocation broke an invariant: {:?}",
            result.validate(input.plan_count())
        );

        let stats = result.stats();
        info!(
            placed = stats.placed(),
            pinned = stats.pinned(),
            unallocated = stats.unallocated(),
            placed_minutes = %stats.placed_minutes(),
            rejected = input.rejected().len(),
            "Allocation finished"
        );
        result
    }

    /// Allocates a single date.
    #[instrument(level = "debug", skip_all, fields(
        date = %day.date(),
        windows = day.windows().len(),
        pinned = day.pinned().len(),
        pending = day.pending().len()
    ))]
    pub fn allocate_day(&self, day: &DayPlan) -> DayAllocation {
        let pins: Vec<(&PlanRequest, TimeWindow)> = day
            .pinned()
            .iter()
            .filter_map(|p| p.pinned().map(|slot| (p, slot)))
            .collect();
        let pinned_slots: Vec<TimeWindow> = pins.iter().map(|(_, slot)| *slot).collect();

        let mut occupancy = DayOccupancy::build(day.windows(), &pinned_slots);
        let free_before = occupancy.free_minutes();

        let mut allocated: Vec<AllocatedPlan> = pins
            .into_iter()
            .map(|(p, slot)| AllocatedPlan::pinned(p.clone(), slot))
            .collect();
        let mut unallocated: Vec<UnallocatedPlan> = Vec::new();

        let mut order: Vec<&PlanRequest> = day.pending().iter().collect();
        order.sort_by(|a, b| b.duration().cmp(&a.duration()));

        let limit = self.config.max_plans_per_day();
        for plan in order {
            if let Some(limit) = limit
                && allocated.len() >= limit
            {
                let reason = UnallocatedReason::DailyLimit { limit };
                debug!(plan = %plan.id(), %reason, "Unallocated");
                unallocated.push(UnallocatedPlan::new(plan.clone(), reason));
                continue;
            }
            match self.place(&mut occupancy, plan.duration()) {
                Some(slot) => {
                    debug!(plan = %plan.id(), %slot, "Placed");
                    allocated.push(AllocatedPlan::placed(plan.clone(), slot));
                }
                None => {
                    let reason = self.reason(&occupancy, plan.duration());
                    debug!(plan = %plan.id(), %reason, "Unallocated");
                    unallocated.push(UnallocatedPlan::new(plan.clone(), reason));
                }
            }
        }

        DayAllocation::new(
            day.date().clone(),
            day.window_source(),
            free_before,
            allocated,
            unallocated,
        )
    }

    fn required(&self, duration: Minutes) -> Minutes {
        duration.saturating_add(self.config.min_gap())
    }

    fn place(&self, occupancy: &mut DayOccupancy, duration: Minutes) -> Option<TimeWindow> {
        let candidate = self
            .config
            .strategy()
            .select(occupancy, self.required(duration))?;
        let slot = candidate.start().span_of(duration)?;
        occupancy.occupy(&candidate, slot);
        Some(slot)
    }

    fn reason(&self, occupancy: &DayOccupancy, duration: Minutes) -> UnallocatedReason {
        let required = self.required(duration);
        if occupancy.free_minutes().is_positive() {
            UnallocatedReason::InsufficientTime {
                required,
                largest_gap: occupancy.largest_free_gap(),
            }
        } else {
            UnallocatedReason::DayFull { required }
        }
    }
}

/// The `allocateTime` operation: normalize, allocate, and build the response.
///
/// Never fails. Rejected windows and pins are logged during normalization and
/// the rest of the request is allocated as usual.
pub fn allocate_time(request: &AllocateTimeRequest, config: &AllocatorConfig) -> AllocateTimeResponse {
    let input = normalize(request, config);
    TimeAllocator::new(*config).allocate(&input).to_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AllocatorConfigBuilder, strategy::PlacementStrategy};
    use study_alloc_core::{primitives::Interval, time::TimeOffset};
    use study_alloc_model::{
        day::WindowSource,
        dto::ScheduledPlanDto,
        id::{PlanDate, PlanId},
    };

    fn w(a: i32, b: i32) -> TimeWindow {
        Interval::new(TimeOffset::new(a), TimeOffset::new(b))
    }

    fn req(id: u64, minutes: i32) -> PlanRequest {
        PlanRequest::new(
            PlanId::new(id),
            PlanDate::from("2025-03-04"),
            Minutes::new(minutes),
            ScheduledPlanDto::new("2025-03-04", format!("c{id}")),
        )
    }

    fn day(windows: Vec<TimeWindow>, plans: Vec<PlanRequest>) -> DayPlan {
        let mut d = DayPlan::new(PlanDate::from("2025-03-04"), windows, WindowSource::Supplied);
        for p in plans {
            d.push(p);
        }
        d
    }

    fn slot_of(out: &DayAllocation, id: u64) -> Option<TimeWindow> {
        out.allocated()
            .iter()
            .find(|a| a.id() == PlanId::new(id))
            .map(AllocatedPlan::slot)
    }

    #[test]
    fn test_best_fit_decreasing_leaves_smallest_over() {
        // 60 and 90 minute windows; plans of 60, 90 and 30 minutes
        let d = day(
            vec![w(540, 600), w(660, 750)],
            vec![req(0, 60), req(1, 90), req(2, 30)],
        );
        let out = TimeAllocator::default().allocate_day(&d);
        assert_eq!(slot_of(&out, 1), Some(w(660, 750)));
        assert_eq!(slot_of(&out, 0), Some(w(540, 600)));
        assert_eq!(out.unallocated().len(), 1);
        assert_eq!(out.unallocated()[0].id(), PlanId::new(2));
        assert_eq!(
            out.unallocated()[0].reason(),
            UnallocatedReason::DayFull {
                required: Minutes::new(30)
            }
        );
    }

    #[test]
    fn test_pins_are_respected_and_reported() {
        let pinned = req(0, 30).pinned_at(w(600, 630));
        let d = day(vec![w(600, 720)], vec![pinned, req(1, 60), req(2, 60)]);
        let out = TimeAllocator::default().allocate_day(&d);
        assert_eq!(slot_of(&out, 0), Some(w(600, 630)));
        assert_eq!(slot_of(&out, 1), Some(w(630, 690)));
        assert_eq!(out.unallocated().len(), 1);
        assert_eq!(
            out.unallocated()[0].reason(),
            UnallocatedReason::InsufficientTime {
                required: Minutes::new(60),
                largest_gap: Minutes::new(30)
            }
        );
        assert_eq!(out.stats().pinned(), 1);
        assert_eq!(out.stats().placed(), 1);
        assert_eq!(out.stats().free_minutes(), Minutes::new(90));
    }

    #[test]
    fn test_equal_durations_keep_input_order() {
        let d = day(vec![w(600, 700)], vec![req(0, 30), req(1, 30), req(2, 30)]);
        let out = TimeAllocator::default().allocate_day(&d);
        assert_eq!(slot_of(&out, 0), Some(w(600, 630)));
        assert_eq!(slot_of(&out, 1), Some(w(630, 660)));
        assert_eq!(slot_of(&out, 2), Some(w(660, 690)));
    }

    #[test]
    fn test_spread_uses_largest_gap() {
        let config = AllocatorConfig::default().with_strategy(PlacementStrategy::Spread);
        let d = day(vec![w(540, 600), w(660, 840)], vec![req(0, 30)]);
        let out = TimeAllocator::new(config).allocate_day(&d);
        assert_eq!(slot_of(&out, 0), Some(w(660, 690)));
    }

    #[test]
    fn test_daily_limit_counts_pins_and_keeps_longest_plans() {
        let config = AllocatorConfigBuilder::new()
            .max_plans_per_day(Some(3))
            .build()
            .unwrap();
        let pinned = req(0, 30).pinned_at(w(600, 630));
        let d = day(
            vec![w(600, 900)],
            vec![pinned, req(1, 20), req(2, 60), req(3, 45)],
        );
        let out = TimeAllocator::new(config).allocate_day(&d);
        assert_eq!(out.allocated().len(), 3);
        assert_eq!(slot_of(&out, 2), Some(w(630, 690)));
        assert_eq!(slot_of(&out, 3), Some(w(690, 735)));
        assert_eq!(out.unallocated().len(), 1);
        assert_eq!(out.unallocated()[0].id(), PlanId::new(1));
        assert_eq!(
            out.unallocated()[0].reason(),
            UnallocatedReason::DailyLimit { limit: 3 }
        );
    }

    #[test]
    fn test_min_gap_requires_room_beyond_duration() {
        let config = AllocatorConfigBuilder::new()
            .min_gap(Minutes::new(15))
            .build()
            .unwrap();
        // 60 and 75 minute windows; a 60 minute plan needs 75 free minutes
        let d = day(vec![w(540, 600), w(660, 735)], vec![req(0, 60), req(1, 60)]);
        let out = TimeAllocator::new(config).allocate_day(&d);
        assert_eq!(slot_of(&out, 0), Some(w(660, 720)));
        assert_eq!(out.unallocated().len(), 1);
        assert_eq!(
            out.unallocated()[0].reason(),
            UnallocatedReason::InsufficientTime {
                required: Minutes::new(75),
                largest_gap: Minutes::new(60)
            }
        );
    }

    #[test]
    fn test_oversized_plan_is_never_shrunk() {
        let d = day(vec![w(540, 600)], vec![req(0, i32::MAX)]);
        let out = TimeAllocator::default().allocate_day(&d);
        assert!(out.allocated().is_empty());
        assert_eq!(
            out.unallocated()[0].reason(),
            UnallocatedReason::InsufficientTime {
                required: Minutes::new(i32::MAX),
                largest_gap: Minutes::new(60)
            }
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let request = AllocateTimeRequest::new(
            (0..40)
                .map(|i| {
                    ScheduledPlanDto::new(format!("2025-03-{:02}", 1 + i % 9), format!("c{i}"))
                        .with_duration(15 + (i * 7) % 50)
                })
                .collect(),
        )
        .with_ranges(
            "2025-03-02",
            vec![study_alloc_model::dto::TimeRangeDto::new("08:00", "09:30")],
        );
        let seq = allocate_time(&request, &AllocatorConfig::default());
        let par = allocate_time(&request, &AllocatorConfig::default().with_parallel(true));
        assert_eq!(seq, par);
    }
}
