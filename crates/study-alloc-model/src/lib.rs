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

//! # Study Allocation Model (`study-alloc-model`)
//!
//! The data model of the study time allocator. It builds on the time
//! primitives of `study-alloc-core` to describe what comes in, how it is
//! grouped, and what goes out.
//!
//! ## Key Data Structures
//!
//! - **`ScheduledPlanDto` / `AllocateTimeRequest` / `AllocateTimeResponse`**: the
//!   JSON wire shapes. Plan records are kept whole so unknown fields survive a
//!   round trip through the allocator.
//!
//! - **`PlanRequest`**: one normalized plan with its effective duration and,
//!   when it already has a time, its pinned slot.
//!
//! - **`DayPlan` / `AllocationInput`**: plans and free windows grouped by date,
//!   in date order.
//!
//! - **`AllocationResult`**: the partition of all plans into `AllocatedPlan`s
//!   and `UnallocatedPlan`s, with `AllocationStats` and a `validate` check of
//!   the no-overlap and conservation invariants.
//!
//! - **`InstanceGenerator`**: seeded synthetic requests for benchmarks and the
//!   command line.

pub mod day;
pub mod dto;
pub mod err;
pub mod generator;
pub mod id;
pub mod plan;
pub mod result;

pub mod prelude {
    pub use crate::day::{AllocationInput, DayPlan, FreeWindow, WindowSource};
    pub use crate::dto::{
        AllocateTimeRequest, AllocateTimeResponse, AllocationData, ScheduledPlanDto, TimeRangeDto,
    };
    pub use crate::err::{
        InputError, InvalidPinnedIntervalError, InvalidWindowError, PartitionMismatchError,
        ResultValidationError, SlotOverlapError,
    };
    pub use crate::id::{PlanDate, PlanId};
    pub use crate::plan::PlanRequest;
    pub use crate::result::{
        AllocatedPlan, AllocationResult, AllocationStats, DayAllocation, SlotOrigin,
        UnallocatedPlan, UnallocatedReason,
    };
}
