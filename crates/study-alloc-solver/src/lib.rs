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

//! # Study Allocation Solver (`study-alloc-solver`)
//!
//! Places study plans into the free windows of their date.
//!
//! - [`intervalset::IntervalSet`] keeps the occupied time of one window as a
//!   sorted run of merged intervals and answers gap queries.
//! - [`occupancy`] holds the windows of one date.
//! - [`normalize`] cleans the wire request (default durations, default
//!   window, dropped malformed entries).
//! - [`allocator::TimeAllocator`] runs Best-Fit Decreasing per date, or one of
//!   the other [`strategy::PlacementStrategy`] variants.
//!
//! ```
//! use study_alloc_model::dto::{AllocateTimeRequest, ScheduledPlanDto};
//! use study_alloc_solver::{allocate_time, config::AllocatorConfig};
//!
//! let request = AllocateTimeRequest::new(vec![ScheduledPlanDto::new("2025-03-04", "algebra")]);
//! let response = allocate_time(&request, &AllocatorConfig::default());
//! let plan = &response.data.allocated_plans[0];
//! assert_eq!(plan.start_time.as_deref(), Some("09:00"));
//! assert_eq!(plan.end_time.as_deref(), Some("10:00"));
//! ```

pub mod allocator;
pub mod config;
pub mod intervalset;
pub mod normalize;
pub mod occupancy;
pub mod strategy;

pub use allocator::{TimeAllocator, allocate_time};

pub mod prelude {
    pub use crate::allocator::{TimeAllocator, allocate_time};
    pub use crate::config::{AllocatorConfig, AllocatorConfigBuildError, AllocatorConfigBuilder};
    pub use crate::intervalset::IntervalSet;
    pub use crate::normalize::normalize;
    pub use crate::occupancy::{DayOccupancy, GapCandidate, WindowOccupancy};
    pub use crate::strategy::PlacementStrategy;
}
