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

mod config;
mod err;

pub use config::{InstanceGenConfig, InstanceGenConfigBuilder};
pub use err::{DurationBoundsError, InstanceGenConfigBuildError, ProbabilityOutOfRangeError};

use crate::{
    dto::{AllocateTimeRequest, ScheduledPlanDto, TimeRangeDto},
    id::PlanDate,
};
use chrono::Days;
use rand::{Rng, SeedableRng, seq::index};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use study_alloc_core::time::{Minutes, TimeOffset};

/// Produces reproducible `AllocateTimeRequest`s for benchmarks and the CLI.
pub struct InstanceGenerator {
    config: InstanceGenConfig,
    rng: ChaCha8Rng,
    duration_distribution: Option<Normal<f64>>,
}

impl From<InstanceGenConfig> for InstanceGenerator {
    fn from(config: InstanceGenConfig) -> Self {
        Self::new(config)
    }
}

impl InstanceGenerator {
    pub fn new(config: InstanceGenConfig) -> Self {
        let duration_distribution = Normal::new(
            config.duration_mean.value() as f64,
            config.duration_sigma,
        )
        .ok();
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed()),
            config,
            duration_distribution,
        }
    }

    #[inline]
    pub fn config(&self) -> &InstanceGenConfig {
        &self.config
    }

    pub fn generate(&mut self) -> AllocateTimeRequest {
        let mut request = AllocateTimeRequest::default();
        for offset in 0..self.config.days {
            let Some(date) = self
                .config
                .start_date
                .checked_add_days(Days::new(offset as u64))
            else {
                break;
            };
            let key = PlanDate::from(date).as_str().to_owned();
            if let Some(ranges) = self.sample_ranges() {
                request = request.with_ranges(key.clone(), ranges);
            }
            let count =
                self.sample_in(self.config.plans_per_day_min, self.config.plans_per_day_max);
            for _ in 0..count {
                let plan = self.sample_plan(&key);
                request.scheduled_plans.push(plan);
            }
        }

        for content in 0..self.config.content_pool {
            request.content_duration_map.insert(
                Self::content_id(content),
                self.config.duration_mean.value() as f64,
            );
        }
        request
    }

    /// `None` stands for a day the schedule generator sent no windows for.
    fn sample_ranges(&mut self) -> Option<Vec<TimeRangeDto>> {
        if self.rng.random_bool(self.config.no_windows_probability) {
            return None;
        }
        let ranges = self
            .sample_windows()
            .into_iter()
            .map(|(s, e)| TimeRangeDto::new(s.to_clock(), e.to_clock()))
            .collect();
        Some(ranges)
    }

    fn sample_plan(&mut self, date: &str) -> ScheduledPlanDto {
        let content = self.rng.random_range(0..self.config.content_pool);
        let duration = self.sample_duration();
        let mut plan = ScheduledPlanDto::new(date, Self::content_id(content));

        if !self.rng.random_bool(self.config.missing_duration_probability) {
            plan = plan.with_duration(duration.value());
        }
        if self.rng.random_bool(self.config.pinned_probability)
            && let Some((start, end)) = self.sample_pinned_slot(duration)
        {
            plan = plan.with_times(start.to_clock(), end.to_clock());
        }
        plan
    }

    /// Disjoint, non-touching windows on the grid, sorted by start.
    fn sample_windows(&mut self) -> Vec<(TimeOffset, TimeOffset)> {
        let points = self.grid_points();
        let wanted = self.sample_in(
            self.config.windows_per_day_min,
            self.config.windows_per_day_max,
        );
        let k = wanted.min(points.len() / 2);
        if k == 0 {
            return Vec::new();
        }

        let mut picked = index::sample(&mut self.rng, points.len(), 2 * k).into_vec();
        picked.sort_unstable();
        picked
            .chunks_exact(2)
            .map(|pair| (points[pair[0]], points[pair[1]]))
            .collect()
    }

    fn sample_pinned_slot(&mut self, duration: Minutes) -> Option<(TimeOffset, TimeOffset)> {
        let latest = self.config.day_end.checked_sub(duration)?;
        let candidates: Vec<TimeOffset> = self
            .grid_points()
            .into_iter()
            .filter(|p| *p <= latest)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let start = candidates[self.rng.random_range(0..candidates.len())];
        Some((start, start.checked_add(duration)?))
    }

    fn sample_duration(&mut self) -> Minutes {
        let raw = match &self.duration_distribution {
            Some(normal) => normal.sample(&mut self.rng),
            None => self.config.duration_mean.value() as f64,
        };
        let grid = self.config.grid.value() as f64;
        let rounded = ((raw / grid).round() * grid) as i32;
        Minutes::new(rounded).clamp(self.config.min_duration, self.config.max_duration)
    }

    fn grid_points(&self) -> Vec<TimeOffset> {
        let step = self.config.grid.value().max(1) as usize;
        (self.config.day_start.value()..=self.config.day_end.value())
            .step_by(step)
            .map(TimeOffset::new)
            .collect()
    }

    #[inline]
    fn sample_in(&mut self, min: usize, max: usize) -> usize {
        if min >= max {
            min
        } else {
            self.rng.random_range(min..=max)
        }
    }

    #[inline]
    fn content_id(index: usize) -> String {
        format!("content-{}", index)
    }
}
