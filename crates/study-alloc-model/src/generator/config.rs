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

use std::fmt::Display;

use super::err::{DurationBoundsError, InstanceGenConfigBuildError, ProbabilityOutOfRangeError};
use chrono::NaiveDate;
use rand::Rng;
use study_alloc_core::time::{Minutes, TimeOffset};

/// Configuration for synthetic allocation requests.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceGenConfig {
    pub(crate) days: usize,
    pub(crate) start_date: NaiveDate,

    pub(crate) plans_per_day_min: usize,
    pub(crate) plans_per_day_max: usize,
    pub(crate) windows_per_day_min: usize,
    pub(crate) windows_per_day_max: usize,

    pub(crate) day_start: TimeOffset,
    pub(crate) day_end: TimeOffset,
    pub(crate) grid: Minutes,

    pub(crate) duration_mean: Minutes,
    pub(crate) duration_sigma: f64,
    pub(crate) min_duration: Minutes,
    pub(crate) max_duration: Minutes,

    pub(crate) content_pool: usize,
    pub(crate) pinned_probability: f64,
    pub(crate) no_windows_probability: f64,
    pub(crate) missing_duration_probability: f64,

    pub(crate) seed: u64,
}

impl Default for InstanceGenConfig {
    fn default() -> Self {
        Self {
            days: 7,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap_or_default(),
            plans_per_day_min: 2,
            plans_per_day_max: 6,
            windows_per_day_min: 1,
            windows_per_day_max: 3,
            day_start: TimeOffset::from_hm(8, 0),
            day_end: TimeOffset::from_hm(22, 0),
            grid: Minutes::new(5),
            duration_mean: Minutes::new(60),
            duration_sigma: 25.0,
            min_duration: Minutes::new(15),
            max_duration: Minutes::new(180),
            content_pool: 12,
            pinned_probability: 0.1,
            no_windows_probability: 0.1,
            missing_duration_probability: 0.05,
            seed: 42,
        }
    }
}

impl InstanceGenConfig {
    #[inline]
    pub fn days(&self) -> usize {
        self.days
    }
    #[inline]
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }
    #[inline]
    pub fn plans_per_day(&self) -> (usize, usize) {
        (self.plans_per_day_min, self.plans_per_day_max)
    }
    #[inline]
    pub fn windows_per_day(&self) -> (usize, usize) {
        (self.windows_per_day_min, self.windows_per_day_max)
    }
    #[inline]
    pub fn day_start(&self) -> TimeOffset {
        self.day_start
    }
    #[inline]
    pub fn day_end(&self) -> TimeOffset {
        self.day_end
    }
    #[inline]
    pub fn grid(&self) -> Minutes {
        self.grid
    }
    #[inline]
    pub fn duration_mean(&self) -> Minutes {
        self.duration_mean
    }
    #[inline]
    pub fn duration_sigma(&self) -> f64 {
        self.duration_sigma
    }
    #[inline]
    pub fn min_duration(&self) -> Minutes {
        self.min_duration
    }
    #[inline]
    pub fn max_duration(&self) -> Minutes {
        self.max_duration
    }
    #[inline]
    pub fn content_pool(&self) -> usize {
        self.content_pool
    }
    #[inline]
    pub fn pinned_probability(&self) -> f64 {
        self.pinned_probability
    }
    #[inline]
    pub fn no_windows_probability(&self) -> f64 {
        self.no_windows_probability
    }
    #[inline]
    pub fn missing_duration_probability(&self) -> f64 {
        self.missing_duration_probability
    }
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Display for InstanceGenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "InstanceGenConfig {{ \
             days: {}, start_date: {}, plans_per_day: {}..={}, windows_per_day: {}..={}, \
             day: {}-{}, grid: {}, duration_mean: {}, duration_sigma: {:.2}, \
             duration: {}..={}, content_pool: {}, pinned_probability: {:.3}, \
             no_windows_probability: {:.3}, missing_duration_probability: {:.3}, seed: {} \
             }}",
            self.days,
            self.start_date,
            self.plans_per_day_min,
            self.plans_per_day_max,
            self.windows_per_day_min,
            self.windows_per_day_max,
            self.day_start,
            self.day_end,
            self.grid,
            self.duration_mean,
            self.duration_sigma,
            self.min_duration,
            self.max_duration,
            self.content_pool,
            self.pinned_probability,
            self.no_windows_probability,
            self.missing_duration_probability,
            self.seed
        )
    }
}

/// Builder for `InstanceGenConfig`.
pub struct InstanceGenConfigBuilder {
    // Required
    days: Option<usize>,

    // Optional with defaults
    start_date: NaiveDate,
    plans_per_day_min: usize,
    plans_per_day_max: usize,
    windows_per_day_min: usize,
    windows_per_day_max: usize,
    day_start: TimeOffset,
    day_end: TimeOffset,
    grid: Minutes,
    duration_mean: Minutes,
    duration_sigma: f64,
    min_duration: Minutes,
    max_duration: Minutes,
    content_pool: usize,
    pinned_probability: f64,
    no_windows_probability: f64,
    missing_duration_probability: f64,
    seed: u64,
}

impl Default for InstanceGenConfigBuilder {
    fn default() -> Self {
        let d = InstanceGenConfig::default();
        Self {
            days: None,
            start_date: d.start_date,
            plans_per_day_min: d.plans_per_day_min,
            plans_per_day_max: d.plans_per_day_max,
            windows_per_day_min: d.windows_per_day_min,
            windows_per_day_max: d.windows_per_day_max,
            day_start: d.day_start,
            day_end: d.day_end,
            grid: d.grid,
            duration_mean: d.duration_mean,
            duration_sigma: d.duration_sigma,
            min_duration: d.min_duration,
            max_duration: d.max_duration,
            content_pool: d.content_pool,
            pinned_probability: d.pinned_probability,
            no_windows_probability: d.no_windows_probability,
            missing_duration_probability: d.missing_duration_probability,
            seed: rand::rng().random(),
        }
    }
}

impl InstanceGenConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn days(mut self, v: usize) -> Self {
        self.days = Some(v);
        self
    }
    #[inline]
    pub fn start_date(mut self, v: NaiveDate) -> Self {
        self.start_date = v;
        self
    }

    pub fn plans_per_day(mut self, min: usize, max: usize) -> Self {
        self.plans_per_day_min = min;
        self.plans_per_day_max = max.max(min);
        self
    }
    pub fn windows_per_day(mut self, min: usize, max: usize) -> Self {
        self.windows_per_day_min = min;
        self.windows_per_day_max = max.max(min);
        self
    }

    #[inline]
    pub fn day_bounds(mut self, start: TimeOffset, end: TimeOffset) -> Self {
        self.day_start = start;
        self.day_end = end;
        self
    }
    #[inline]
    pub fn grid(mut self, v: Minutes) -> Self {
        self.grid = v;
        self
    }
    #[inline]
    pub fn duration_mean(mut self, v: Minutes) -> Self {
        self.duration_mean = v;
        self
    }
    #[inline]
    pub fn duration_sigma(mut self, v: f64) -> Self {
        self.duration_sigma = v;
        self
    }
    #[inline]
    pub fn duration_bounds(mut self, min: Minutes, max: Minutes) -> Self {
        self.min_duration = min;
        self.max_duration = max;
        self
    }
    #[inline]
    pub fn content_pool(mut self, v: usize) -> Self {
        self.content_pool = v;
        self
    }
    #[inline]
    pub fn pinned_probability(mut self, v: f64) -> Self {
        self.pinned_probability = v;
        self
    }
    #[inline]
    pub fn no_windows_probability(mut self, v: f64) -> Self {
        self.no_windows_probability = v;
        self
    }
    #[inline]
    pub fn missing_duration_probability(mut self, v: f64) -> Self {
        self.missing_duration_probability = v;
        self
    }
    pub fn random_seed(mut self) -> Self {
        self.seed = rand::rng().random();
        self
    }
    #[inline]
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    pub fn build(self) -> Result<InstanceGenConfig, InstanceGenConfigBuildError> {
        use InstanceGenConfigBuildError::*;
        let days = self.days.ok_or(MissingDays)?;

        if self.day_start >= self.day_end {
            return Err(EmptyDay {
                start: self.day_start,
                end: self.day_end,
            });
        }
        if !self.grid.is_positive() {
            return Err(NonPositiveGrid(self.grid));
        }
        if !self.min_duration.is_positive() || self.min_duration > self.max_duration {
            return Err(DurationBoundsError::new(self.min_duration, self.max_duration).into());
        }
        if !self.duration_sigma.is_finite() || self.duration_sigma < 0.0 {
            return Err(InvalidSigma(self.duration_sigma));
        }
        if self.content_pool == 0 {
            return Err(EmptyContentPool);
        }
        for (name, p) in [
            ("pinned_probability", self.pinned_probability),
            ("no_windows_probability", self.no_windows_probability),
            (
                "missing_duration_probability",
                self.missing_duration_probability,
            ),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ProbabilityOutOfRangeError::new(name, p).into());
            }
        }

        Ok(InstanceGenConfig {
            days,
            start_date: self.start_date,
            plans_per_day_min: self.plans_per_day_min,
            plans_per_day_max: self.plans_per_day_max,
            windows_per_day_min: self.windows_per_day_min,
            windows_per_day_max: self.windows_per_day_max,
            day_start: self.day_start,
            day_end: self.day_end,
            grid: self.grid,
            duration_mean: self.duration_mean,
            duration_sigma: self.duration_sigma,
            min_duration: self.min_duration,
            max_duration: self.max_duration,
            content_pool: self.content_pool,
            pinned_probability: self.pinned_probability,
            no_windows_probability: self.no_windows_probability,
            missing_duration_probability: self.missing_duration_probability,
            seed: self.seed,
        })
    }
}
