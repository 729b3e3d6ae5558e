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

use crate::strategy::PlacementStrategy;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use study_alloc_core::{
    primitives::Interval,
    time::{Minutes, TimeOffset, TimeWindow},
};

/// Settings of a `TimeAllocator`.
///
/// Deserializes from a flat table, for example in TOML:
///
/// ```toml
/// default_duration = 45
/// strategy = "spread"
/// parallel = true
/// max_plans_per_day = 8
/// min_gap = 10
///
/// [default_window]
/// start = "08:30"
/// end = "10:00"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AllocatorConfigTable", into = "AllocatorConfigTable")]
pub struct AllocatorConfig {
    default_window: TimeWindow,
    default_duration: Minutes,
    strategy: PlacementStrategy,
    parallel: bool,
    max_plans_per_day: Option<usize>,
    min_gap: Minutes,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            default_window: Interval::new(TimeOffset::from_hm(9, 0), TimeOffset::from_hm(10, 0)),
            default_duration: Minutes::new(60),
            strategy: PlacementStrategy::BestFit,
            parallel: false,
            max_plans_per_day: None,
            min_gap: Minutes::new(0),
        }
    }
}

impl AllocatorConfig {
    /// The window used for dates that come without usable windows.
    #[inline]
    pub fn default_window(&self) -> TimeWindow {
        self.default_window
    }

    /// The duration given to plans without a usable estimate.
    #[inline]
    pub fn default_duration(&self) -> Minutes {
        self.default_duration
    }

    #[inline]
    pub fn strategy(&self) -> PlacementStrategy {
        self.strategy
    }

    #[inline]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Upper bound on the plans of one date, pinned plans included.
    /// `None` places as many as fit.
    #[inline]
    pub fn max_plans_per_day(&self) -> Option<usize> {
        self.max_plans_per_day
    }

    /// Free time a gap must offer beyond a plan's duration. The plan still
    /// starts at the gap's start.
    #[inline]
    pub fn min_gap(&self) -> Minutes {
        self.min_gap
    }

    #[inline]
    pub fn with_strategy(mut self, strategy: PlacementStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[inline]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Display for AllocatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AllocatorConfig {{ default_window: {}-{}, default_duration: {}, strategy: {}, parallel: {}, max_plans_per_day: {:?}, min_gap: {} }}",
            self.default_window.start(),
            self.default_window.end(),
            self.default_duration,
            self.strategy,
            self.parallel,
            self.max_plans_per_day,
            self.min_gap
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocatorConfigBuildError {
    EmptyDefaultWindow { start: TimeOffset, end: TimeOffset },
    NonPositiveDefaultDuration(Minutes),
    NegativeMinGap(Minutes),
    ZeroDailyLimit,
}

impl Display for AllocatorConfigBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use AllocatorConfigBuildError::*;
        match self {
            EmptyDefaultWindow { start, end } => write!(
                f,
                "Default window {}-{} is empty; start must be before end",
                start, end
            ),
            NonPositiveDefaultDuration(d) => {
                write!(f, "Default duration {} must be positive", d)
            }
            NegativeMinGap(g) => write!(f, "Minimum gap {} must not be negative", g),
            ZeroDailyLimit => f.write_str("Daily plan limit must be at least 1"),
        }
    }
}

impl std::error::Error for AllocatorConfigBuildError {}

/// Builder for `AllocatorConfig`.
#[derive(Debug, Clone)]
pub struct AllocatorConfigBuilder {
    default_window_start: TimeOffset,
    default_window_end: TimeOffset,
    default_duration: Minutes,
    strategy: PlacementStrategy,
    parallel: bool,
    max_plans_per_day: Option<usize>,
    min_gap: Minutes,
}

impl Default for AllocatorConfigBuilder {
    fn default() -> Self {
        let d = AllocatorConfig::default();
        Self {
            default_window_start: d.default_window.start(),
            default_window_end: d.default_window.end(),
            default_duration: d.default_duration,
            strategy: d.strategy,
            parallel: d.parallel,
            max_plans_per_day: d.max_plans_per_day,
            min_gap: d.min_gap,
        }
    }
}

impl AllocatorConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn default_window(mut self, start: TimeOffset, end: TimeOffset) -> Self {
        self.default_window_start = start;
        self.default_window_end = end;
        self
    }

    #[inline]
    pub fn default_duration(mut self, v: Minutes) -> Self {
        self.default_duration = v;
        self
    }

    #[inline]
    pub fn strategy(mut self, v: PlacementStrategy) -> Self {
        self.strategy = v;
        self
    }

    #[inline]
    pub fn parallel(mut self, v: bool) -> Self {
        self.parallel = v;
        self
    }

    #[inline]
    pub fn max_plans_per_day(mut self, v: Option<usize>) -> Self {
        self.max_plans_per_day = v;
        self
    }

    #[inline]
    pub fn min_gap(mut self, v: Minutes) -> Self {
        self.min_gap = v;
        self
    }

    pub fn build(self) -> Result<AllocatorConfig, AllocatorConfigBuildError> {
        let default_window = Interval::try_new(self.default_window_start, self.default_window_end)
            .map_err(|e| AllocatorConfigBuildError::EmptyDefaultWindow {
                start: e.start(),
                end: e.end(),
            })?;
        if !self.default_duration.is_positive() {
            return Err(AllocatorConfigBuildError::NonPositiveDefaultDuration(
                self.default_duration,
            ));
        }
        if self.min_gap.value() < 0 {
            return Err(AllocatorConfigBuildError::NegativeMinGap(self.min_gap));
        }
        if self.max_plans_per_day == Some(0) {
            return Err(AllocatorConfigBuildError::ZeroDailyLimit);
        }
        Ok(AllocatorConfig {
            default_window,
            default_duration: self.default_duration,
            strategy: self.strategy,
            parallel: self.parallel,
            max_plans_per_day: self.max_plans_per_day,
            min_gap: self.min_gap,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WindowTable {
    start: TimeOffset,
    end: TimeOffset,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct AllocatorConfigTable {
    default_window: WindowTable,
    default_duration: Minutes,
    strategy: PlacementStrategy,
    parallel: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_plans_per_day: Option<usize>,
    min_gap: Minutes,
}

impl Default for AllocatorConfigTable {
    fn default() -> Self {
        AllocatorConfig::default().into()
    }
}

impl From<AllocatorConfig> for AllocatorConfigTable {
    fn from(c: AllocatorConfig) -> Self {
        Self {
            default_window: WindowTable {
                start: c.default_window.start(),
                end: c.default_window.end(),
            },
            default_duration: c.default_duration,
            strategy: c.strategy,
            parallel: c.parallel,
            max_plans_per_day: c.max_plans_per_day,
            min_gap: c.min_gap,
        }
    }
}

impl TryFrom<AllocatorConfigTable> for AllocatorConfig {
    type Error = AllocatorConfigBuildError;

    fn try_from(t: AllocatorConfigTable) -> Result<Self, Self::Error> {
        AllocatorConfigBuilder::new()
            .default_window(t.default_window.start, t.default_window.end)
            .default_duration(t.default_duration)
            .strategy(t.strategy)
            .parallel(t.parallel)
            .max_plans_per_day(t.max_plans_per_day)
            .min_gap(t.min_gap)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_nine_to_ten_and_sixty_minutes() {
        let c = AllocatorConfig::default();
        assert_eq!(c.default_window().start().to_clock(), "09:00");
        assert_eq!(c.default_window().end().to_clock(), "10:00");
        assert_eq!(c.default_duration(), Minutes::new(60));
        assert_eq!(c.strategy(), PlacementStrategy::BestFit);
        assert!(!c.parallel());
        assert_eq!(c.max_plans_per_day(), None);
        assert_eq!(c.min_gap(), Minutes::new(0));
        assert_eq!(AllocatorConfigBuilder::new().build(), Ok(c));
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        let err = AllocatorConfigBuilder::new()
            .default_window(TimeOffset::from_hm(10, 0), TimeOffset::from_hm(10, 0))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            AllocatorConfigBuildError::EmptyDefaultWindow { .. }
        ));

        let err = AllocatorConfigBuilder::new()
            .default_duration(Minutes::new(0))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            AllocatorConfigBuildError::NonPositiveDefaultDuration(Minutes::new(0))
        );

        let err = AllocatorConfigBuilder::new()
            .min_gap(Minutes::new(-5))
            .build()
            .unwrap_err();
        assert_eq!(err, AllocatorConfigBuildError::NegativeMinGap(Minutes::new(-5)));

        let err = AllocatorConfigBuilder::new()
            .max_plans_per_day(Some(0))
            .build()
            .unwrap_err();
        assert_eq!(err, AllocatorConfigBuildError::ZeroDailyLimit);
    }

    #[test]
    fn test_deserialize_placement_limits() {
        let c: AllocatorConfig =
            serde_json::from_str(r#"{"max_plans_per_day": 4, "min_gap": 15}"#).unwrap();
        assert_eq!(c.max_plans_per_day(), Some(4));
        assert_eq!(c.min_gap(), Minutes::new(15));
        let r: Result<AllocatorConfig, _> = serde_json::from_str(r#"{"max_plans_per_day": 0}"#);
        assert!(r.is_err());
    }

    #[test]
    fn test_deserialize_partial_table() {
        let c: AllocatorConfig =
            serde_json::from_str(r#"{"strategy": "spread", "default_window": {"start": "08:30", "end": "10:00"}}"#)
                .unwrap();
        assert_eq!(c.strategy(), PlacementStrategy::Spread);
        assert_eq!(c.default_window().start(), TimeOffset::from_hm(8, 30));
        assert_eq!(c.default_duration(), Minutes::new(60));
    }

    #[test]
    fn test_deserialize_rejects_inverted_window() {
        let r: Result<AllocatorConfig, _> = serde_json::from_str(
            r#"{"default_window": {"start": "11:00", "end": "10:00"}}"#,
        );
        assert!(r.is_err());
    }

    #[test]
    fn test_serialize_round_trips() {
        let c = AllocatorConfigBuilder::new()
            .strategy(PlacementStrategy::FirstFit)
            .max_plans_per_day(Some(6))
            .min_gap(Minutes::new(10))
            .build()
            .unwrap();
        let json = serde_json::to_string(&c).unwrap();
        let back: AllocatorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
