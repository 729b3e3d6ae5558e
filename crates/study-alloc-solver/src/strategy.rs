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

use crate::occupancy::{DayOccupancy, GapCandidate};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use study_alloc_core::time::Minutes;

/// How a gap is picked for a plan among all gaps of a day.
///
/// Plans are always placed at the start of the chosen gap, and always in order
/// of decreasing duration; strategies only differ in which gap they pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementStrategy {
    /// Smallest gap that still fits. Ties go to the earlier window, then the
    /// earlier start.
    #[default]
    BestFit,
    /// Earliest fitting gap in window order.
    FirstFit,
    /// Largest fitting gap, which spreads plans over the day. Plans keep the
    /// date they were scheduled on, so spreading happens within that date.
    Spread,
}

impl PlacementStrategy {
    pub const ALL: [PlacementStrategy; 3] = [
        PlacementStrategy::BestFit,
        PlacementStrategy::FirstFit,
        PlacementStrategy::Spread,
    ];

    pub fn select(&self, day: &DayOccupancy, required: Minutes) -> Option<GapCandidate> {
        let mut fitting = day.candidates().filter(|c| c.fits(required));
        match self {
            PlacementStrategy::FirstFit => fitting.next(),
            PlacementStrategy::BestFit => fitting.fold(None, |best, c| match best {
                Some(b) if b.size() <= c.size() => Some(b),
                _ => Some(c),
            }),
            PlacementStrategy::Spread => fitting.fold(None, |best, c| match best {
                Some(b) if b.size() >= c.size() => Some(b),
                _ => Some(c),
            }),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            PlacementStrategy::BestFit => "best-fit",
            PlacementStrategy::FirstFit => "first-fit",
            PlacementStrategy::Spread => "spread",
        }
    }
}

impl Display for PlacementStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategyError(String);

impl UnknownStrategyError {
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl Display for UnknownStrategyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown placement strategy {:?}; expected best-fit, first-fit or spread",
            self.0
        )
    }
}

impl std::error::Error for UnknownStrategyError {}

impl FromStr for PlacementStrategy {
    type Err = UnknownStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "best-fit" | "bestfit" => Ok(PlacementStrategy::BestFit),
            "first-fit" | "firstfit" => Ok(PlacementStrategy::FirstFit),
            "spread" => Ok(PlacementStrategy::Spread),
            _ => Err(UnknownStrategyError(s.to_owned())),
        }
    }
}
