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

use crate::id::{PlanDate, PlanId};
use std::fmt::Display;
use study_alloc_core::time::{TimeOffset, TimeWindow};

/// Two plans on the same date hold intersecting slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotOverlapError {
    date: PlanDate,
    first: (PlanId, TimeWindow),
    second: (PlanId, TimeWindow),
}

impl SlotOverlapError {
    #[inline]
    pub fn new(date: PlanDate, first: (PlanId, TimeWindow), second: (PlanId, TimeWindow)) -> Self {
        Self {
            date,
            first,
            second,
        }
    }

    #[inline]
    pub fn date(&self) -> &PlanDate {
        &self.date
    }

    #[inline]
    pub fn first(&self) -> (PlanId, TimeWindow) {
        self.first
    }

    #[inline]
    pub fn second(&self) -> (PlanId, TimeWindow) {
        self.second
    }
}

impl Display for SlotOverlapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "On {} plan {} at {} overlaps plan {} at {}",
            self.date, self.first.0, self.first.1, self.second.0, self.second.1
        )
    }
}

impl std::error::Error for SlotOverlapError {}

/// A result does not partition its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartitionMismatchError {
    expected: usize,
    actual: usize,
}

impl PartitionMismatchError {
    #[inline]
    pub fn new(expected: usize, actual: usize) -> Self {
        Self { expected, actual }
    }

    #[inline]
    pub fn expected(&self) -> usize {
        self.expected
    }

    #[inline]
    pub fn actual(&self) -> usize {
        self.actual
    }
}

impl Display for PartitionMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Expected {} plans across allocated and unallocated, found {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for PartitionMismatchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultValidationError {
    PartitionMismatch(PartitionMismatchError),
    DuplicatePlan(PlanId),
    Overlap(SlotOverlapError),
}

impl Display for ResultValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultValidationError::PartitionMismatch(e) => write!(f, "{}", e),
            ResultValidationError::DuplicatePlan(id) => {
                write!(f, "Plan {} appears more than once in the result", id)
            }
            ResultValidationError::Overlap(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ResultValidationError {}

impl From<PartitionMismatchError> for ResultValidationError {
    fn from(e: PartitionMismatchError) -> Self {
        ResultValidationError::PartitionMismatch(e)
    }
}

impl From<SlotOverlapError> for ResultValidationError {
    fn from(e: SlotOverlapError) -> Self {
        ResultValidationError::Overlap(e)
    }
}

/// A supplied window whose start is not before its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidWindowError {
    date: PlanDate,
    start: TimeOffset,
    end: TimeOffset,
}

impl InvalidWindowError {
    pub fn new(date: PlanDate, start: TimeOffset, end: TimeOffset) -> Self {
        Self { date, start, end }
    }

    pub fn date(&self) -> &PlanDate {
        &self.date
    }

    pub fn start(&self) -> TimeOffset {
        self.start
    }

    pub fn end(&self) -> TimeOffset {
        self.end
    }
}

impl Display for InvalidWindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Window {}-{} on {} is empty or inverted",
            self.start, self.end, self.date
        )
    }
}

impl std::error::Error for InvalidWindowError {}

/// A pinned plan whose resolved end is not after its start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPinnedIntervalError {
    plan: PlanId,
    start: TimeOffset,
    end: TimeOffset,
}

impl InvalidPinnedIntervalError {
    pub fn new(plan: PlanId, start: TimeOffset, end: TimeOffset) -> Self {
        Self { plan, start, end }
    }

    pub fn plan(&self) -> PlanId {
        self.plan
    }

    pub fn start(&self) -> TimeOffset {
        self.start
    }

    pub fn end(&self) -> TimeOffset {
        self.end
    }
}

impl Display for InvalidPinnedIntervalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Plan {} is pinned to {}-{}, which is empty or inverted",
            self.plan, self.start, self.end
        )
    }
}

impl std::error::Error for InvalidPinnedIntervalError {}

/// A piece of the request that was rejected while normalizing it.
///
/// Rejections never abort a run; they are collected on the
/// [`AllocationInput`](crate::day::AllocationInput) next to the clean data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    InvalidWindow(InvalidWindowError),
    InvalidPinnedInterval(InvalidPinnedIntervalError),
}

impl Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::InvalidWindow(e) => write!(f, "{}", e),
            InputError::InvalidPinnedInterval(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for InputError {}

impl From<InvalidWindowError> for InputError {
    fn from(e: InvalidWindowError) -> Self {
        InputError::InvalidWindow(e)
    }
}

impl From<InvalidPinnedIntervalError> for InputError {
    fn from(e: InvalidPinnedIntervalError) -> Self {
        InputError::InvalidPinnedInterval(e)
    }
}
