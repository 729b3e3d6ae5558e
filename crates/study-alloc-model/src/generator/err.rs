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

use study_alloc_core::time::{Minutes, TimeOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationBoundsError {
    min: Minutes,
    max: Minutes,
}

impl DurationBoundsError {
    pub fn new(min: Minutes, max: Minutes) -> Self {
        Self { min, max }
    }
    pub fn min(&self) -> Minutes {
        self.min
    }
    pub fn max(&self) -> Minutes {
        self.max
    }
}

impl Display for DurationBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DurationBoundsError: min duration {} must be positive and at most max duration {}",
            self.min, self.max
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityOutOfRangeError {
    name: &'static str,
    value: f64,
}

impl ProbabilityOutOfRangeError {
    pub fn new(name: &'static str, value: f64) -> Self {
        Self { name, value }
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Display for ProbabilityOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ProbabilityOutOfRangeError: {} = {} is not within [0, 1]",
            self.name, self.value
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstanceGenConfigBuildError {
    DurationBounds(DurationBoundsError),
    ProbabilityOutOfRange(ProbabilityOutOfRangeError),
    MissingDays,
    EmptyDay { start: TimeOffset, end: TimeOffset },
    NonPositiveGrid(Minutes),
    InvalidSigma(f64),
    EmptyContentPool,
}

impl Display for InstanceGenConfigBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use InstanceGenConfigBuildError::*;
        match self {
            DurationBounds(e) => write!(f, "{}", e),
            ProbabilityOutOfRange(e) => write!(f, "{}", e),
            MissingDays => write!(f, "Missing days"),
            EmptyDay { start, end } => {
                write!(f, "Day bounds {}-{} leave no time", start, end)
            }
            NonPositiveGrid(g) => write!(f, "Grid {} must be positive", g),
            InvalidSigma(s) => write!(f, "Duration sigma {} must be finite and >= 0", s),
            EmptyContentPool => write!(f, "Content pool must not be empty"),
        }
    }
}

impl From<DurationBoundsError> for InstanceGenConfigBuildError {
    fn from(err: DurationBoundsError) -> Self {
        Self::DurationBounds(err)
    }
}

impl From<ProbabilityOutOfRangeError> for InstanceGenConfigBuildError {
    fn from(err: ProbabilityOutOfRangeError) -> Self {
        Self::ProbabilityOutOfRange(err)
    }
}

impl std::error::Error for InstanceGenConfigBuildError {}
