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

use chrono::NaiveDate;
use std::fmt::Display;

/// Position of a plan in the caller's input list.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlanId(u64);

impl PlanId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        PlanId(id)
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PlanId({})", self.0)
    }
}

impl From<u64> for PlanId {
    fn from(value: u64) -> Self {
        PlanId(value)
    }
}

impl From<usize> for PlanId {
    fn from(value: usize) -> Self {
        PlanId(value as u64)
    }
}

/// The calendar day a plan belongs to, keyed by its `YYYY-MM-DD` string.
///
/// Plans and windows are matched by the raw key, so a malformed date still
/// groups its plans together; it simply never matches any supplied windows.
/// ISO keys order chronologically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlanDate(String);

impl PlanDate {
    pub const FORMAT: &'static str = "%Y-%m-%d";

    #[inline]
    pub fn new(raw: impl Into<String>) -> Self {
        PlanDate(raw.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the key as a calendar date, if it is one.
    #[inline]
    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.0.trim(), Self::FORMAT).ok()
    }

    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.to_naive().is_some()
    }
}

impl From<NaiveDate> for PlanDate {
    fn from(value: NaiveDate) -> Self {
        PlanDate(value.format(Self::FORMAT).to_string())
    }
}

impl From<&str> for PlanDate {
    fn from(value: &str) -> Self {
        PlanDate(value.to_owned())
    }
}

impl Display for PlanDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
