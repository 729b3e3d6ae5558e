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

//! # Time-of-Day Types
//!
//! Everything the allocator computes happens on plain integer minutes. Clock
//! strings only appear at the edges, where they are parsed into a
//! [`TimeOffset`] and formatted back.
//!
//! - `TimeOffset`: minutes since local midnight (`"10:30"` is `630`).
//! - `Minutes`: a duration, or the difference between two offsets.
//! - `TimeWindow`: a half-open `[start, end)` range of offsets.
//!
//! The newtypes keep offsets and durations apart at compile time, so adding
//! two offsets does not type-check. Offsets outside `0..1440` are allowed and
//! never wrap around midnight.

use crate::primitives::Interval;
use num_traits::{CheckedAdd, CheckedSub, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{
    fmt::{self, Display},
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

pub const MINUTES_PER_HOUR: i32 = 60;
pub const MINUTES_PER_DAY: i32 = 24 * MINUTES_PER_HOUR;

/// A point in a day, as minutes since local midnight.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TimeOffset(i32);

/// A span of time in whole minutes.
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Minutes(i32);

pub type TimeWindow = Interval<TimeOffset>;

impl TimeOffset {
    #[inline]
    pub const fn new(minutes: i32) -> Self {
        TimeOffset(minutes)
    }

    /// Builds an offset from an hour and minute, e.g. `from_hm(9, 30)` is `570`.
    #[inline]
    pub const fn from_hm(hours: i32, minutes: i32) -> Self {
        TimeOffset(hours * MINUTES_PER_HOUR + minutes)
    }

    #[inline]
    pub const fn midnight() -> Self {
        TimeOffset(0)
    }

    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Parses an `"HH:MM"` clock string. See [`FromStr`] for the accepted forms.
    #[inline]
    pub fn parse_clock(input: &str) -> Result<Self, ClockParseError> {
        input.parse()
    }

    /// Formats the offset as a zero-padded `"HH:MM"` string.
    ///
    /// ```
    /// use study_alloc_core::time::TimeOffset;
    ///
    /// assert_eq!(TimeOffset::new(540).to_clock(), "09:00");
    /// assert_eq!(TimeOffset::new(1530).to_clock(), "25:30");
    /// ```
    #[inline]
    pub fn to_clock(self) -> String {
        self.to_string()
    }

    #[inline]
    pub fn checked_add(self, delta: Minutes) -> Option<Self> {
        self.0.checked_add(delta.0).map(TimeOffset)
    }

    #[inline]
    pub fn checked_sub(self, delta: Minutes) -> Option<Self> {
        self.0.checked_sub(delta.0).map(TimeOffset)
    }

    #[inline]
    pub fn saturating_add(self, delta: Minutes) -> Self {
        TimeOffset(self.0.saturating_add(delta.0))
    }

    #[inline]
    pub fn saturating_sub(self, delta: Minutes) -> Self {
        TimeOffset(self.0.saturating_sub(delta.0))
    }

    /// The window `[self, self + len)`.
    ///
    /// Returns `None` for a non-positive length or on overflow.
    #[inline]
    pub fn span_of(self, len: Minutes) -> Option<TimeWindow> {
        if !len.is_positive() {
            return None;
        }
        self.checked_add(len).map(|end| Interval::new(self, end))
    }
}

impl Minutes {
    #[inline]
    pub const fn new(value: i32) -> Self {
        Minutes(value)
    }

    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub fn saturating_add(self, rhs: Minutes) -> Self {
        Minutes(self.0.saturating_add(rhs.0))
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Minutes) -> Self {
        Minutes(self.0.saturating_sub(rhs.0))
    }

    /// Converts a raw estimate into whole minutes, rounding up.
    ///
    /// Returns `None` for anything that is not a finite, strictly positive
    /// number. Estimates beyond the minute range saturate at `i32::MAX`, so
    /// they are still too long for any window rather than silently shortened.
    ///
    /// ```
    /// use study_alloc_core::time::Minutes;
    ///
    /// assert_eq!(Minutes::from_estimate(45.0), Some(Minutes::new(45)));
    /// assert_eq!(Minutes::from_estimate(44.2), Some(Minutes::new(45)));
    /// assert_eq!(Minutes::from_estimate(0.0), None);
    /// assert_eq!(Minutes::from_estimate(f64::NAN), None);
    /// assert_eq!(Minutes::from_estimate(3.0e9), Some(Minutes::new(i32::MAX)));
    /// ```
    pub fn from_estimate(raw: f64) -> Option<Self> {
        if !raw.is_finite() || raw <= 0.0 {
            return None;
        }
        let rounded = raw.ceil();
        if rounded >= i32::MAX as f64 {
            return Some(Minutes(i32::MAX));
        }
        Some(Minutes(rounded as i32))
    }
}

impl Display for TimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_hour = MINUTES_PER_HOUR as u32;
        write!(f, "{}{:02}:{:02}", sign, abs / per_hour, abs % per_hour)
    }
}

impl Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}min", self.0)
    }
}

impl From<i32> for TimeOffset {
    #[inline]
    fn from(v: i32) -> Self {
        TimeOffset(v)
    }
}

impl From<i32> for Minutes {
    #[inline]
    fn from(v: i32) -> Self {
        Minutes(v)
    }
}

/// Why a clock string could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClockParseError {
    Malformed { input: String },
    MinutesOutOfRange { input: String, minutes: u32 },
    SecondsOutOfRange { input: String, seconds: u32 },
    HoursOverflow { input: String },
}

impl Display for ClockParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockParseError::Malformed { input } => {
                write!(f, "Malformed clock string {:?}, expected HH:MM", input)
            }
            ClockParseError::MinutesOutOfRange { input, minutes } => write!(
                f,
                "Minutes {} out of range in clock string {:?}",
                minutes, input
            ),
            ClockParseError::SecondsOutOfRange { input, seconds } => write!(
                f,
                "Seconds {} out of range in clock string {:?}",
                seconds, input
            ),
            ClockParseError::HoursOverflow { input } => {
                write!(f, "Hours overflow in clock string {:?}", input)
            }
        }
    }
}

impl std::error::Error for ClockParseError {}

fn two_digit_field(field: &str) -> Option<u32> {
    if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

impl FromStr for TimeOffset {
    type Err = ClockParseError;

    /// Accepts `H:MM`, `HH:MM` and `HH:MM:SS`. Seconds are validated and dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let malformed = || ClockParseError::Malformed {
            input: input.to_owned(),
        };

        let mut fields = input.split(':');
        let hours_field = fields.next().ok_or_else(malformed)?;
        let minutes_field = fields.next().ok_or_else(malformed)?;
        let seconds_field = fields.next();
        if fields.next().is_some() {
            return Err(malformed());
        }

        if hours_field.is_empty() || !hours_field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let hours: i32 = hours_field
            .parse()
            .map_err(|_| ClockParseError::HoursOverflow {
                input: input.to_owned(),
            })?;

        let minutes = two_digit_field(minutes_field).ok_or_else(malformed)?;
        if minutes >= MINUTES_PER_HOUR as u32 {
            return Err(ClockParseError::MinutesOutOfRange {
                input: input.to_owned(),
                minutes,
            });
        }

        if let Some(seconds_field) = seconds_field {
            let seconds = two_digit_field(seconds_field).ok_or_else(malformed)?;
            if seconds >= 60 {
                return Err(ClockParseError::SecondsOutOfRange {
                    input: input.to_owned(),
                    seconds,
                });
            }
        }

        hours
            .checked_mul(MINUTES_PER_HOUR)
            .and_then(|h| h.checked_add(minutes as i32))
            .map(TimeOffset)
            .ok_or_else(|| ClockParseError::HoursOverflow {
                input: input.to_owned(),
            })
    }
}

impl Serialize for TimeOffset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct TimeOffsetVisitor;

impl<'de> de::Visitor<'de> for TimeOffsetVisitor {
    type Value = TimeOffset;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an \"HH:MM\" clock string or a minute offset")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        i32::try_from(v)
            .map(TimeOffset)
            .map_err(|_| E::custom(format!("minute offset {} out of range", v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i32::try_from(v)
            .map(TimeOffset)
            .map_err(|_| E::custom(format!("minute offset {} out of range", v)))
    }
}

impl<'de> Deserialize<'de> for TimeOffset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimeOffsetVisitor)
    }
}

impl Add<Minutes> for TimeOffset {
    type Output = TimeOffset;

    #[inline]
    fn add(self, rhs: Minutes) -> Self::Output {
        TimeOffset(
            self.0
                .checked_add(rhs.0)
                .expect("overflow in TimeOffset + Minutes"),
        )
    }
}

impl AddAssign<Minutes> for TimeOffset {
    #[inline]
    fn add_assign(&mut self, rhs: Minutes) {
        *self = *self + rhs;
    }
}

impl Sub<Minutes> for TimeOffset {
    type Output = TimeOffset;

    #[inline]
    fn sub(self, rhs: Minutes) -> Self::Output {
        TimeOffset(
            self.0
                .checked_sub(rhs.0)
                .expect("underflow in TimeOffset - Minutes"),
        )
    }
}

impl SubAssign<Minutes> for TimeOffset {
    #[inline]
    fn sub_assign(&mut self, rhs: Minutes) {
        *self = *self - rhs;
    }
}

impl Sub<TimeOffset> for TimeOffset {
    type Output = Minutes;

    #[inline]
    fn sub(self, rhs: TimeOffset) -> Self::Output {
        Minutes(
            self.0
                .checked_sub(rhs.0)
                .expect("overflow in TimeOffset - TimeOffset"),
        )
    }
}

impl Add for Minutes {
    type Output = Minutes;

    #[inline]
    fn add(self, rhs: Minutes) -> Self::Output {
        Minutes(self.0.checked_add(rhs.0).expect("overflow in Minutes + Minutes"))
    }
}

impl Sub for Minutes {
    type Output = Minutes;

    #[inline]
    fn sub(self, rhs: Minutes) -> Self::Output {
        Minutes(self.0.checked_sub(rhs.0).expect("overflow in Minutes - Minutes"))
    }
}

impl AddAssign for Minutes {
    #[inline]
    fn add_assign(&mut self, rhs: Minutes) {
        *self = *self + rhs;
    }
}

impl SubAssign for Minutes {
    #[inline]
    fn sub_assign(&mut self, rhs: Minutes) {
        *self = *self - rhs;
    }
}

impl Neg for Minutes {
    type Output = Minutes;

    #[inline]
    fn neg(self) -> Self::Output {
        Minutes(self.0.checked_neg().expect("overflow in -Minutes"))
    }
}

impl CheckedAdd for Minutes {
    #[inline]
    fn checked_add(&self, v: &Self) -> Option<Self> {
        self.0.checked_add(v.0).map(Minutes)
    }
}

impl CheckedSub for Minutes {
    #[inline]
    fn checked_sub(&self, v: &Self) -> Option<Self> {
        self.0.checked_sub(v.0).map(Minutes)
    }
}

impl Zero for Minutes {
    #[inline]
    fn zero() -> Self {
        Minutes(0)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Sum for Minutes {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Minutes::zero(), |acc, x| acc.saturating_add(x))
    }
}

impl<'a> Sum<&'a Minutes> for Minutes {
    fn sum<I: Iterator<Item = &'a Minutes>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
