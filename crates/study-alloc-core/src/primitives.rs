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

//! # Core Primitives
//!
//! The half-open interval used for windows, occupied ranges and gaps.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Sub;

/// A half-open interval `[start, end)`.
///
/// The start is inclusive and the end is exclusive, so `[start, end)` contains
/// every `x` with `start <= x < end`. Two intervals that share an endpoint do
/// not intersect, but they do *touch*; see [`Interval::touches_or_intersects`].
///
/// # Examples
///
/// ```
/// use study_alloc_core::primitives::Interval;
/// let interval = Interval::new(600, 660);
/// assert_eq!(interval.start(), 600);
/// assert_eq!(interval.end(), 660);
/// assert!(interval.contains(659));
/// assert!(!interval.contains(660));
/// assert_eq!(interval.length(), 60);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    start_inclusive: T,
    end_exclusive: T,
}

/// Returned by [`Interval::try_new`] when `start >= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidIntervalError<T> {
    start: T,
    end: T,
}

impl<T: Copy> InvalidIntervalError<T> {
    #[inline]
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> T {
        self.start
    }

    #[inline]
    pub fn end(&self) -> T {
        self.end
    }
}

impl<T: fmt::Display> fmt::Display for InvalidIntervalError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid interval: start {} must be strictly before end {}",
            self.start, self.end
        )
    }
}

impl<T: fmt::Debug + fmt::Display> std::error::Error for InvalidIntervalError<T> {}

impl<T> Interval<T> {
    /// Creates a new half-open interval from two bounds in any order.
    ///
    /// The smaller value becomes the start. Use [`Interval::try_new`] when an
    /// inverted or empty pair must be rejected instead.
    ///
    /// # Panics
    ///
    /// If `a` and `b` are not comparable.
    ///
    /// # Examples
    ///
    /// ```
    /// use study_alloc_core::primitives::Interval;
    ///
    /// let interval = Interval::new(5, 3);
    /// assert_eq!(interval.start(), 3);
    /// assert_eq!(interval.end(), 5);
    /// ```
    #[inline]
    pub fn new(a: T, b: T) -> Self
    where
        T: PartialOrd + Copy,
    {
        let ord = a
            .partial_cmp(&b)
            .expect("Interval::new: non-comparable bounds");
        let (s, e) = match ord {
            Ordering::Greater => (b, a),
            _ => (a, b),
        };

        Self {
            start_inclusive: s,
            end_exclusive: e,
        }
    }

    /// Creates a non-empty interval `[start, end)`, rejecting `start >= end`.
    ///
    /// # Examples
    ///
    /// ```
    /// use study_alloc_core::primitives::Interval;
    ///
    /// assert!(Interval::try_new(600, 660).is_ok());
    /// assert!(Interval::try_new(660, 660).is_err());
    /// assert!(Interval::try_new(700, 660).is_err());
    /// ```
    #[inline]
    pub fn try_new(start: T, end: T) -> Result<Self, InvalidIntervalError<T>>
    where
        T: PartialOrd + Copy,
    {
        if start < end {
            Ok(Self {
                start_inclusive: start,
                end_exclusive: end,
            })
        } else {
            Err(InvalidIntervalError::new(start, end))
        }
    }

    #[inline]
    pub fn start(&self) -> T
    where
        T: Copy,
    {
        self.start_inclusive
    }

    #[inline]
    pub fn end(&self) -> T
    where
        T: Copy,
    {
        self.end_exclusive
    }

    #[inline]
    pub fn is_empty(&self) -> bool
    where
        T: PartialEq,
    {
        self.start_inclusive == self.end_exclusive
    }

    /// Checks whether `x` lies in `[start, end)`.
    #[inline]
    pub fn contains(&self, x: T) -> bool
    where
        T: PartialOrd,
    {
        x >= self.start_inclusive && x < self.end_exclusive
    }

    /// Checks whether `other` lies entirely within this interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use study_alloc_core::primitives::Interval;
    ///
    /// let window = Interval::new(600, 1140);
    /// assert!(window.contains_interval(&Interval::new(600, 660)));
    /// assert!(window.contains_interval(&Interval::new(1080, 1140)));
    /// assert!(!window.contains_interval(&Interval::new(1100, 1160)));
    /// ```
    #[inline]
    pub fn contains_interval(&self, other: &Self) -> bool
    where
        T: PartialOrd,
    {
        other.start_inclusive >= self.start_inclusive && other.end_exclusive <= self.end_exclusive
    }

    /// Checks whether the two intervals share at least one point.
    ///
    /// Touching intervals such as `[1, 5)` and `[5, 7)` do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool
    where
        T: PartialOrd + Copy,
    {
        let start = if self.start_inclusive > other.start_inclusive {
            self.start_inclusive
        } else {
            other.start_inclusive
        };
        let end = if self.end_exclusive < other.end_exclusive {
            self.end_exclusive
        } else {
            other.end_exclusive
        };
        start < end
    }

    /// Checks whether the two intervals overlap or share an endpoint.
    ///
    /// This is the merge condition for occupied time: `[600, 630)` and
    /// `[630, 660)` touch and are therefore merged into `[600, 660)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use study_alloc_core::primitives::Interval;
    ///
    /// let a = Interval::new(600, 630);
    /// assert!(a.touches_or_intersects(&Interval::new(630, 660)));
    /// assert!(a.touches_or_intersects(&Interval::new(620, 640)));
    /// assert!(!a.touches_or_intersects(&Interval::new(631, 660)));
    /// ```
    #[inline]
    pub fn touches_or_intersects(&self, other: &Self) -> bool
    where
        T: PartialOrd + Copy,
    {
        self.start_inclusive <= other.end_exclusive && other.start_inclusive <= self.end_exclusive
    }

    /// Returns the overlap of both intervals, or `None` if they do not intersect.
    #[inline]
    pub fn intersection(&self, other: &Self) -> Option<Self>
    where
        T: PartialOrd + Copy,
    {
        self.clamp(other)
    }

    /// Clips this interval to `boundary`.
    ///
    /// Returns `None` when nothing of the interval remains inside the boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// use study_alloc_core::primitives::Interval;
    ///
    /// let window = Interval::new(600, 1140);
    /// assert_eq!(Interval::new(540, 630).clamp(&window), Some(Interval::new(600, 630)));
    /// assert_eq!(Interval::new(1140, 1200).clamp(&window), None);
    /// ```
    #[inline]
    pub fn clamp(&self, boundary: &Self) -> Option<Self>
    where
        T: PartialOrd + Copy,
    {
        let start = if self.start_inclusive > boundary.start_inclusive {
            self.start_inclusive
        } else {
            boundary.start_inclusive
        };
        let end = if self.end_exclusive < boundary.end_exclusive {
            self.end_exclusive
        } else {
            boundary.end_exclusive
        };
        (start < end).then_some(Self {
            start_inclusive: start,
            end_exclusive: end,
        })
    }

    /// Returns `end - start`.
    #[inline]
    pub fn length<D>(&self) -> D
    where
        T: Copy + Sub<Output = D>,
    {
        self.end_exclusive - self.start_inclusive
    }

    #[inline]
    pub fn to_range(&self) -> std::ops::Range<T>
    where
        T: Copy,
    {
        self.start()..self.end()
    }
}

impl<T: Default> Default for Interval<T> {
    #[inline]
    fn default() -> Self {
        Self {
            start_inclusive: T::default(),
            end_exclusive: T::default(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    /// Formats the interval as `[start, end)`.
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start_inclusive, self.end_exclusive)
    }
}

impl<T: Copy + PartialOrd> From<std::ops::Range<T>> for Interval<T> {
    #[inline]
    fn from(range: std::ops::Range<T>) -> Self {
        Self::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_order() {
        let i = Interval::new(5i32, 3i32);
        assert_eq!(i.start(), 3);
        assert_eq!(i.end(), 5);
    }

    #[test]
    fn test_try_new_rejects_empty_and_inverted() {
        assert_eq!(
            Interval::try_new(10i32, 10i32),
            Err(InvalidIntervalError::new(10, 10))
        );
        assert_eq!(
            Interval::try_new(12i32, 10i32),
            Err(InvalidIntervalError::new(12, 10))
        );
        assert_eq!(Interval::try_new(10i32, 12i32), Ok(Interval::new(10, 12)));
    }

    #[test]
    fn test_invalid_interval_error_display() {
        let err = InvalidIntervalError::new(660, 600);
        assert_eq!(
            err.to_string(),
            "Invalid interval: start 660 must be strictly before end 600"
        );
    }

    #[test]
    #[should_panic]
    fn test_new_panics_on_nan() {
        let _ = Interval::new(f64::NAN, 1.0f64);
    }

    #[test]
    fn test_contains_inclusive_start_and_exclusive_end() {
        let i = Interval::new(10i32, 20i32);
        assert!(i.contains(10));
        assert!(i.contains(19));
        assert!(!i.contains(20));
        assert!(!i.contains(9));
    }

    #[test]
    fn test_empty_interval_contains_nothing() {
        let i = Interval::new(3i32, 3i32);
        assert!(i.is_empty());
        assert!(!i.contains(3));
    }

    #[test]
    fn test_intersects_excludes_touching() {
        let a = Interval::new(1i32, 5i32);
        assert!(a.intersects(&Interval::new(4, 6)));
        assert!(!a.intersects(&Interval::new(5, 7)));
        assert!(!a.intersects(&Interval::new(0, 1)));
    }

    #[test]
    fn test_touches_or_intersects_includes_touching_both_sides() {
        let a = Interval::new(10i32, 20i32);
        assert!(a.touches_or_intersects(&Interval::new(20, 30)));
        assert!(a.touches_or_intersects(&Interval::new(0, 10)));
        assert!(a.touches_or_intersects(&Interval::new(12, 14)));
        assert!(!a.touches_or_intersects(&Interval::new(21, 30)));
        assert!(!a.touches_or_intersects(&Interval::new(0, 9)));
    }

    #[test]
    fn test_clamp_and_intersection() {
        let window = Interval::new(600i32, 1140i32);
        assert_eq!(
            Interval::new(500, 700).clamp(&window),
            Some(Interval::new(600, 700))
        );
        assert_eq!(
            Interval::new(1000, 1200).intersection(&window),
            Some(Interval::new(1000, 1140))
        );
        assert_eq!(Interval::new(0, 600).clamp(&window), None);
        assert_eq!(Interval::new(1140, 1200).clamp(&window), None);
    }

    #[test]
    fn test_length_and_range() {
        let i = Interval::new(600i32, 690i32);
        assert_eq!(i.length(), 90);
        assert_eq!(i.to_range(), 600..690);
        assert_eq!(Interval::from(3..7), Interval::new(3, 7));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Interval::new(1, 5)), "[1, 5)");
    }
}
