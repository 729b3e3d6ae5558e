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

//! IntervalSet: sorted, coalesced half-open interval set over `Interval<T>`.
//!
//! Invariants (always held):
//!    - intervals are sorted by `start()`
//!    - intervals are non-overlapping and non-adjacent (touching runs are merged)
//!    - semantics are half-open `[start, end)`
//!
//! Complexity:
//!    - overlaps, contains_point: `O(log n)`
//!    - insert_and_coalesce: `O(log n + k)` search, `O(n)` shift
//!    - inserted, gap queries: `O(n)`

use core::ops::Deref;
use std::{iter::Sum, ops::Sub};
use study_alloc_core::primitives::Interval;

/// A collection of sorted, disjoint, half-open `[start, end)` intervals.
///
/// `IntervalSet` holds the occupied time of one window. Inserting an interval
/// merges it with every interval it overlaps **or touches**, so `[600, 630)`
/// and `[630, 660)` are stored as the single run `[600, 660)`.
///
/// ## Invariants
///
/// 1.  **Sorted**: Intervals are always sorted in ascending order based on their `start` value.
/// 2.  **Disjoint**: No two intervals in the set overlap or share an endpoint.
///
/// These invariants are upheld by all methods that modify the set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntervalSet<T> {
    intervals: Vec<Interval<T>>,
}

impl<T> IntervalSet<T> {
    /// Creates a new, empty `IntervalSet`.
    ///
    /// An empty set stands for a window with nothing occupied.
    #[inline]
    pub fn new() -> Self {
        Self {
            intervals: Default::default(),
        }
    }

    /// Creates a new, empty `IntervalSet` with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            intervals: Vec::with_capacity(capacity),
        }
    }

    /// Creates a new `IntervalSet` from a vector of intervals in any order.
    ///
    /// The input vector is sorted and its intervals are coalesced in-place.
    /// Empty intervals are dropped.
    #[inline]
    pub fn from_vec(mut source_intervals: Vec<Interval<T>>) -> Self
    where
        T: Ord + Copy,
    {
        source_intervals.retain(|iv| !iv.is_empty());
        if !source_intervals.is_empty() {
            Self::coalesce_unsorted_in_place(&mut source_intervals);
        }
        Self {
            intervals: source_intervals,
        }
    }

    /// Builds the occupied set of `window` from intervals in arbitrary order.
    ///
    /// Each interval is clipped to the window. Intervals that end up empty,
    /// or lie entirely outside the window, are discarded.
    ///
    /// # Examples
    ///
    /// ```
    /// use study_alloc_core::primitives::Interval;
    /// use study_alloc_solver::intervalset::IntervalSet;
    ///
    /// let window = Interval::new(600, 1140);
    /// let set = IntervalSet::build_occupied(
    ///     window,
    ///     [Interval::new(700, 730), Interval::new(540, 630), Interval::new(1200, 1260)],
    /// );
    /// assert_eq!(set.as_slice(), &[Interval::new(600, 630), Interval::new(700, 730)]);
    /// ```
    pub fn build_occupied<I>(window: Interval<T>, occupied: I) -> Self
    where
        T: Ord + Copy,
        I: IntoIterator<Item = Interval<T>>,
    {
        let mut set = Self::new();
        for interval in occupied {
            if let Some(clipped) = interval.clamp(&window) {
                set.insert_and_coalesce(clipped);
            }
        }
        set
    }

    /// Returns the number of disjoint intervals in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` if the set contains no intervals.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns a slice containing all intervals in the set.
    #[inline]
    pub fn as_slice(&self) -> &[Interval<T>] {
        &self.intervals
    }

    /// Finds the index of the first interval `i` such that `intervals[i].start() >= point`.
    #[inline]
    fn find_first_starting_at_or_after(&self, point: T) -> usize
    where
        T: Ord + Copy,
    {
        self.intervals
            .partition_point(|interval| interval.start() < point)
    }

    /// Finds the index of the first interval `i` such that `intervals[i].end() > point`.
    #[inline]
    fn find_first_ending_after(&self, point: T) -> usize
    where
        T: Ord + Copy,
    {
        self.intervals
            .partition_point(|interval| interval.end() <= point)
    }

    /// Inserts a single interval into the set, merging with existing intervals
    /// if they overlap or are adjacent.
    ///
    /// This is the in-place counterpart of [`IntervalSet::inserted`]. Both
    /// produce the same set.
    #[inline]
    pub fn insert_and_coalesce(&mut self, new_interval: Interval<T>)
    where
        T: Ord + Copy,
    {
        if new_interval.is_empty() {
            return;
        }

        let mut insertion_index = self.find_first_starting_at_or_after(new_interval.start());
        let intervals = &mut self.intervals;

        let mut merged_start = new_interval.start();
        let mut merged_end = new_interval.end();

        // Left neighbour overlapping or touching the new start.
        if insertion_index > 0 && intervals[insertion_index - 1].end() >= merged_start {
            insertion_index -= 1;
            merged_start = intervals[insertion_index].start().min(merged_start);
            merged_end = intervals[insertion_index].end().max(merged_end);
        }

        let mut coalesce_scan_index = insertion_index;
        while coalesce_scan_index < intervals.len()
            && intervals[coalesce_scan_index].start() <= merged_end
        {
            merged_end = merged_end.max(intervals[coalesce_scan_index].end());
            coalesce_scan_index += 1;
        }

        let merged_interval = Interval::new(merged_start, merged_end);
        let num_merged_on_right = coalesce_scan_index - insertion_index;

        if insertion_index == intervals.len() {
            intervals.push(merged_interval);
        } else if num_merged_on_right == 0 {
            intervals.insert(insertion_index, merged_interval);
        } else {
            intervals[insertion_index] = merged_interval;
            if num_merged_on_right > 1 {
                intervals.drain(insertion_index + 1..coalesce_scan_index);
            }
        }
        debug_assert!(Self::are_invariants_held(&self.intervals));
    }

    /// Returns a new set with `new_interval` merged in; `self` is left untouched.
    ///
    /// The existing intervals are partitioned in one scan into those entirely
    /// before the new interval, those overlapping or touching it, and those
    /// entirely after it. The touching group collapses into a single run
    /// spanning `min(start)` to `max(end)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use study_alloc_core::primitives::Interval;
    /// use study_alloc_solver::intervalset::IntervalSet;
    ///
    /// let original = IntervalSet::from_vec(vec![Interval::new(600, 630)]);
    /// let merged = original.inserted(Interval::new(630, 660));
    /// assert_eq!(merged.as_slice(), &[Interval::new(600, 660)]);
    /// assert_eq!(original.as_slice(), &[Interval::new(600, 630)]);
    /// ```
    pub fn inserted(&self, new_interval: Interval<T>) -> Self
    where
        T: Ord + Copy,
    {
        if new_interval.is_empty() {
            return self.clone();
        }

        let mut before = Vec::with_capacity(self.len() + 1);
        let mut after = Vec::new();
        let mut merged_start = new_interval.start();
        let mut merged_end = new_interval.end();

        for &existing in &self.intervals {
            if existing.end() < new_interval.start() {
                before.push(existing);
            } else if existing.start() > new_interval.end() {
                after.push(existing);
            } else {
                merged_start = merged_start.min(existing.start());
                merged_end = merged_end.max(existing.end());
            }
        }

        before.push(Interval::new(merged_start, merged_end));
        before.append(&mut after);
        debug_assert!(Self::are_invariants_held(&before));
        Self { intervals: before }
    }

    /// Returns `true` if any interval in the set overlaps with the `query_interval`.
    ///
    /// Touching is not overlapping here: `[600, 630)` does not overlap `[630, 660)`.
    #[inline]
    pub fn overlaps(&self, query_interval: Interval<T>) -> bool
    where
        T: Ord + Copy,
    {
        if self.intervals.is_empty() || query_interval.is_empty() {
            return false;
        }
        let candidate_index = self.find_first_ending_after(query_interval.start());
        candidate_index < self.intervals.len()
            && self.intervals[candidate_index].start() < query_interval.end()
    }

    /// Returns `true` if `start <= point < end` holds for some interval.
    #[inline]
    pub fn contains_point(&self, point: T) -> bool
    where
        T: Ord + Copy,
    {
        let candidate_index = self.find_first_ending_after(point);
        candidate_index < self.len() && self.intervals[candidate_index].start() <= point
    }

    /// Returns a new `IntervalSet` with every interval clipped to `bounds`.
    #[inline]
    pub fn clamped(&self, bounds: Interval<T>) -> Self
    where
        T: Ord + Copy,
    {
        let mut output_set = Self::with_capacity(4.min(self.len()));
        if self.is_empty() || bounds.is_empty() {
            return output_set;
        }

        let mut interval_index = self.find_first_ending_after(bounds.start());
        while interval_index < self.intervals.len()
            && self.intervals[interval_index].start() < bounds.end()
        {
            if let Some(clipped) = self.intervals[interval_index].clamp(&bounds) {
                output_set.intervals.push(clipped);
            }
            interval_index += 1;
        }
        debug_assert!(Self::are_invariants_held(&output_set.intervals));
        output_set
    }

    /// Sum of all interval lengths.
    #[inline]
    pub fn total_length<D>(&self) -> D
    where
        T: Copy + Sub<Output = D>,
        D: Sum<D>,
    {
        self.intervals.iter().map(|iv| iv.length()).sum()
    }

    /// Returns the complement of the set within `bounds`, as a set.
    ///
    /// Only positive-length gaps are part of the result.
    #[inline]
    pub fn gaps_within(&self, bounds: Interval<T>) -> Self
    where
        T: Ord + Copy,
    {
        Self {
            intervals: self
                .free_gaps(bounds)
                .into_iter()
                .filter(|gap| !gap.is_empty())
                .collect(),
        }
    }

    /// Enumerates the candidate gaps of `window` in scan order.
    ///
    /// The candidates are the gap before the first occupied interval, the gaps
    /// between consecutive intervals, and the gap after the last one, each
    /// clipped to the window. The leading and trailing candidates are reported
    /// even when they have zero length, so a zero-minute request still finds a
    /// boundary position. An empty set yields the whole window.
    pub fn free_gaps(&self, window: Interval<T>) -> Vec<Interval<T>>
    where
        T: Ord + Copy,
    {
        if window.is_empty() {
            return Vec::new();
        }

        let occupied = self.clamped(window);
        let mut gaps = Vec::with_capacity(occupied.len() + 1);
        let mut cursor = window.start();
        for interval in &occupied.intervals {
            gaps.push(Interval::new(cursor, interval.start()));
            cursor = interval.end();
        }
        gaps.push(Interval::new(cursor, window.end()));
        gaps
    }

    /// Returns the start of the earliest gap in `window` that can hold
    /// `required`, or `None` if no gap is long enough.
    ///
    /// # Examples
    ///
    /// ```
    /// use study_alloc_core::primitives::Interval;
    /// use study_alloc_solver::intervalset::IntervalSet;
    ///
    /// let occupied = IntervalSet::from_vec(vec![Interval::new(630, 660)]);
    /// let window = Interval::new(600, 1140);
    /// assert_eq!(occupied.first_free_gap(window, 30), Some(600));
    /// assert_eq!(occupied.first_free_gap(window, 31), Some(660));
    /// assert_eq!(occupied.first_free_gap(window, 481), None);
    /// ```
    pub fn first_free_gap<D>(&self, window: Interval<T>, required: D) -> Option<T>
    where
        T: Ord + Copy + Sub<Output = D>,
        D: Ord,
    {
        self.free_gaps(window)
            .into_iter()
            .find(|gap| gap.length::<D>() >= required)
            .map(|gap| gap.start())
    }

    /// Returns the longest gap in `window`; among equally long gaps the
    /// earliest wins. `None` when the window is fully occupied.
    pub fn largest_free_gap<D>(&self, window: Interval<T>) -> Option<Interval<T>>
    where
        T: Ord + Copy + Sub<Output = D>,
        D: Ord,
    {
        let mut best: Option<Interval<T>> = None;
        for gap in self.free_gaps(window) {
            let better = match best {
                None => true,
                Some(current) => gap.length::<D>() > current.length::<D>(),
            };
            if better {
                best = Some(gap);
            }
        }
        best.filter(|gap| !gap.is_empty())
    }

    /// Sorts and merges a vector of arbitrary intervals in-place.
    ///
    /// After this operation, the vector will satisfy the `IntervalSet` invariants:
    /// sorted by start time and containing no overlapping or adjacent intervals.
    #[inline]
    pub fn coalesce_unsorted_in_place(intervals: &mut Vec<Interval<T>>)
    where
        T: Ord + Copy,
    {
        if intervals.len() < 2 {
            return;
        }
        intervals.sort_unstable_by_key(|iv| iv.start());

        let mut write_index = 0;
        for read_index in 1..intervals.len() {
            if intervals[write_index].end() >= intervals[read_index].start() {
                let merged_end = intervals[write_index]
                    .end()
                    .max(intervals[read_index].end());
                intervals[write_index] = Interval::new(intervals[write_index].start(), merged_end);
            } else {
                write_index += 1;
                intervals[write_index] = intervals[read_index];
            }
        }
        intervals.truncate(write_index + 1);
        debug_assert!(Self::are_invariants_held(intervals));
    }

    /// A debug-only check to ensure the set's invariants (sorted, non-overlapping,
    /// non-adjacent) hold.
    #[inline]
    #[cfg(debug_assertions)]
    fn are_invariants_held(intervals: &[Interval<T>]) -> bool
    where
        T: Ord + Copy,
    {
        intervals.iter().all(|iv| iv.start() < iv.end())
            && intervals.windows(2).all(|window| {
                window[0].start() < window[1].start() && window[0].end() < window[1].start()
            })
    }

    /// A release-build stub for `are_invariants_held`. Always returns `true`.
    #[inline]
    #[cfg(not(debug_assertions))]
    fn are_invariants_held(_intervals: &[Interval<T>]) -> bool {
        true
    }
}

impl<T> From<Vec<Interval<T>>> for IntervalSet<T>
where
    T: Ord + Copy,
{
    #[inline]
    fn from(vector: Vec<Interval<T>>) -> Self {
        Self::from_vec(vector)
    }
}

impl<T> FromIterator<Interval<T>> for IntervalSet<T>
where
    T: Ord + Copy,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = Interval<T>>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

/// Allows an `IntervalSet` to be treated as a slice `&[Interval<T>]`.
impl<T> Deref for IntervalSet<T> {
    type Target = [Interval<T>];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.intervals
    }
}

impl<'a, T> IntoIterator for &'a IntervalSet<T> {
    type Item = &'a Interval<T>;
    type IntoIter = std::slice::Iter<'a, Interval<T>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl<T> IntoIterator for IntervalSet<T> {
    type Item = Interval<T>;
    type IntoIter = std::vec::IntoIter<Interval<T>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.intervals.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type SetI = IntervalSet<i32>;

    #[inline]
    fn iv(a: i32, b: i32) -> Interval<i32> {
        Interval::new(a, b)
    }

    fn assert_invariants(set: &SetI) {
        for w in set.as_slice().windows(2) {
            assert!(
                w[0].start() < w[1].start(),
                "not strictly sorted: {:?}",
                set.as_slice()
            );
            assert!(
                w[0].end() < w[1].start(),
                "overlapping or touching: {:?}",
                set.as_slice()
            );
        }
        for x in set.as_slice() {
            assert!(x.start() < x.end(), "empty interval stored: {:?}", x);
        }
    }

    #[test]
    fn new_and_empty() {
        let s = SetI::new();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert_invariants(&s);
    }

    #[test]
    fn from_vec_coalesces_sorts_and_drops_empty() {
        let s = SetI::from_vec(vec![iv(5, 7), iv(1, 3), iv(3, 4), iv(10, 10), iv(6, 9)]);
        assert_eq!(s.as_slice(), &[iv(1, 4), iv(5, 9)]);
        assert_invariants(&s);
    }

    #[test]
    fn from_iterator_coalesces() {
        let s: SetI = [iv(4, 6), iv(0, 2), iv(2, 3)].into_iter().collect();
        assert_eq!(s.as_slice(), &[iv(0, 3), iv(4, 6)]);
    }

    #[test]
    fn deref_and_iter() {
        let s = SetI::from_vec(vec![iv(0, 2), iv(4, 6)]);
        assert_eq!(s.len(), 2);
        assert_eq!(s[1], iv(4, 6));
        let starts: Vec<i32> = (&s).into_iter().map(|x| x.start()).collect();
        assert_eq!(starts, vec![0, 4]);
        let owned: Vec<Interval<i32>> = s.into_iter().collect();
        assert_eq!(owned, vec![iv(0, 2), iv(4, 6)]);
    }

    #[test]
    fn insert_merges_touching_neighbours() {
        let mut s = SetI::from_vec(vec![iv(600, 630)]);
        s.insert_and_coalesce(iv(630, 660));
        assert_eq!(s.as_slice(), &[iv(600, 660)]);

        let mut s = SetI::from_vec(vec![iv(600, 630), iv(700, 730)]);
        s.insert_and_coalesce(iv(630, 700));
        assert_eq!(s.as_slice(), &[iv(600, 730)]);
        assert_invariants(&s);
    }

    #[test]
    fn insert_ignores_empty() {
        let mut s = SetI::from_vec(vec![iv(1, 2)]);
        s.insert_and_coalesce(iv(5, 5));
        assert_eq!(s.as_slice(), &[iv(1, 2)]);
        assert_eq!(s.inserted(iv(5, 5)), s);
    }

    #[test]
    fn insert_spanning_many() {
        let mut s = SetI::from_vec(vec![iv(0, 1), iv(3, 4), iv(6, 7), iv(9, 10), iv(20, 21)]);
        s.insert_and_coalesce(iv(2, 9));
        assert_eq!(s.as_slice(), &[iv(0, 1), iv(2, 10), iv(20, 21)]);
        assert_invariants(&s);
    }

    #[test]
    fn inserted_is_pure_and_merges_adjacent() {
        let original = SetI::from_vec(vec![iv(600, 630)]);
        let snapshot = original.clone();
        let merged = original.inserted(iv(630, 660));
        assert_eq!(merged.as_slice(), &[iv(600, 660)]);
        assert_eq!(original, snapshot);
    }

    #[test]
    fn inserted_keeps_before_and_after() {
        let s = SetI::from_vec(vec![iv(0, 10), iv(20, 30), iv(40, 50), iv(60, 70)]);
        let r = s.inserted(iv(25, 45));
        assert_eq!(r.as_slice(), &[iv(0, 10), iv(20, 50), iv(60, 70)]);
        let r = s.inserted(iv(12, 18));
        assert_eq!(r.as_slice(), &[iv(0, 10), iv(12, 18), iv(20, 30), iv(40, 50), iv(60, 70)]);
        assert_invariants(&r);
    }

    #[test]
    fn reinsert_is_idempotent() {
        let s = SetI::from_vec(vec![iv(100, 200), iv(300, 400)]);
        let once = s.inserted(iv(150, 320));
        let twice = once.inserted(iv(150, 320));
        assert_eq!(once, twice);

        let mut in_place = s.clone();
        in_place.insert_and_coalesce(iv(150, 320));
        in_place.insert_and_coalesce(iv(150, 320));
        assert_eq!(in_place, once);
    }

    #[test]
    fn build_occupied_clips_and_discards() {
        let window = iv(600, 1140);
        let s = SetI::build_occupied(
            window,
            [
                iv(1100, 1200),
                iv(500, 540),
                iv(540, 610),
                iv(610, 620),
                iv(1140, 1150),
            ],
        );
        assert_eq!(s.as_slice(), &[iv(600, 620), iv(1100, 1140)]);
        assert_invariants(&s);
    }

    #[test]
    fn overlaps_query() {
        let s = SetI::from_vec(vec![iv(1, 3), iv(5, 8)]);
        assert!(s.overlaps(iv(2, 4)));
        assert!(!s.overlaps(iv(3, 5)));
        assert!(s.overlaps(iv(7, 10)));
        assert!(!s.overlaps(iv(8, 9)));
        assert!(!s.overlaps(iv(2, 2)));
    }

    #[test]
    fn contains_point_query() {
        let s = SetI::from_vec(vec![iv(1, 3), iv(5, 8)]);
        assert!(s.contains_point(1));
        assert!(s.contains_point(2));
        assert!(!s.contains_point(3));
        assert!(s.contains_point(7));
        assert!(!s.contains_point(8));
    }

    #[test]
    fn clamped_cuts_edges() {
        let s = SetI::from_vec(vec![iv(0, 5), iv(10, 15), iv(20, 25)]);
        assert_eq!(s.clamped(iv(3, 12)).as_slice(), &[iv(3, 5), iv(10, 12)]);
        assert!(s.clamped(iv(5, 10)).is_empty());
    }

    #[test]
    fn total_length_sums_runs() {
        let s = SetI::from_vec(vec![iv(0, 5), iv(10, 15), iv(20, 21)]);
        assert_eq!(s.total_length::<i32>(), 11);
        assert_eq!(SetI::new().total_length::<i32>(), 0);
    }

    #[test]
    fn free_gaps_reports_boundaries() {
        let window = iv(600, 700);
        let s = SetI::from_vec(vec![iv(600, 630), iv(650, 700)]);
        assert_eq!(s.free_gaps(window), vec![iv(600, 600), iv(630, 650), iv(700, 700)]);
        assert_eq!(SetI::new().free_gaps(window), vec![window]);
    }

    #[test]
    fn gaps_within_drops_zero_length() {
        let s = SetI::from_vec(vec![iv(600, 630), iv(650, 700)]);
        assert_eq!(s.gaps_within(iv(600, 700)).as_slice(), &[iv(630, 650)]);
        assert_eq!(SetI::new().gaps_within(iv(0, 10)).as_slice(), &[iv(0, 10)]);
    }

    #[test]
    fn first_free_gap_prefers_gap_before_first_block() {
        let s = SetI::from_vec(vec![iv(630, 660)]);
        assert_eq!(s.first_free_gap(iv(600, 1140), 30), Some(600));
    }

    #[test]
    fn first_free_gap_skips_short_gaps() {
        let s = SetI::from_vec(vec![iv(620, 660), iv(680, 700)]);
        let window = iv(600, 760);
        assert_eq!(s.first_free_gap(window, 20), Some(600));
        assert_eq!(s.first_free_gap(window, 21), Some(700));
        assert_eq!(s.first_free_gap(window, 60), Some(700));
        assert_eq!(s.first_free_gap(window, 61), None);
    }

    #[test]
    fn first_free_gap_zero_minutes_returns_boundary() {
        let s = SetI::from_vec(vec![iv(600, 640)]);
        assert_eq!(s.first_free_gap(iv(600, 700), 0), Some(600));
        let full = SetI::from_vec(vec![iv(600, 700)]);
        assert_eq!(full.first_free_gap(iv(600, 700), 0), Some(600));
        assert_eq!(full.first_free_gap(iv(600, 700), 1), None);
    }

    #[test]
    fn largest_free_gap_takes_longest_regardless_of_position() {
        // gaps of 30, 30 and 60, in that order
        let s = SetI::from_vec(vec![iv(30, 40), iv(70, 80)]);
        let g = s.largest_free_gap::<i32>(iv(0, 140)).unwrap();
        assert_eq!(g, iv(80, 140));
        assert_eq!(g.length::<i32>(), 60);
    }

    #[test]
    fn largest_free_gap_tie_goes_to_earliest() {
        let s = SetI::from_vec(vec![iv(30, 40), iv(70, 80)]);
        let g = s.largest_free_gap::<i32>(iv(0, 110)).unwrap();
        assert_eq!(g, iv(0, 30));
    }

    #[test]
    fn largest_free_gap_none_when_full() {
        let s = SetI::from_vec(vec![iv(0, 100)]);
        assert_eq!(s.largest_free_gap::<i32>(iv(0, 100)), None);
        assert_eq!(s.largest_free_gap::<i32>(iv(20, 80)), None);
    }

    #[test]
    fn coalesce_in_place_merges_and_sorts() {
        let mut v = vec![iv(8, 9), iv(1, 2), iv(2, 3), iv(5, 7), iv(6, 8)];
        SetI::coalesce_unsorted_in_place(&mut v);
        assert_eq!(v, vec![iv(1, 3), iv(5, 9)]);
    }

    #[test]
    fn invariants_hold_in_parallel_builds() {
        use rayon::prelude::*;

        let results: Vec<SetI> = (0..64)
            .into_par_iter()
            .map(|k| {
                let mut s = SetI::new();
                for i in 0..50 {
                    let a = (i * 7 + k) % 300;
                    s.insert_and_coalesce(iv(a, a + 1 + (i % 5)));
                }
                s
            })
            .collect();
        for s in &results {
            assert_invariants(s);
        }
    }
}
