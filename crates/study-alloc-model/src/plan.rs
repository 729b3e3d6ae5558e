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

use crate::{
    dto::ScheduledPlanDto,
    id::{PlanDate, PlanId},
};
use std::fmt::Display;
use study_alloc_core::time::{Minutes, TimeOffset, TimeWindow};

/// A normalized plan waiting for (or already holding) a time slot.
///
/// `duration` is the effective duration after defaults were applied. A
/// `pinned` plan already carries a fixed time and is never moved; it only
/// occupies time. The caller's original record is kept in `source` so it can
/// be echoed back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    id: PlanId,
    date: PlanDate,
    duration: Minutes,
    pinned: Option<TimeWindow>,
    source: ScheduledPlanDto,
}

impl PlanRequest {
    #[inline]
    pub fn new(id: PlanId, date: PlanDate, duration: Minutes, source: ScheduledPlanDto) -> Self {
        Self {
            id,
            date,
            duration,
            pinned: None,
            source,
        }
    }

    /// Marks the plan as fixed at `window`.
    #[inline]
    pub fn pinned_at(mut self, window: TimeWindow) -> Self {
        self.pinned = Some(window);
        self
    }

    #[inline]
    pub fn id(&self) -> PlanId {
        self.id
    }

    #[inline]
    pub fn date(&self) -> &PlanDate {
        &self.date
    }

    #[inline]
    pub fn content_id(&self) -> &str {
        &self.source.content_id
    }

    #[inline]
    pub fn duration(&self) -> Minutes {
        self.duration
    }

    #[inline]
    pub fn pinned(&self) -> Option<TimeWindow> {
        self.pinned
    }

    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }

    #[inline]
    pub fn source(&self) -> &ScheduledPlanDto {
        &self.source
    }

    /// The original record, untouched.
    #[inline]
    pub fn to_dto(&self) -> ScheduledPlanDto {
        self.source.clone()
    }

    /// The original record with `start_time` / `end_time` set to `slot`.
    pub fn to_dto_with_slot(&self, start: TimeOffset, end: TimeOffset) -> ScheduledPlanDto {
        let mut dto = self.source.clone();
        dto.start_time = Some(start.to_clock());
        dto.end_time = Some(end.to_clock());
        dto
    }
}

impl Display for PlanRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Plan {} ({:?}) on {} for {}",
            self.id,
            self.content_id(),
            self.date,
            self.duration
        )?;
        if let Some(p) = self.pinned {
            write!(f, ", pinned at {}", p)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_alloc_core::primitives::Interval;

    fn request() -> PlanRequest {
        let mut dto = ScheduledPlanDto::new("2025-03-04", "book-1").with_duration(45);
        dto.extra.insert("chapter".into(), "II".into());
        PlanRequest::new(
            PlanId::new(3),
            PlanDate::from("2025-03-04"),
            Minutes::new(45),
            dto,
        )
    }

    #[test]
    fn test_accessors() {
        let r = request();
        assert_eq!(r.id(), PlanId::new(3));
        assert_eq!(r.content_id(), "book-1");
        assert_eq!(r.duration(), Minutes::new(45));
        assert!(!r.is_pinned());
    }

    #[test]
    fn test_dto_with_slot_keeps_unknown_fields() {
        let r = request();
        let dto = r.to_dto_with_slot(TimeOffset::from_hm(9, 0), TimeOffset::from_hm(9, 45));
        assert_eq!(dto.start_time.as_deref(), Some("09:00"));
        assert_eq!(dto.end_time.as_deref(), Some("09:45"));
        assert_eq!(dto.extra.get("chapter"), Some(&"II".into()));
        assert_eq!(r.to_dto().start_time, None);
    }

    #[test]
    fn test_display_mentions_pin() {
        let w = Interval::new(TimeOffset::from_hm(8, 0), TimeOffset::from_hm(9, 0));
        let r = request().pinned_at(w);
        assert!(r.is_pinned());
        assert_eq!(
            r.to_string(),
            "Plan PlanId(3) (\"book-1\") on 2025-03-04 for 45min, pinned at [08:00, 09:00)"
        );
    }
}
