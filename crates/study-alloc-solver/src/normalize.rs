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

//! Turns the raw wire request into an `AllocationInput`.
//!
//! All graceful degradation happens here: unusable durations become the
//! configured default, malformed window entries are dropped, and dates
//! without windows get the default window. Inverted windows and inverted
//! pinned slots are contract violations. Each one is rejected on its own and
//! recorded on the input; the rest of the request is still allocated. The
//! allocator itself only ever sees clean data.

use crate::config::AllocatorConfig;
use serde_json::Value;
use std::collections::BTreeMap;
use study_alloc_core::{
    primitives::Interval,
    time::{Minutes, TimeOffset, TimeWindow},
};
use study_alloc_model::{
    day::{AllocationInput, DayPlan, FreeWindow, WindowSource},
    dto::{AllocateTimeRequest, ScheduledPlanDto, TimeRangeDto},
    err::{InputError, InvalidPinnedIntervalError, InvalidWindowError},
    id::{PlanDate, PlanId},
    plan::PlanRequest,
};
use tracing::{debug, info, instrument, warn};

/// Effective duration of a plan: a finite positive estimate rounded up to
/// whole minutes, otherwise `default`.
pub fn effective_duration(estimate: Option<&Value>, default: Minutes) -> Minutes {
    estimate
        .and_then(Value::as_f64)
        .and_then(Minutes::from_estimate)
        .unwrap_or(default)
}

/// Parses a single `{start, end}` entry.
///
/// `Ok(None)` means the entry was unusable and has been dropped.
pub fn parse_window(date: &PlanDate, entry: &Value) -> Result<Option<FreeWindow>, InvalidWindowError> {
    let Ok(range) = serde_json::from_value::<TimeRangeDto>(entry.clone()) else {
        warn!(%date, %entry, "Dropping window entry without start/end");
        return Ok(None);
    };
    let (start, end) = match (
        TimeOffset::parse_clock(&range.start),
        TimeOffset::parse_clock(&range.end),
    ) {
        (Ok(s), Ok(e)) => (s, e),
        (Err(e), _) | (_, Err(e)) => {
            warn!(%date, error = %e, "Dropping window with malformed clock");
            return Ok(None);
        }
    };
    Interval::try_new(start, end)
        .map(Some)
        .map_err(|_| InvalidWindowError::new(date.clone(), start, end))
}

/// Parses the windows of one date.
///
/// Returns an empty list when nothing usable was supplied. Inverted windows
/// are pushed onto `rejected` and left out. Windows are sorted by start and
/// strictly overlapping windows are merged; windows that only touch stay
/// separate.
pub fn parse_windows(
    date: &PlanDate,
    raw: &Value,
    rejected: &mut Vec<InputError>,
) -> Vec<FreeWindow> {
    let Some(entries) = raw.as_array() else {
        warn!(%date, "Window list is not an array; treating the date as having no windows");
        return Vec::new();
    };

    let mut windows = Vec::with_capacity(entries.len());
    for entry in entries {
        match parse_window(date, entry) {
            Ok(Some(window)) => windows.push(window),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Rejecting window");
                rejected.push(e.into());
            }
        }
    }

    merge_overlapping(date, windows)
}

fn merge_overlapping(date: &PlanDate, mut windows: Vec<FreeWindow>) -> Vec<FreeWindow> {
    windows.sort_by_key(|w| (w.start(), w.end()));
    let mut merged: Vec<FreeWindow> = Vec::with_capacity(windows.len());
    for w in windows {
        match merged.last_mut() {
            Some(last) if last.intersects(&w) => {
                warn!(%date, first = %last, second = %w, "Merging overlapping windows");
                *last = Interval::new(last.start(), last.end().max(w.end()));
            }
            _ => merged.push(w),
        }
    }
    merged
}

/// Resolves the fixed slot of a plan, if it has one.
///
/// An unparsable `start_time` means the plan is not pinned. A slot that ends
/// at or before its start is an error.
pub fn resolve_pin(
    id: PlanId,
    dto: &ScheduledPlanDto,
    duration: Minutes,
) -> Result<Option<TimeWindow>, InvalidPinnedIntervalError> {
    let Some(raw_start) = dto.start_time.as_deref() else {
        return Ok(None);
    };
    let start = match TimeOffset::parse_clock(raw_start) {
        Ok(s) => s,
        Err(e) => {
            warn!(plan = %id, error = %e, "Ignoring unparsable start_time; plan will be placed");
            return Ok(None);
        }
    };

    let parsed_end = dto
        .end_time
        .as_deref()
        .and_then(|raw| TimeOffset::parse_clock(raw).ok());
    let end = parsed_end.unwrap_or_else(|| start.saturating_add(duration));

    Interval::try_new(start, end)
        .map(Some)
        .map_err(|_| InvalidPinnedIntervalError::new(id, start, end))
}

/// Groups and cleans a request.
///
/// Plan ids are the positions of the plans in `scheduled_plans`. A plan with
/// an inverted pinned slot loses its pin and is placed like any other plan.
#[instrument(skip_all, fields(plans = request.scheduled_plans.len(), dates_with_ranges = request.date_time_ranges.len()))]
pub fn normalize(request: &AllocateTimeRequest, config: &AllocatorConfig) -> AllocationInput {
    let mut rejected: Vec<InputError> = Vec::new();

    let mut windows_by_date: BTreeMap<PlanDate, Vec<FreeWindow>> = BTreeMap::new();
    for (key, raw) in &request.date_time_ranges {
        let date = PlanDate::new(key.as_str());
        if !date.is_well_formed() {
            warn!(%date, "Window key is not a YYYY-MM-DD date");
        }
        let windows = parse_windows(&date, raw, &mut rejected);
        windows_by_date.insert(date, windows);
    }

    let mut days: BTreeMap<PlanDate, DayPlan> = BTreeMap::new();
    for (index, dto) in request.scheduled_plans.iter().enumerate() {
        let id = PlanId::from(index);
        let date = PlanDate::new(dto.date());
        let duration = effective_duration(dto.estimated_duration.as_ref(), config.default_duration());

        let mut plan = PlanRequest::new(id, date.clone(), duration, dto.clone());
        match resolve_pin(id, dto, duration) {
            Ok(Some(slot)) => plan = plan.pinned_at(slot),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Rejecting pinned slot; plan will be placed");
                rejected.push(e.into());
            }
        }

        let day = days.entry(date.clone()).or_insert_with(|| {
            match windows_by_date.get(&date).filter(|w| !w.is_empty()) {
                Some(windows) => DayPlan::new(date.clone(), windows.clone(), WindowSource::Supplied),
                None => {
                    if !date.is_well_formed() {
                        warn!(%date, "Plan date is not a YYYY-MM-DD date");
                    }
                    debug!(%date, "No windows supplied; using the default window");
                    DayPlan::new(
                        date.clone(),
                        vec![config.default_window()],
                        WindowSource::Default,
                    )
                }
            }
        });
        day.push(plan);
    }

    if !rejected.is_empty() {
        info!(rejected = rejected.len(), "Normalized with rejected input");
    }
    AllocationInput::new(days, request.content_duration_map.clone()).with_rejected(rejected)
}
