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

//! Wire shapes exchanged with the schedule generator upstream and the
//! persistence layer downstream.
//!
//! These types stay deliberately loose: unknown plan fields are carried in
//! [`ScheduledPlanDto::extra`] and window lists are raw JSON, so that malformed
//! upstream data can be detected and degraded during normalization rather
//! than failing deserialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One plan as produced by the schedule generator.
///
/// The date arrives as `date` or, from older producers, as `plan_date`. A
/// `plan_date` key stays in [`extra`](Self::extra) so the record is written
/// back under the key it came with; use [`date`](Self::date) to read either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPlanDto {
    #[serde(default, rename = "date", skip_serializing_if = "Option::is_none")]
    pub date_key: Option<String>,
    #[serde(default)]
    pub content_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScheduledPlanDto {
    pub const LEGACY_DATE_KEY: &'static str = "plan_date";

    pub fn new(date: impl Into<String>, content_id: impl Into<String>) -> Self {
        Self {
            date_key: Some(date.into()),
            content_id: content_id.into(),
            estimated_duration: None,
            start_time: None,
            end_time: None,
            extra: Map::new(),
        }
    }

    /// The plan's date key: `date` if present, otherwise `plan_date`, otherwise
    /// the empty string.
    pub fn date(&self) -> &str {
        self.date_key
            .as_deref()
            .or_else(|| self.extra.get(Self::LEGACY_DATE_KEY).and_then(Value::as_str))
            .unwrap_or("")
    }

    pub fn with_duration(mut self, minutes: impl Into<Value>) -> Self {
        self.estimated_duration = Some(minutes.into());
        self
    }

    pub fn with_times(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_time = Some(start.into());
        self.end_time = Some(end.into());
        self
    }
}

/// A free-time range as sent by the schedule generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRangeDto {
    pub start: String,
    pub end: String,
}

impl TimeRangeDto {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Input of the `allocateTime` operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocateTimeRequest {
    pub scheduled_plans: Vec<ScheduledPlanDto>,
    /// Date key to a JSON array of [`TimeRangeDto`]. Kept raw; see module docs.
    #[serde(default)]
    pub date_time_ranges: BTreeMap<String, Value>,
    /// Content-level duration hints. Carried through, never consulted.
    #[serde(default)]
    pub content_duration_map: BTreeMap<String, f64>,
}

impl AllocateTimeRequest {
    pub fn new(scheduled_plans: Vec<ScheduledPlanDto>) -> Self {
        Self {
            scheduled_plans,
            ..Default::default()
        }
    }

    /// Sets the windows of `date`, replacing any previous entry.
    pub fn with_ranges(mut self, date: impl Into<String>, ranges: Vec<TimeRangeDto>) -> Self {
        let value = serde_json::to_value(ranges).unwrap_or(Value::Array(Vec::new()));
        self.date_time_ranges.insert(date.into(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationData {
    pub allocated_plans: Vec<ScheduledPlanDto>,
    pub unallocated_plans: Vec<ScheduledPlanDto>,
}

/// Output of the `allocateTime` operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllocateTimeResponse {
    pub success: bool,
    pub data: AllocationData,
}
