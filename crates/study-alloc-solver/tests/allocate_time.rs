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

use serde_json::{Value, json};
use study_alloc_core::{primitives::Interval, time::TimeOffset};
use study_alloc_model::{
    dto::{AllocateTimeRequest, AllocateTimeResponse, ScheduledPlanDto, TimeRangeDto},
    generator::{InstanceGenConfigBuilder, InstanceGenerator},
};
use study_alloc_solver::{
    allocate_time,
    allocator::TimeAllocator,
    config::{AllocatorConfig, AllocatorConfigBuilder},
    intervalset::IntervalSet,
    normalize::normalize,
    strategy::PlacementStrategy,
};

fn run(request: &AllocateTimeRequest) -> AllocateTimeResponse {
    allocate_time(request, &AllocatorConfig::default())
}

fn times(plan: &ScheduledPlanDto) -> (&str, &str) {
    (
        plan.start_time.as_deref().unwrap_or_default(),
        plan.end_time.as_deref().unwrap_or_default(),
    )
}

fn allocated_by_content<'a>(resp: &'a AllocateTimeResponse, content: &str) -> &'a ScheduledPlanDto {
    resp.data
        .allocated_plans
        .iter()
        .find(|p| p.content_id == content)
        .unwrap_or_else(|| panic!("{content} was not allocated"))
}

#[test]
fn best_fit_places_largest_plans_in_tightest_slots() {
    let request = AllocateTimeRequest::new(vec![
        ScheduledPlanDto::new("2025-03-04", "sixty").with_duration(60),
        ScheduledPlanDto::new("2025-03-04", "ninety").with_duration(90),
        ScheduledPlanDto::new("2025-03-04", "thirty").with_duration(30),
    ])
    .with_ranges(
        "2025-03-04",
        vec![
            TimeRangeDto::new("09:00", "10:00"),
            TimeRangeDto::new("13:00", "14:30"),
        ],
    );
    let resp = run(&request);
    assert!(resp.success);
    assert_eq!(times(allocated_by_content(&resp, "ninety")), ("13:00", "14:30"));
    assert_eq!(times(allocated_by_content(&resp, "sixty")), ("09:00", "10:00"));
    assert_eq!(resp.data.unallocated_plans.len(), 1);
    assert_eq!(resp.data.unallocated_plans[0].content_id, "thirty");
    assert_eq!(resp.data.unallocated_plans[0].start_time, None);
}

#[test]
fn default_window_is_used_without_ranges() {
    let request = AllocateTimeRequest::new(vec![
        ScheduledPlanDto::new("2025-03-04", "only").with_duration(60),
    ]);
    let resp = run(&request);
    assert_eq!(resp.data.allocated_plans.len(), 1);
    assert_eq!(times(&resp.data.allocated_plans[0]), ("09:00", "10:00"));
}

#[test]
fn default_window_places_what_fits() {
    let request = AllocateTimeRequest::new(vec![
        ScheduledPlanDto::new("2025-03-04", "a").with_duration(40),
        ScheduledPlanDto::new("2025-03-04", "b").with_duration(40),
        ScheduledPlanDto::new("2025-03-04", "c").with_duration(20),
    ]);
    let resp = run(&request);
    assert_eq!(times(allocated_by_content(&resp, "a")), ("09:00", "09:40"));
    assert_eq!(times(allocated_by_content(&resp, "c")), ("09:40", "10:00"));
    assert_eq!(resp.data.unallocated_plans.len(), 1);
    assert_eq!(resp.data.unallocated_plans[0].content_id, "b");
}

#[test]
fn missing_or_invalid_duration_counts_as_sixty_minutes() {
    let mut zero = ScheduledPlanDto::new("2025-03-04", "zero").with_duration(0);
    zero.extra.insert("note".into(), json!("kept"));
    let request = AllocateTimeRequest::new(vec![
        ScheduledPlanDto::new("2025-03-04", "short").with_duration(30),
        zero,
        ScheduledPlanDto::new("2025-03-04", "null").with_duration(Value::Null),
        ScheduledPlanDto::new("2025-03-04", "absent"),
    ])
    .with_ranges(
        "2025-03-04",
        vec![
            TimeRangeDto::new("08:00", "08:30"),
            TimeRangeDto::new("10:00", "13:00"),
        ],
    );
    let resp = run(&request);
    // the three defaulted plans sort ahead of the 30 minute one
    assert_eq!(times(allocated_by_content(&resp, "zero")), ("10:00", "11:00"));
    assert_eq!(times(allocated_by_content(&resp, "null")), ("11:00", "12:00"));
    assert_eq!(times(allocated_by_content(&resp, "absent")), ("12:00", "13:00"));
    assert_eq!(times(allocated_by_content(&resp, "short")), ("08:00", "08:30"));
    assert_eq!(
        allocated_by_content(&resp, "zero").extra.get("note"),
        Some(&json!("kept"))
    );
}

#[test]
fn pinned_plans_keep_their_time_and_block_it() {
    let request = AllocateTimeRequest::new(vec![
        ScheduledPlanDto::new("2025-03-04", "pinned").with_times("10:30", "11:00"),
        ScheduledPlanDto::new("2025-03-04", "new").with_duration(30),
    ])
    .with_ranges("2025-03-04", vec![TimeRangeDto::new("10:30", "11:30")]);
    let resp = run(&request);
    assert_eq!(times(allocated_by_content(&resp, "pinned")), ("10:30", "11:00"));
    assert_eq!(times(allocated_by_content(&resp, "new")), ("11:00", "11:30"));
}

#[test]
fn first_fit_takes_the_gap_before_the_first_block() {
    let occupied = IntervalSet::from_vec(vec![Interval::new(630, 660)]);
    assert_eq!(occupied.first_free_gap(Interval::new(600, 1140), 30), Some(600));

    let request = AllocateTimeRequest::new(vec![
        ScheduledPlanDto::new("2025-03-04", "pinned").with_times("10:30", "11:00"),
        ScheduledPlanDto::new("2025-03-04", "new").with_duration(30),
    ])
    .with_ranges("2025-03-04", vec![TimeRangeDto::new("10:00", "19:00")]);
    let config = AllocatorConfig::default().with_strategy(PlacementStrategy::FirstFit);
    let resp = allocate_time(&request, &config);
    assert_eq!(times(allocated_by_content(&resp, "new")), ("10:00", "10:30"));
}

#[test]
fn adjacent_insertion_merges() {
    let original = IntervalSet::from_vec(vec![Interval::new(600, 630)]);
    let merged = original.inserted(Interval::new(630, 660));
    assert_eq!(merged.as_slice(), &[Interval::new(600, 660)]);
    assert_eq!(original.as_slice(), &[Interval::new(600, 630)]);
}

#[test]
fn largest_gap_ignores_position_of_the_winner() {
    // free gaps of 30, 30 and 60 minutes at increasing offsets
    let occupied = IntervalSet::from_vec(vec![
        Interval::new(TimeOffset::new(630), TimeOffset::new(640)),
        Interval::new(TimeOffset::new(670), TimeOffset::new(680)),
    ]);
    let window = Interval::new(TimeOffset::new(600), TimeOffset::new(740));
    let gap = occupied
        .largest_free_gap::<study_alloc_core::time::Minutes>(window)
        .unwrap();
    assert_eq!(gap.start(), TimeOffset::new(680));
    assert_eq!(gap.end(), TimeOffset::new(740));
}

#[test]
fn empty_request_succeeds() {
    let resp = run(&AllocateTimeRequest::default());
    assert!(resp.success);
    assert!(resp.data.allocated_plans.is_empty());
    assert!(resp.data.unallocated_plans.is_empty());
}

#[test]
fn response_uses_wire_keys() {
    let request: AllocateTimeRequest = serde_json::from_value(json!({
        "scheduledPlans": [
            {"date": "2025-03-04", "content_id": "x", "estimated_duration": 45, "plan_group": 7}
        ],
        "dateTimeRanges": {"2025-03-04": [{"start": "14:00", "end": "16:00"}]},
        "contentDurationMap": {"x": 45}
    }))
    .unwrap();
    let resp = serde_json::to_value(run(&request)).unwrap();
    assert_eq!(
        resp,
        json!({
            "success": true,
            "data": {
                "allocatedPlans": [{
                    "date": "2025-03-04",
                    "content_id": "x",
                    "estimated_duration": 45,
                    "plan_group": 7,
                    "start_time": "14:00",
                    "end_time": "14:45"
                }],
                "unallocatedPlans": []
            }
        })
    );
}

#[test]
fn malformed_ranges_fall_back_to_default_window() {
    let request: AllocateTimeRequest = serde_json::from_value(json!({
        "scheduledPlans": [{"date": "2025-03-04", "content_id": "x", "estimated_duration": 30}],
        "dateTimeRanges": {"2025-03-04": "all day"}
    }))
    .unwrap();
    let resp = run(&request);
    assert_eq!(times(&resp.data.allocated_plans[0]), ("09:00", "09:30"));
}

#[test]
fn inverted_window_on_another_date_does_not_block_the_run() {
    let request = AllocateTimeRequest::new(vec![
        ScheduledPlanDto::new("2025-03-04", "valid").with_duration(30),
    ])
    .with_ranges("2025-03-04", vec![TimeRangeDto::new("10:00", "12:00")])
    .with_ranges("2025-03-09", vec![TimeRangeDto::new("12:00", "11:00")]);
    let resp = run(&request);
    assert!(resp.success);
    assert_eq!(resp.data.unallocated_plans.len(), 0);
    assert_eq!(
        times(allocated_by_content(&resp, "valid")),
        ("10:00", "10:30")
    );
}

#[test]
fn inverted_window_is_dropped_and_the_remaining_windows_used() {
    let request = AllocateTimeRequest::new(vec![
        ScheduledPlanDto::new("2025-03-04", "a").with_duration(45),
    ])
    .with_ranges(
        "2025-03-04",
        vec![
            TimeRangeDto::new("12:00", "11:00"),
            TimeRangeDto::new("14:00", "15:00"),
        ],
    );
    let resp = run(&request);
    assert_eq!(times(allocated_by_content(&resp, "a")), ("14:00", "14:45"));
}

#[test]
fn inverted_pin_is_placed_like_an_unpinned_plan() {
    let request = AllocateTimeRequest::new(vec![
        ScheduledPlanDto::new("2025-03-04", "flipped")
            .with_duration(30)
            .with_times("11:00", "10:00"),
    ])
    .with_ranges("2025-03-04", vec![TimeRangeDto::new("13:00", "14:00")]);
    let resp = run(&request);
    assert_eq!(
        times(allocated_by_content(&resp, "flipped")),
        ("13:00", "13:30")
    );
}

#[test]
fn oversized_estimate_stays_unallocated() {
    let request: AllocateTimeRequest = serde_json::from_value(json!({
        "scheduledPlans": [{"date": "2025-03-04", "content_id": "huge", "estimated_duration": 3.0e9}]
    }))
    .unwrap();
    let resp = run(&request);
    assert!(resp.data.allocated_plans.is_empty());
    assert_eq!(resp.data.unallocated_plans.len(), 1);
    assert_eq!(resp.data.unallocated_plans[0].content_id, "huge");
}

#[test]
fn plan_date_records_come_back_untouched() {
    let plan = json!({"plan_date": "2025-03-04", "content_id": "a", "estimated_duration": 600});
    let request: AllocateTimeRequest =
        serde_json::from_value(json!({ "scheduledPlans": [plan.clone()] })).unwrap();
    let resp = serde_json::to_value(run(&request)).unwrap();
    assert_eq!(resp["data"]["unallocatedPlans"], json!([plan]));
}

#[test]
fn daily_limit_and_min_gap_apply_per_date() {
    let config = AllocatorConfigBuilder::new()
        .max_plans_per_day(Some(2))
        .min_gap(study_alloc_core::time::Minutes::new(10))
        .build()
        .unwrap();
    let request = AllocateTimeRequest::new(vec![
        ScheduledPlanDto::new("2025-03-04", "a").with_duration(30),
        ScheduledPlanDto::new("2025-03-04", "b").with_duration(30),
        ScheduledPlanDto::new("2025-03-04", "c").with_duration(30),
        ScheduledPlanDto::new("2025-03-05", "d").with_duration(30),
    ])
    .with_ranges("2025-03-04", vec![TimeRangeDto::new("10:00", "12:00")])
    .with_ranges("2025-03-05", vec![TimeRangeDto::new("10:00", "10:35")]);
    let resp = allocate_time(&request, &config);
    let allocated: Vec<&str> = resp
        .data
        .allocated_plans
        .iter()
        .map(|p| p.content_id.as_str())
        .collect();
    assert_eq!(allocated, vec!["a", "b"]);
    let unallocated: Vec<&str> = resp
        .data
        .unallocated_plans
        .iter()
        .map(|p| p.content_id.as_str())
        .collect();
    assert_eq!(unallocated, vec!["c", "d"]);
}

#[test]
fn configured_defaults_apply() {
    let config = AllocatorConfigBuilder::new()
        .default_window(TimeOffset::from_hm(18, 0), TimeOffset::from_hm(20, 0))
        .default_duration(study_alloc_core::time::Minutes::new(45))
        .build()
        .unwrap();
    let request = AllocateTimeRequest::new(vec![ScheduledPlanDto::new("2025-03-04", "x")]);
    let resp = allocate_time(&request, &config);
    assert_eq!(times(&resp.data.allocated_plans[0]), ("18:00", "18:45"));
}

#[test]
fn generated_instances_hold_the_invariants_for_every_strategy() {
    for seed in 0..8u64 {
        let gen_config = InstanceGenConfigBuilder::new()
            .days(30)
            .plans_per_day(1, 12)
            .windows_per_day(1, 4)
            .pinned_probability(0.2)
            .seed(seed)
            .build()
            .unwrap();
        let request = InstanceGenerator::new(gen_config).generate();
        for strategy in PlacementStrategy::ALL {
            let config = AllocatorConfig::default().with_strategy(strategy);
            let input = normalize(&request, &config);
            let result = TimeAllocator::new(config).allocate(&input);
            assert_eq!(result.len(), request.scheduled_plans.len());
            result
                .validate(request.scheduled_plans.len())
                .unwrap_or_else(|e| panic!("seed {seed}, {strategy}: {e}"));
        }
    }
}

#[test]
fn allocation_is_deterministic() {
    let gen_config = InstanceGenConfigBuilder::new().days(20).seed(11).build().unwrap();
    let request = InstanceGenerator::new(gen_config).generate();
    let first = run(&request);
    let second = run(&request);
    assert_eq!(first, second);
}
