//! Integration tests for the plan service layer.
//!
//! Drives `process_plan` and `generate_plan` end to end over fixture
//! generator output.

use careplan_core::markers::{BANNED_MARKERS, REQUIRED_DAYS};
use careplan_core::plan::{
    PlanError, generate_plan, normalize_spacing, process_plan, split_days,
};
use careplan_test_utils::{
    DaySections, StaticGenerator, full_plan_text, noisy_generator_output, plan_text_with,
};

// -----------------------------------------------------------------------
// Noisy input end to end
// -----------------------------------------------------------------------

#[test]
fn noisy_output_is_cleaned_and_segmented() {
    let plan = process_plan(noisy_generator_output()).expect("plan should validate");

    assert!(plan.text.starts_with("7-Day Care Plan"));
    assert!(!plan.text.contains("<think>"));
    assert!(!plan.text.contains("Sure! Below is the plan"));
    for marker in BANNED_MARKERS {
        assert!(!plan.text.contains(marker), "{marker:?} survived");
    }

    for day in REQUIRED_DAYS {
        let record = plan.days.get(day).unwrap_or_else(|| panic!("{day} missing"));
        assert!(record.body().starts_with(day));
    }
}

#[test]
fn last_day_keeps_its_sections_after_trailing_banned_sections_removed() {
    let plan = process_plan(noisy_generator_output()).unwrap();
    let day7 = plan.days.get("Day 7").unwrap();
    assert!(day7.body().contains("⚠ Consequences if skipped: BP stays high on day 7"));
    assert!(!day7.body().contains("Monitoring"));
}

#[test]
fn reasoning_span_and_banned_section_inside_plan() {
    // Banned section in the middle of Day 1; the removal runs to the next
    // banned marker or end of text, so it is placed where that is safe.
    let raw = format!(
        "<think>draft</think>7-Day Care Plan\nDay 1\nwalk\nMonitoring Instructions: xyz\nMedication adherence: take pills\n{}",
        (2..=7).map(|n| format!("Day {n}\nrest\n")).collect::<String>()
    );
    let err = process_plan(raw).unwrap_err();
    // "Medication adherence:" has no later banned marker, so it eats the
    // remaining days and validation fails.
    assert!(matches!(err, PlanError::MissingDays { .. }));
}

#[test]
fn banned_section_between_days_swallows_later_days() {
    let raw = "<think>plan it</think>7-Day Care Plan\nDay 1\nwalk\nMonitoring Instructions: xyz\nConclusion: bye\nDay 2\nswim\nDay 3\nDay 4\nDay 5\nDay 6\nDay 7\nrest".to_string();
    // Monitoring runs up to Conclusion, Conclusion runs to the end.
    let err = process_plan(raw).unwrap_err();
    assert_eq!(
        err,
        PlanError::MissingDays {
            missing: (2..=7).map(|n| format!("Day {n}")).collect()
        }
    );
}

#[test]
fn monitoring_section_followed_only_by_days_is_removed_to_end() {
    let raw = "7-Day Care Plan\nDay 1\nDay 2\nDay 3\nDay 4\nDay 5\nDay 6\nDay 7\nwalk\nMonitoring Instructions: xyz".to_string();
    let plan = process_plan(raw).unwrap();
    assert_eq!(plan.days.get("Day 7").unwrap().body(), "Day 7\nwalk");
}

// -----------------------------------------------------------------------
// Validation gate
// -----------------------------------------------------------------------

#[test]
fn missing_day_fails_whole_plan() {
    let raw = full_plan_text().replace("Day 5", "Day five");
    let err = process_plan(raw).unwrap_err();
    assert_eq!(
        err,
        PlanError::MissingDays {
            missing: vec!["Day 5".into()]
        }
    );
}

#[test]
fn days_out_of_order_still_validate() {
    let body = (1..=7)
        .rev()
        .map(|n| format!("Day {n}\nentry {n}\n"))
        .collect::<String>();
    let plan = process_plan(format!("7-Day Care Plan\n{body}")).unwrap();
    let labels: Vec<&str> = plan.days.labels().collect();
    assert_eq!(
        labels,
        vec!["7-Day Care Plan", "Day 7", "Day 6", "Day 5", "Day 4", "Day 3", "Day 2", "Day 1"]
    );
}

// -----------------------------------------------------------------------
// Segmentation properties
// -----------------------------------------------------------------------

#[test]
fn duplicate_label_resolves_to_last_occurrence() {
    let mut raw = full_plan_text();
    raw.push_str("Day 3\nrevised day three\n");
    let plan = process_plan(raw).unwrap();
    assert_eq!(plan.days.get("Day 3").unwrap().body(), "Day 3\nrevised day three");
}

#[test]
fn processed_text_is_stable_under_renormalization() {
    let plan = process_plan(noisy_generator_output()).unwrap();
    assert_eq!(normalize_spacing(&plan.text), plan.text);
}

#[test]
fn resegmenting_processed_text_gives_same_days() {
    let plan = process_plan(full_plan_text()).unwrap();
    assert_eq!(split_days(&plan.text), plan.days);
}

#[test]
fn sparse_sections_survive_processing() {
    let raw = plan_text_with(|n| DaySections {
        avoid: n != 2,
        benefit: n % 2 == 0,
        consequence: n != 4,
    });
    let plan = process_plan(raw).unwrap();
    assert!(!plan.days.get("Day 2").unwrap().body().contains("❌ Avoid"));
    assert!(!plan.days.get("Day 3").unwrap().body().contains("✅"));
    assert!(!plan.days.get("Day 4").unwrap().body().contains("⚠"));
}

// -----------------------------------------------------------------------
// Generation
// -----------------------------------------------------------------------

#[tokio::test]
async fn generate_plan_processes_generator_output() {
    let generator = StaticGenerator::new(noisy_generator_output());
    let plan = generate_plan(&generator, "Age: 90").await.unwrap();
    assert_eq!(plan.days.get("Day 1").map(|d| d.label()), Some("Day 1"));
}

#[tokio::test]
async fn generate_plan_surfaces_missing_days() {
    let generator = StaticGenerator::new("Day 1 only");
    let err = generate_plan(&generator, "Age: 90").await.unwrap_err();
    assert!(err.to_string().contains("Day 2"), "unexpected error: {err}");
}
