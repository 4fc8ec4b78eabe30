//! Plan validation: every required day label must be present.

use thiserror::Error;

use crate::markers::REQUIRED_DAYS;

/// Errors that can occur while processing a generated plan.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("plan missing days: {}", missing.join(", "))]
    MissingDays { missing: Vec<String> },
}

/// Check that each of "Day 1".."Day 7" occurs somewhere in `text`.
///
/// Order does not matter. On failure, every missing label is reported in
/// day order.
pub fn validate_days(text: &str) -> Result<(), PlanError> {
    let missing: Vec<String> = REQUIRED_DAYS
        .iter()
        .filter(|day| !text.contains(*day))
        .map(|day| day.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PlanError::MissingDays { missing })
    }
}
