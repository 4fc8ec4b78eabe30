//! Plan service layer.
//!
//! Runs raw generator output through every post-processing stage in order:
//! normalize, remove banned sections, validate, segment.

use crate::generator::{GenerateError, PlanGenerator};

use super::filter::remove_banned_sections;
use super::normalize::normalize;
use super::segment::{DayCollection, split_days};
use super::validate::{PlanError, validate_days};

/// A validated plan, ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedPlan {
    /// Cleaned plan text after filtering.
    pub text: String,
    /// Per-day records segmented from `text`.
    pub days: DayCollection,
}

/// Errors from generating and processing a plan in one step.
#[derive(Debug, thiserror::Error)]
pub enum GeneratePlanError {
    #[error("generation failed: {0}")]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Turn raw generator output into a validated, segmented plan.
///
/// Fails only with [`PlanError::MissingDays`]; every other irregularity in
/// the input is tolerated.
pub fn process_plan(raw: String) -> Result<ProcessedPlan, PlanError> {
    let raw_len = raw.len();
    let normalized = normalize(&raw);
    drop(raw);

    let text = remove_banned_sections(normalized);
    validate_days(&text)?;
    let days = split_days(&text);

    tracing::info!(
        raw_len,
        plan_len = text.len(),
        segments = days.len(),
        "plan processed"
    );

    Ok(ProcessedPlan { text, days })
}

/// Ask `generator` for a plan based on `report` and process the result.
pub async fn generate_plan(
    generator: &dyn PlanGenerator,
    report: &str,
) -> Result<ProcessedPlan, GeneratePlanError> {
    tracing::info!(generator = generator.name(), "generating care plan");
    let raw = generator.generate(report).await?;
    Ok(process_plan(raw)?)
}
