//! Prompt construction for plan generation.
//!
//! The daily structure embedded in the user prompt uses the exact markers
//! from [`crate::markers`]; the post-processing pipeline and the disclosure
//! flow depend on the model echoing them back.

use crate::markers::{
    ACTIVITY_GLYPH, ARROW, AVOID_MARKER, BANNED_MARKERS, BENEFIT_MARKER, CONSEQUENCE_MARKER,
    HYDRATION_GLYPH, MEAL_GLYPH, WELLNESS_GLYPH,
};

const ROLE: &str = "You are a senior healthcare professional writing evidence-based 7-day care plans. \
Analyse the patient's medical data thoroughly and produce a plan that is practical and safe. \
Every recommendation must suit the patient's age, conditions, and physical capabilities.";

const ANALYSIS_STEPS: &str = "\
ANALYSIS BEFORE WRITING:
1. Extract the medical data: demographics, vitals, test results, diagnosed conditions.
2. Identify the primary health issues and how severe they are.
3. Assess what the patient can safely do given age, mobility, and existing conditions.
4. Note contraindications and safety limits.";

const PLAN_RULES: &str = "\
PLAN RULES:
- Tie every recommendation to the patient's actual results.
- Safety and medical appropriateness come first.
- Vary activities and meals while keeping them practical.
- Give measurable instructions: portions, durations, frequencies.
- Address every identified condition on every day.";

/// Build the system prompt sent ahead of every generation request.
pub fn build_system_prompt() -> String {
    ROLE.to_string()
}

/// The per-day template the model must follow, one line per section.
pub fn daily_structure() -> String {
    let mut out = String::with_capacity(1024);
    out.push_str("DAILY STRUCTURE (include only these sections, for Day 1 through Day 7):\n");
    out.push_str("Day [X]\n");
    out.push_str(&format!(
        "{ACTIVITY_GLYPH} Physical Activity: [safe activity for this patient] {ARROW} [benefit for their conditions]\n"
    ));
    out.push_str(&format!(
        "{WELLNESS_GLYPH} Mental Wellness: [technique] {ARROW} [benefit for their needs]\n"
    ));
    out.push_str(&format!(
        "{MEAL_GLYPH} Meals: [meals with ingredients and portions] {ARROW} [nutritional benefit]\n"
    ));
    out.push_str(&format!(
        "{HYDRATION_GLYPH} Hydration: [fluid types and amounts] {ARROW} [benefit given kidney function and medication]\n"
    ));
    out.push_str(&format!(
        "{AVOID_MARKER}: [contraindicated items or behaviours] {ARROW} [risk based on their results]\n"
    ));
    out.push_str(&format!(
        "{BENEFIT_MARKER}: [how today's plan lowers their specific risk percentages]\n"
    ));
    out.push_str(&format!(
        "{CONSEQUENCE_MARKER}: [realistic worsening of their conditions]\n"
    ));
    out
}

/// Build the user prompt for a patient report.
pub fn build_user_prompt(report: &str) -> String {
    // Lowercased so the prompt never carries a literal banned marker for the
    // model to echo back.
    let excluded: Vec<String> = BANNED_MARKERS
        .iter()
        .map(|m| m.trim_end_matches(':').to_lowercase())
        .collect();

    let mut prompt = String::with_capacity(report.len() + 4096);
    prompt.push_str("PATIENT REPORT TO ANALYSE:\n");
    prompt.push_str(report.trim());
    prompt.push_str("\n\n");
    prompt.push_str("Generate ONLY the 7-day care plan. Do NOT include any of these sections: ");
    prompt.push_str(&excluded.join(", "));
    prompt.push_str(".\n\n");
    prompt.push_str(ANALYSIS_STEPS);
    prompt.push_str("\n\n");
    prompt.push_str(PLAN_RULES);
    prompt.push_str("\n\n");
    prompt.push_str(&daily_structure());
    prompt
}
