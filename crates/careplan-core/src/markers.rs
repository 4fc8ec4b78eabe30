//! Fixed textual contract shared by the prompt, the post-processing
//! pipeline, and the disclosure flow. These strings must match exactly.

/// Opening delimiter of an internal reasoning span.
pub const REASONING_OPEN: &str = "<think>";

/// Closing delimiter of an internal reasoning span.
pub const REASONING_CLOSE: &str = "</think>";

/// Strings that mark where the real plan starts, highest priority first.
pub const PAYLOAD_MARKERS: [&str; 5] = [
    "Enhanced 7-Day Care Plan",
    "7-Day Care Plan",
    "Day 1",
    "Personalized Care Plan",
    "Daily Care Plan",
];

/// Subsections that must never reach the user, in removal order.
pub const BANNED_MARKERS: [&str; 6] = [
    "Monitoring Instructions:",
    "Medication Interactions:",
    "Fall Risk Precautions:",
    "Conclusion:",
    "Regular monitoring and follow-up",
    "Medication adherence:",
];

/// Day labels every valid plan must mention, in presentation order.
pub const REQUIRED_DAYS: [&str; 7] = ["Day 1", "Day 2", "Day 3", "Day 4", "Day 5", "Day 6", "Day 7"];

pub const ACTIVITY_GLYPH: char = '🏃';
pub const WELLNESS_GLYPH: char = '🧘';
pub const MEAL_GLYPH: char = '🥗';
pub const HYDRATION_GLYPH: char = '💧';
pub const AVOID_GLYPH: char = '❌';
pub const CHECK_GLYPH: char = '✅';
pub const WARNING_GLYPH: char = '⚠';

/// Glyphs that open a structural line inside a day.
pub const STRUCTURAL_GLYPHS: [char; 7] = [
    ACTIVITY_GLYPH,
    WELLNESS_GLYPH,
    MEAL_GLYPH,
    HYDRATION_GLYPH,
    AVOID_GLYPH,
    CHECK_GLYPH,
    WARNING_GLYPH,
];

pub const ARROW: char = '→';

/// Start of the "things to avoid" line; the day preview stops here.
pub const AVOID_MARKER: &str = "❌ Avoid";

/// Start of the section revealed after a "yes".
pub const BENEFIT_MARKER: &str = "✅ Today's risk reduction";

/// Start of the section revealed after anything other than "yes".
pub const CONSEQUENCE_MARKER: &str = "⚠ Consequences if skipped";
