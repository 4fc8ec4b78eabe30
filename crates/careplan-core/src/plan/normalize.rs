//! Text normalization for raw generator output.
//!
//! Three pure passes, applied in order by [`normalize`]:
//! - [`remove_reasoning_blocks`] drops `<think>...</think>` spans.
//! - [`locate_payload_start`] skips any preamble before the plan itself.
//! - [`normalize_spacing`] puts day labels and structural glyphs on their
//!   own lines so later stages can split on line boundaries.

use std::sync::LazyLock;

use regex::Regex;

use crate::markers::{PAYLOAD_MARKERS, WARNING_GLYPH};

static REASONING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));

// Absorbs blank lines and horizontal whitespace around the label so the
// replacement is stable under repetition.
static DAY_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:[ \t]*\n)*[ \t]*(Day \d+)[ \t]*\n?").expect("valid regex"));

static GLYPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[ \t]*\n)?[ \t]*([🏃🧘🥗💧❌✅⚠])").expect("valid regex")
});

// A run of variation selectors after the warning glyph, so one pass removes
// them all.
static WARNING_VARIATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"⚠\x{FE0F}+").expect("valid regex"));

static ARROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*→[ \t]*").expect("valid regex"));

static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Delete every complete reasoning span. Unterminated spans stay as-is.
pub fn remove_reasoning_blocks(text: &str) -> String {
    REASONING_RE.replace_all(text, "").into_owned()
}

/// Return the suffix of `text` starting at the highest-priority payload
/// marker present anywhere in it.
///
/// Markers are ranked by their position in [`PAYLOAD_MARKERS`], not by where
/// they occur in the text. Returns `text` unchanged when none is found.
pub fn locate_payload_start(text: &str) -> &str {
    for marker in PAYLOAD_MARKERS {
        if let Some(idx) = text.find(marker) {
            tracing::debug!(marker, offset = idx, "payload marker located");
            return &text[idx..];
        }
    }
    text
}

/// Normalize line structure around day labels, glyphs, and arrows.
///
/// Idempotent: `normalize_spacing(&normalize_spacing(t)) == normalize_spacing(t)`.
pub fn normalize_spacing(text: &str) -> String {
    let glyph = WARNING_GLYPH.to_string();
    let text = WARNING_VARIATION_RE.replace_all(text, glyph.as_str());

    let text = DAY_LABEL_RE.replace_all(&text, "\n\n${1}\n");
    let text = GLYPH_RE.replace_all(&text, "\n${1}");
    let text = ARROW_RE.replace_all(&text, " → ");
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Run all normalization passes over raw generator output.
pub fn normalize(raw: &str) -> String {
    let stripped = remove_reasoning_blocks(raw);
    let payload = locate_payload_start(&stripped);
    normalize_spacing(payload)
}
