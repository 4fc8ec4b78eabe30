//! Day-by-day disclosure of a processed plan.
//!
//! Each day is driven by a small state machine ([`transition`]) that shows a
//! preview, asks whether the plan was followed, and reveals one of two
//! mutually exclusive sections depending on the answer. [`session`] chains
//! the days together behind a continue/halt question, and [`responder`]
//! supplies the I/O seam.
//!
//! ```text
//! Start --Advance--> Shown --Advance--> AwaitingChoice --Answer--> Resolved(outcome) --Advance--> Done
//! ```

pub mod responder;
pub mod session;

use std::fmt;

use serde::Serialize;

use crate::markers::{AVOID_MARKER, BENEFIT_MARKER, CONSEQUENCE_MARKER};
use crate::plan::DayRecord;

pub use responder::{DisclosureError, Responder, StdioResponder};
pub use session::{
    DayOutcome, SessionEnd, SessionReport, SessionState, run_session, session_transition,
};

/// Question asked once a day's preview has been shown.
pub const CHOICE_PROMPT: &str = "Did you follow today's care plan? (yes/no): ";

/// Question asked between days.
pub const CONTINUE_PROMPT: &str = "Continue to next day? (yes/no): ";

const BANNER_WIDTH: usize = 60;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A reply classified as positive or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Classify a free-form reply.
    ///
    /// Only "yes" (any case, surrounding whitespace ignored) is positive.
    /// Everything else, including empty input, is negative.
    pub fn classify(reply: &str) -> Self {
        if reply.trim().eq_ignore_ascii_case("yes") {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// What a day's disclosure ended up revealing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisclosureOutcome {
    RevealedBenefit,
    RevealedConsequence,
    NoBranch,
}

impl fmt::Display for DisclosureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RevealedBenefit => "revealed_benefit",
            Self::RevealedConsequence => "revealed_consequence",
            Self::NoBranch => "no_branch",
        };
        f.write_str(s)
    }
}

/// State of a single day's disclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    Start,
    Shown,
    AwaitingChoice,
    Resolved(DisclosureOutcome),
    Done,
}

/// Input fed to [`transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Move on without an answer.
    Advance,
    /// A classified reply to the last question asked.
    Answer(Answer),
}

/// Side effect requested by a transition, performed by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write text to the user.
    Show(String),
    /// Ask a question and feed the classified reply back as [`Input::Answer`].
    Ask(&'static str),
    None,
}

/// Result of one step of the day state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: DayState,
    pub effect: Effect,
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Advance a day's disclosure by one step.
///
/// Total over all `(state, input)` pairs. An answer outside
/// `AwaitingChoice` is treated as [`Input::Advance`], `Advance` while
/// awaiting a choice leaves the state unchanged, and `Done` is absorbing.
/// `day_number` is only used for the banner.
pub fn transition(state: DayState, day: &DayRecord, day_number: usize, input: Input) -> Transition {
    match (state, input) {
        (DayState::Start, _) => Transition {
            next: DayState::Shown,
            effect: Effect::Show(render_preview(day, day_number)),
        },
        (DayState::Shown, _) => Transition {
            next: DayState::AwaitingChoice,
            effect: Effect::Ask(CHOICE_PROMPT),
        },
        (DayState::AwaitingChoice, Input::Advance) => Transition {
            next: DayState::AwaitingChoice,
            effect: Effect::None,
        },
        (DayState::AwaitingChoice, Input::Answer(answer)) => {
            let (outcome, revealed) = resolve(day.body(), answer);
            Transition {
                next: DayState::Resolved(outcome),
                effect: revealed.map_or(Effect::None, |text| Effect::Show(text.to_string())),
            }
        }
        (DayState::Resolved(_), _) | (DayState::Done, _) => Transition {
            next: DayState::Done,
            effect: Effect::None,
        },
    }
}

/// Pick the section revealed by `answer`.
pub fn resolve(body: &str, answer: Answer) -> (DisclosureOutcome, Option<&str>) {
    match answer {
        Answer::Yes => match benefit_section(body) {
            Some(text) => (DisclosureOutcome::RevealedBenefit, Some(text)),
            None => (DisclosureOutcome::NoBranch, None),
        },
        Answer::No => match consequence_section(body) {
            Some(text) => (DisclosureOutcome::RevealedConsequence, Some(text)),
            None => (DisclosureOutcome::NoBranch, None),
        },
    }
}

/// Body text up to (not including) the avoid marker, if there is one.
pub fn preview_section(body: &str) -> Option<&str> {
    body.find(AVOID_MARKER).map(|idx| body[..idx].trim())
}

/// From the benefit marker up to the consequence marker that follows it, or
/// to the end of the body.
pub fn benefit_section(body: &str) -> Option<&str> {
    let start = body.find(BENEFIT_MARKER)?;
    let rest = &body[start..];
    let end = rest.find(CONSEQUENCE_MARKER).unwrap_or(rest.len());
    Some(rest[..end].trim())
}

/// From the consequence marker to the end of the body.
pub fn consequence_section(body: &str) -> Option<&str> {
    body.find(CONSEQUENCE_MARKER).map(|idx| body[idx..].trim())
}

fn render_preview(day: &DayRecord, day_number: usize) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    let mut out = format!("\n{rule}\nDAY {day_number} PLAN\n{rule}");
    if let Some(preview) = preview_section(day.body()) {
        out.push('\n');
        out.push_str(preview);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
