//! Multi-day disclosure session.
//!
//! Days are presented in fixed order ("Day 1".."Day 7"). After every day but
//! the last, the user is asked whether to continue; anything other than
//! "yes" halts the session and the remaining days are never shown.

use serde::Serialize;

use crate::markers::REQUIRED_DAYS;
use crate::plan::DayCollection;

use super::responder::{DisclosureError, Responder};
use super::{Answer, CONTINUE_PROMPT, DayState, DisclosureOutcome, Effect, Input, transition};

/// Message shown when the user declines to continue.
pub const HALT_MESSAGE: &str = "\nStopping care plan progression.";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// State of a whole session. `index` is a zero-based position in
/// [`REQUIRED_DAYS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Day { index: usize, state: DayState },
    AwaitingContinue { index: usize },
    Halted { after_day: usize },
    Completed,
}

impl SessionState {
    pub fn initial() -> Self {
        Self::Day {
            index: 0,
            state: DayState::Start,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Halted { .. } | Self::Completed)
    }
}

/// Result of one step of the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTransition {
    pub next: SessionState,
    pub effect: Effect,
    /// Set when a day has just been resolved: `(index, outcome)`.
    pub resolved: Option<(usize, DisclosureOutcome)>,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SessionEnd {
    /// Every day was shown.
    Completed,
    /// The user declined to continue after the given day (1-based).
    Halted { after_day: usize },
}

/// Outcome of one presented day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayOutcome {
    pub label: String,
    pub outcome: DisclosureOutcome,
}

/// Summary of a finished session, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub days: Vec<DayOutcome>,
    pub end: SessionEnd,
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Advance the session by one step.
///
/// Days absent from `days` are presented as empty records. Terminal states
/// are absorbing.
pub fn session_transition(
    state: SessionState,
    days: &DayCollection,
    input: Input,
) -> SessionTransition {
    let last = REQUIRED_DAYS.len() - 1;

    match state {
        SessionState::Day {
            index,
            state: DayState::Done,
        } => {
            if index >= last {
                SessionTransition {
                    next: SessionState::Completed,
                    effect: Effect::None,
                    resolved: None,
                }
            } else {
                SessionTransition {
                    next: SessionState::AwaitingContinue { index },
                    effect: Effect::Ask(CONTINUE_PROMPT),
                    resolved: None,
                }
            }
        }
        SessionState::Day { index, state } => {
            let record = days.get_or_empty(REQUIRED_DAYS[index]);
            let t = transition(state, &record, index + 1, input);
            let resolved = match t.next {
                DayState::Resolved(outcome) => Some((index, outcome)),
                _ => None,
            };
            SessionTransition {
                next: SessionState::Day {
                    index,
                    state: t.next,
                },
                effect: t.effect,
                resolved,
            }
        }
        SessionState::AwaitingContinue { index } => match input {
            Input::Advance => SessionTransition {
                next: state,
                effect: Effect::None,
                resolved: None,
            },
            Input::Answer(Answer::Yes) => SessionTransition {
                next: SessionState::Day {
                    index: index + 1,
                    state: DayState::Start,
                },
                effect: Effect::None,
                resolved: None,
            },
            Input::Answer(Answer::No) => SessionTransition {
                next: SessionState::Halted {
                    after_day: index + 1,
                },
                effect: Effect::Show(HALT_MESSAGE.to_string()),
                resolved: None,
            },
        },
        SessionState::Halted { .. } | SessionState::Completed => SessionTransition {
            next: state,
            effect: Effect::None,
            resolved: None,
        },
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Run a full session against `responder`, blocking on each question.
///
/// Never mutates `days`. Responder I/O failures end the session with
/// [`DisclosureError::Channel`].
pub fn run_session(
    days: &DayCollection,
    responder: &mut dyn Responder,
) -> Result<SessionReport, DisclosureError> {
    let mut state = SessionState::initial();
    let mut input = Input::Advance;
    let mut outcomes = Vec::new();

    loop {
        let t = session_transition(state, days, input);
        input = Input::Advance;

        if let Some((index, outcome)) = t.resolved {
            let label = REQUIRED_DAYS[index];
            tracing::info!(day = label, %outcome, "day resolved");
            outcomes.push(DayOutcome {
                label: label.to_string(),
                outcome,
            });
        }

        match t.effect {
            Effect::Show(text) => responder.show(&text)?,
            Effect::Ask(prompt) => {
                let reply = responder.ask(prompt)?;
                input = Input::Answer(Answer::classify(&reply));
            }
            Effect::None => {}
        }

        state = t.next;
        let end = match state {
            SessionState::Completed => SessionEnd::Completed,
            SessionState::Halted { after_day } => SessionEnd::Halted { after_day },
            _ => continue,
        };

        tracing::info!(days_shown = outcomes.len(), ?end, "disclosure session finished");
        return Ok(SessionReport {
            days: outcomes,
            end,
        });
    }
}
