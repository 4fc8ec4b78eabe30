//! Shared test utilities for careplan integration tests.
//!
//! Provides fixture plan text in the shape the generator is asked to produce,
//! a responder that replays scripted answers and records everything shown,
//! and a generator that returns canned output.

use std::collections::VecDeque;
use std::io;

use async_trait::async_trait;

use careplan_core::disclosure::Responder;
use careplan_core::generator::{GenerateError, PlanGenerator};

// ---------------------------------------------------------------------------
// Fixture text
// ---------------------------------------------------------------------------

/// Which optional sections a fixture day carries.
#[derive(Debug, Clone, Copy)]
pub struct DaySections {
    pub avoid: bool,
    pub benefit: bool,
    pub consequence: bool,
}

impl DaySections {
    pub const ALL: Self = Self {
        avoid: true,
        benefit: true,
        consequence: true,
    };
}

/// Text for one day in generator format, with recognisable per-day content.
pub fn day_text(n: usize, sections: DaySections) -> String {
    let mut out = format!(
        "Day {n}\n\
         🏃 Physical Activity: walk {n}0 minutes → lowers resting BP\n\
         🧘 Mental Wellness: breathing drill {n} → less stress\n\
         🥗 Meals: oats and berries, day {n} portion → fiber\n\
         💧 Hydration: 1.{n} L water → kidney support\n"
    );
    if sections.avoid {
        out.push_str(&format!("❌ Avoid: salty snacks (day {n}) → BP spikes\n"));
    }
    if sections.benefit {
        out.push_str(&format!(
            "✅ Today's risk reduction: stroke risk down {n}%\n"
        ));
    }
    if sections.consequence {
        out.push_str(&format!(
            "⚠ Consequences if skipped: BP stays high on day {n}\n"
        ));
    }
    out
}

/// A complete seven-day plan with every section present.
pub fn full_plan_text() -> String {
    plan_text_with(|_| DaySections::ALL)
}

/// A seven-day plan whose sections are chosen per day number.
pub fn plan_text_with(sections: impl Fn(usize) -> DaySections) -> String {
    let mut out = String::from("7-Day Care Plan\n");
    for n in 1..=7 {
        out.push_str(&day_text(n, sections(n)));
    }
    out
}

/// Raw generator output: reasoning span, chatty preamble, the plan, and a
/// trailing banned section.
pub fn noisy_generator_output() -> String {
    format!(
        "<think>\nThe patient is 90 with stage 2 hypertension.\nDay 1 should be gentle.\n</think>\n\
         Sure! Below is the plan you asked for.\n\n{}\n\
         Monitoring Instructions: check BP twice daily\n\
         Conclusion: stick with it",
        full_plan_text()
    )
}

// ---------------------------------------------------------------------------
// Scripted responder
// ---------------------------------------------------------------------------

/// A [`Responder`] that answers from a fixed script and records the exchange.
///
/// Once the script runs out every further question gets an empty reply.
#[derive(Debug, Default)]
pub struct ScriptedResponder {
    answers: VecDeque<String>,
    /// Every text passed to `show`, in order.
    pub shown: Vec<String>,
    /// Every prompt passed to `ask`, in order.
    pub asked: Vec<String>,
}

impl ScriptedResponder {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            shown: Vec::new(),
            asked: Vec::new(),
        }
    }

    /// Everything shown, joined with newlines.
    pub fn transcript(&self) -> String {
        self.shown.join("\n")
    }

    pub fn remaining_answers(&self) -> usize {
        self.answers.len()
    }
}

impl Responder for ScriptedResponder {
    fn show(&mut self, text: &str) -> io::Result<()> {
        self.shown.push(text.to_string());
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.asked.push(prompt.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}

/// A [`Responder`] whose channel is broken.
#[derive(Debug, Default)]
pub struct BrokenResponder;

impl Responder for BrokenResponder {
    fn show(&mut self, _text: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "output closed"))
    }

    fn ask(&mut self, _prompt: &str) -> io::Result<String> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "input closed"))
    }
}

// ---------------------------------------------------------------------------
// Canned generator
// ---------------------------------------------------------------------------

/// A [`PlanGenerator`] that always returns the same text.
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    pub output: String,
}

impl StaticGenerator {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

#[async_trait]
impl PlanGenerator for StaticGenerator {
    fn name(&self) -> &str {
        "static"
    }

    async fn generate(&self, _report: &str) -> Result<String, GenerateError> {
        Ok(self.output.clone())
    }
}
