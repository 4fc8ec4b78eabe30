//! Core library for careplan: post-processing of generated 7-day care plans
//! and the day-by-day disclosure flow that presents them.
//!
//! ```text
//! raw text --normalize--> --filter--> --validate--> --segment--> DayCollection
//!                                                                     |
//!                                          run_session(days, responder)
//! ```

pub mod artifacts;
pub mod disclosure;
pub mod generator;
pub mod markers;
pub mod plan;
pub mod prompt;

pub use disclosure::{
    Answer, DisclosureError, DisclosureOutcome, Responder, SessionEnd, SessionReport,
    StdioResponder, run_session,
};
pub use generator::{ChatCompletionsClient, GenerateError, GeneratorConfig, PlanGenerator};
pub use plan::{
    DayCollection, DayRecord, GeneratePlanError, PlanError, ProcessedPlan, generate_plan,
    process_plan,
};
