//! Plan generator interface and the hosted chat-completions client.
//!
//! ```text
//! report --PlanGenerator::generate--> raw text --process_plan--> ProcessedPlan
//! ```

pub mod chat;
pub mod trait_def;

pub use chat::{ChatCompletionsClient, GeneratorConfig};
pub use trait_def::{GenerateError, PlanGenerator};
