//! Plan post-processing: normalization, banned-section removal, validation,
//! and day segmentation.

pub mod filter;
pub mod normalize;
pub mod segment;
pub mod service;
pub mod validate;

pub use filter::remove_banned_sections;
pub use normalize::{locate_payload_start, normalize, normalize_spacing, remove_reasoning_blocks};
pub use segment::{DayCollection, DayRecord, split_days};
pub use service::{GeneratePlanError, ProcessedPlan, generate_plan, process_plan};
pub use validate::{PlanError, validate_days};
