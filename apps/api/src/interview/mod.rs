// Interview simulation HTTP boundary: request validation, report wrapping,
// optional persistence of finished runs. The pipeline itself lives in crate::pipeline.

pub mod handlers;
pub mod report;
pub mod store;
