// Interview Simulation Pipeline
// Four role-played stages with a fixed dependency graph:
//   recruiter → ∅, candidate → ∅, interview → {recruiter, candidate}, answer → {interview, candidate}
// All model calls go through llm_client::CompletionModel.

pub mod graph;
pub mod orchestrator;
pub mod prompts;
pub mod runner;
pub mod stage;

pub use orchestrator::{PipelineError, PipelineInput, PipelineOrchestrator, PipelineOutcome};
pub use runner::StageExecutionError;
pub use stage::StageName;
