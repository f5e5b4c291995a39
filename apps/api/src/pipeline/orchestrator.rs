//! Pipeline orchestration. Drives every stage of one interview simulation.
//!
//! Flow: fetch GitHub profile → format (fallback on failure) → recruiter →
//!       candidate → interview → answer.
//!
//! The orchestrator is stateless across runs: each `run_pipeline` call owns its
//! own `StageOutputs`, so concurrent requests can share one instance.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::github::{format_profile, FetchResult, ProfileFetcher};
use crate::llm_client::CompletionModel;

use super::graph::{execution_order, GraphError};
use super::prompts::default_stages;
use super::runner::{StageExecutionError, StageRunner};
use super::stage::{StageName, StageOutputs, StageSpec, StaticArgs};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Stage(#[from] StageExecutionError),

    #[error("invalid stage table: {0}")]
    Graph(#[from] GraphError),
}

/// Request-level inputs of one run.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub recruiter_text: String,
    pub resume_text: String,
    pub github_url: String,
    pub job_description: String,
}

/// One executed stage, in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    pub stage: StageName,
    pub output: String,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub run_id: Uuid,
    /// Output of the last stage.
    pub answer: String,
    pub transcript: Vec<StageRecord>,
    /// The GitHub text block the candidate stage received.
    pub github_profile: String,
    pub github_fetched: bool,
}

pub struct PipelineOrchestrator {
    runner: StageRunner,
    fetcher: Arc<dyn ProfileFetcher>,
    stages: Vec<StageSpec>,
    order: Vec<usize>,
}

impl PipelineOrchestrator {
    /// Orchestrator over the fixed four-stage table.
    pub fn new(
        model: Arc<dyn CompletionModel>,
        fetcher: Arc<dyn ProfileFetcher>,
    ) -> Result<Self, PipelineError> {
        Self::with_stages(model, fetcher, default_stages())
    }

    /// Validates `stages` (duplicates, undeclared dependencies, cycles) up front.
    pub fn with_stages(
        model: Arc<dyn CompletionModel>,
        fetcher: Arc<dyn ProfileFetcher>,
        stages: Vec<StageSpec>,
    ) -> Result<Self, PipelineError> {
        let order = execution_order(&stages)?;
        Ok(Self {
            runner: StageRunner::new(model),
            fetcher,
            stages,
            order,
        })
    }

    pub fn stage_order(&self) -> Vec<StageName> {
        self.order.iter().map(|&i| self.stages[i].name).collect()
    }

    /// Runs every stage strictly in order. The first failing stage aborts the run;
    /// nothing after it is executed and no partial transcript is returned.
    pub async fn run_pipeline(&self, input: PipelineInput) -> Result<PipelineOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        info!(
            "Pipeline run {run_id} started (model: {})",
            self.runner.model_id()
        );

        // Fetched once, before any stage. Failure degrades to fallback text.
        let fetched = self.fetcher.fetch(&input.github_url).await;
        if let FetchResult::Failed(reason) = &fetched {
            warn!(
                "Run {run_id}: GitHub data unavailable for {} ({reason}); using fallback text",
                input.github_url
            );
        }
        let github_profile = format_profile(&input.github_url, &fetched);

        let args = StaticArgs {
            recruiter_text: input.recruiter_text,
            resume_text: input.resume_text,
            github_url: input.github_url,
            github_profile,
            job_description: input.job_description,
        };

        let mut outputs = StageOutputs::new();
        let mut transcript = Vec::with_capacity(self.order.len());

        for &index in &self.order {
            let stage = &self.stages[index];
            let started = Instant::now();
            info!("Run {run_id}: stage '{}' started", stage.name);

            let text = self
                .runner
                .run(stage, &outputs, &args)
                .await
                .inspect_err(|e| error!("Run {run_id}: {e}; aborting remaining stages"))?;

            let elapsed_ms = started.elapsed().as_millis() as u64;
            info!(
                "Run {run_id}: stage '{}' finished in {elapsed_ms}ms ({} chars)",
                stage.name,
                text.len()
            );

            outputs.record(stage.name, text.clone());
            transcript.push(StageRecord {
                stage: stage.name,
                output: text,
                elapsed_ms,
            });
        }

        let answer = transcript
            .last()
            .map(|record| record.output.clone())
            .unwrap_or_default();
        info!(
            "Pipeline run {run_id} completed: {} stages",
            outputs.len()
        );

        Ok(PipelineOutcome {
            run_id,
            answer,
            transcript,
            github_profile: args.github_profile,
            github_fetched: fetched.is_ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::ProfileSummary;
    use crate::llm_client::LlmError;
    use crate::pipeline::stage::StageInputs;
    use async_trait::async_trait;
    use std::sync::Mutex;

    type EventLog = Arc<Mutex<Vec<String>>>;

    /// Echoes the prompt back, logging the persona line of each call.
    /// Fails on the `fail_on`-th call (1-based) if set.
    struct EchoModel {
        events: EventLog,
        prompts: Mutex<Vec<String>>,
        fail_on: Option<usize>,
    }

    impl EchoModel {
        fn new(events: EventLog, fail_on: Option<usize>) -> Self {
            Self {
                events,
                prompts: Mutex::new(Vec::new()),
                fail_on,
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionModel for EchoModel {
        fn model_id(&self) -> &str {
            "echo"
        }

        async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
            let call = {
                let mut prompts = self.prompts.lock().unwrap();
                prompts.push(prompt.to_string());
                prompts.len()
            };
            let persona = system.lines().next().unwrap_or_default().to_string();
            self.events.lock().unwrap().push(format!("model:{persona}"));

            if self.fail_on == Some(call) {
                return Err(LlmError::RetriesExhausted {
                    attempts: 3,
                    last: Box::new(LlmError::Api {
                        status: 429,
                        message: "quota exceeded".to_string(),
                    }),
                });
            }
            Ok(prompt.to_string())
        }
    }

    struct StubFetcher {
        events: EventLog,
        result: FetchResult,
    }

    #[async_trait]
    impl ProfileFetcher for StubFetcher {
        async fn fetch(&self, profile_url: &str) -> FetchResult {
            self.events
                .lock()
                .unwrap()
                .push(format!("fetch:{profile_url}"));
            self.result.clone()
        }
    }

    fn input() -> PipelineInput {
        PipelineInput {
            recruiter_text: "Startup recruiter, direct.".to_string(),
            resume_text: "Full stack developer, Python and React.".to_string(),
            github_url: "https://github.com/amaarkhan".to_string(),
            job_description: "Senior Full Stack Developer".to_string(),
        }
    }

    fn summary() -> ProfileSummary {
        ProfileSummary {
            display_name: "Amaar Khan".to_string(),
            bio: "No bio available".to_string(),
            company: "Not specified".to_string(),
            location: "Not specified".to_string(),
            blog_url: "No blog".to_string(),
            public_repo_count: 12,
            follower_count: 0,
            following_count: 0,
            created_at: String::new(),
            top_repositories: vec![],
        }
    }

    fn setup(
        fail_on: Option<usize>,
        fetched: FetchResult,
    ) -> (Arc<EchoModel>, Arc<StubFetcher>, EventLog) {
        let events: EventLog = Arc::default();
        let model = Arc::new(EchoModel::new(events.clone(), fail_on));
        let fetcher = Arc::new(StubFetcher {
            events: events.clone(),
            result: fetched,
        });
        (model, fetcher, events)
    }

    fn saw(stage: StageName, inputs: &StageInputs<'_>) -> String {
        format!("STAGE:{stage} SAW:{}", inputs.names().join(","))
    }

    fn recruiter_saw(inputs: &StageInputs<'_>, _: &StaticArgs) -> String {
        saw(StageName::Recruiter, inputs)
    }

    fn candidate_saw(inputs: &StageInputs<'_>, _: &StaticArgs) -> String {
        saw(StageName::Candidate, inputs)
    }

    fn interview_saw(inputs: &StageInputs<'_>, _: &StaticArgs) -> String {
        saw(StageName::Interview, inputs)
    }

    fn answer_saw(inputs: &StageInputs<'_>, _: &StaticArgs) -> String {
        saw(StageName::Answer, inputs)
    }

    /// Same graph as the production table, with templates that only report what they saw.
    fn saw_stages() -> Vec<StageSpec> {
        default_stages()
            .into_iter()
            .map(|mut spec| {
                spec.template = match spec.name {
                    StageName::Recruiter => recruiter_saw,
                    StageName::Candidate => candidate_saw,
                    StageName::Interview => interview_saw,
                    StageName::Answer => answer_saw,
                };
                spec
            })
            .collect()
    }

    #[tokio::test]
    async fn test_each_stage_sees_exactly_its_dependencies() {
        let (model, fetcher, _) = setup(None, FetchResult::Ok(summary()));
        let orchestrator =
            PipelineOrchestrator::with_stages(model, fetcher, saw_stages()).unwrap();

        let outcome = orchestrator.run_pipeline(input()).await.unwrap();

        assert_eq!(outcome.answer, "STAGE:answer SAW:candidate,interview");
        let outputs: Vec<_> = outcome
            .transcript
            .iter()
            .map(|r| r.output.as_str())
            .collect();
        assert_eq!(
            outputs,
            vec![
                "STAGE:recruiter SAW:",
                "STAGE:candidate SAW:",
                "STAGE:interview SAW:candidate,recruiter",
                "STAGE:answer SAW:candidate,interview",
            ]
        );
    }

    #[tokio::test]
    async fn test_stages_run_in_fixed_order_after_fetch() {
        let (model, fetcher, events) = setup(None, FetchResult::Ok(summary()));
        let orchestrator = PipelineOrchestrator::new(model, fetcher).unwrap();

        assert_eq!(
            orchestrator.stage_order(),
            vec![
                StageName::Recruiter,
                StageName::Candidate,
                StageName::Interview,
                StageName::Answer
            ]
        );

        orchestrator.run_pipeline(input()).await.unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "fetch:https://github.com/amaarkhan",
                "model:You are the Recruiter Research Analyst.",
                "model:You are the Candidate Research Analyst.",
                "model:You are the Mock Interviewer.",
                "model:You are the Mock Candidate.",
            ]
        );
    }

    #[tokio::test]
    async fn test_outputs_flow_into_dependent_prompts() {
        let (model, fetcher, _) = setup(None, FetchResult::Ok(summary()));
        let orchestrator = PipelineOrchestrator::new(model.clone(), fetcher).unwrap();

        let outcome = orchestrator.run_pipeline(input()).await.unwrap();

        let prompts = model.prompts.lock().unwrap();
        // Echo model: each stage's output is its own prompt.
        assert!(prompts[2].contains(&prompts[0]));
        assert!(prompts[2].contains(&prompts[1]));
        assert!(prompts[3].contains(&prompts[2]));
        assert!(prompts[1].contains("GitHub Profile Analysis for https://github.com/amaarkhan"));
        assert_eq!(outcome.answer, prompts[3]);
        assert!(outcome.github_fetched);
        assert_eq!(outcome.transcript.len(), 4);
    }

    #[tokio::test]
    async fn test_failed_fetch_degrades_to_fallback_text() {
        let (model, fetcher, _) = setup(
            None,
            FetchResult::Failed("GitHub API returned status 404 for user, 404 for repos".into()),
        );
        let orchestrator = PipelineOrchestrator::new(model.clone(), fetcher).unwrap();

        let outcome = orchestrator.run_pipeline(input()).await.unwrap();

        assert!(!outcome.github_fetched);
        assert!(outcome.github_profile.contains("could not be fetched"));
        assert!(model.prompts.lock().unwrap()[1].contains("could not be fetched"));
        assert_eq!(model.calls(), 4);
    }

    #[tokio::test]
    async fn test_recruiter_failure_skips_remaining_stages() {
        let (model, fetcher, _) = setup(Some(1), FetchResult::Ok(summary()));
        let orchestrator = PipelineOrchestrator::new(model.clone(), fetcher).unwrap();

        let err = orchestrator.run_pipeline(input()).await.unwrap_err();

        match err {
            PipelineError::Stage(e) => assert_eq!(e.stage, StageName::Recruiter),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_interview_failure_stops_before_answer() {
        let (model, fetcher, _) = setup(Some(3), FetchResult::Ok(summary()));
        let orchestrator = PipelineOrchestrator::new(model.clone(), fetcher).unwrap();

        let err = orchestrator.run_pipeline(input()).await.unwrap_err();

        assert!(err.to_string().contains("stage 'interview' failed"));
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(model.calls(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_runs_are_isolated() {
        let (model, fetcher, _) = setup(None, FetchResult::Ok(summary()));
        let orchestrator =
            PipelineOrchestrator::with_stages(model.clone(), fetcher, saw_stages()).unwrap();

        let (a, b) = tokio::join!(
            orchestrator.run_pipeline(input()),
            orchestrator.run_pipeline(input())
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_ne!(a.run_id, b.run_id);
        assert_eq!(a.answer, b.answer);
        assert_eq!(a.transcript.len(), 4);
        assert_eq!(b.transcript.len(), 4);
        assert_eq!(model.calls(), 8);
    }

    #[test]
    fn test_invalid_stage_table_is_rejected_at_construction() {
        let (model, fetcher, _) = setup(None, FetchResult::Ok(summary()));
        let mut stages = saw_stages();
        stages.retain(|s| s.name != StageName::Recruiter);

        let result = PipelineOrchestrator::with_stages(model, fetcher, stages);
        assert!(matches!(
            result,
            Err(PipelineError::Graph(GraphError::UnknownDependency {
                stage: StageName::Interview,
                dependency: StageName::Recruiter,
            }))
        ));
    }
}
