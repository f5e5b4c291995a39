//! Executes a single stage: render the prompt from declared inputs, call the model.

use std::sync::Arc;

use thiserror::Error;

use crate::llm_client::{CompletionModel, LlmError};

use super::stage::{StageName, StageOutputs, StageSpec, StaticArgs};

/// The model capability gave up on a stage. Fatal for the run.
#[derive(Debug, Error)]
#[error("stage '{stage}' failed: {source}")]
pub struct StageExecutionError {
    pub stage: StageName,
    #[source]
    pub source: LlmError,
}

/// Runs stages against one model. Holds no per-run state.
#[derive(Clone)]
pub struct StageRunner {
    model: Arc<dyn CompletionModel>,
}

impl StageRunner {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// No caching: identical prompts are sent again.
    pub async fn run(
        &self,
        stage: &StageSpec,
        prior: &StageOutputs,
        args: &StaticArgs,
    ) -> Result<String, StageExecutionError> {
        let prompt = stage.render(prior, args);
        self.model
            .complete(&prompt, &stage.system)
            .await
            .map_err(|source| StageExecutionError {
                stage: stage.name,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stage::StageInputs;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns the prompt it was given; remembers every (prompt, system) pair.
    #[derive(Default)]
    struct EchoModel {
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl CompletionModel for EchoModel {
        fn model_id(&self) -> &str {
            "echo"
        }

        async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
            self.seen
                .lock()
                .unwrap()
                .push((prompt.to_string(), system.to_string()));
            Ok(prompt.to_string())
        }
    }

    struct DownModel;

    #[async_trait]
    impl CompletionModel for DownModel {
        fn model_id(&self) -> &str {
            "down"
        }

        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Err(LlmError::RetriesExhausted {
                attempts: 3,
                last: Box::new(LlmError::Api {
                    status: 503,
                    message: "model overloaded".to_string(),
                }),
            })
        }
    }

    fn saw_template(inputs: &StageInputs<'_>, _: &StaticArgs) -> String {
        format!("SAW:{}", inputs.names().join(","))
    }

    fn spec() -> StageSpec {
        StageSpec {
            name: StageName::Interview,
            dependencies: vec![StageName::Recruiter, StageName::Candidate],
            template: saw_template,
            system: "interviewer persona".to_string(),
        }
    }

    #[tokio::test]
    async fn test_run_passes_only_declared_outputs_and_system_prompt() {
        let model = Arc::new(EchoModel::default());
        let runner = StageRunner::new(model.clone());
        let mut prior = StageOutputs::new();
        prior.record(StageName::Recruiter, "r".to_string());
        prior.record(StageName::Candidate, "c".to_string());
        prior.record(StageName::Answer, "leak".to_string());

        let output = runner
            .run(&spec(), &prior, &StaticArgs::default())
            .await
            .unwrap();

        assert_eq!(output, "SAW:candidate,recruiter");
        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, "interviewer persona");
    }

    #[tokio::test]
    async fn test_identical_prompts_are_not_deduplicated() {
        let model = Arc::new(EchoModel::default());
        let runner = StageRunner::new(model.clone());
        let prior = StageOutputs::new();
        let args = StaticArgs::default();

        runner.run(&spec(), &prior, &args).await.unwrap();
        runner.run(&spec(), &prior, &args).await.unwrap();

        assert_eq!(model.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_model_failure_becomes_stage_error() {
        let runner = StageRunner::new(Arc::new(DownModel));
        let err = runner
            .run(&spec(), &StageOutputs::new(), &StaticArgs::default())
            .await
            .unwrap_err();

        assert_eq!(err.stage, StageName::Interview);
        assert!(err.to_string().starts_with("stage 'interview' failed"));
        assert!(err.to_string().contains("model overloaded"));
    }
}
