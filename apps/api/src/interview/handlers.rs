//! Axum route handlers for interview generation.

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::report::format_interview_result;
use crate::pipeline::orchestrator::StageRecord;
use crate::pipeline::PipelineInput;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Missing fields deserialize as empty and are reported together by `validate`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub recruiter_text: String,
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub include_transcript: bool,
}

impl GenerateRequest {
    pub fn validate(self) -> Result<PipelineInput, AppError> {
        let missing: Vec<&str> = [
            ("recruiter_text", &self.recruiter_text),
            ("resume_text", &self.resume_text),
            ("github_url", &self.github_url),
            ("job_description", &self.job_description),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(PipelineInput {
            recruiter_text: self.recruiter_text,
            resume_text: self.resume_text,
            github_url: self.github_url.trim().to_string(),
            job_description: self.job_description,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub result: String,
    pub timestamp: String,
    pub run_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Vec<StageRecord>>,
}

/// Accepts the request body as a urlencoded form or as JSON, by Content-Type.
pub struct GenerateInput(pub GenerateRequest);

#[async_trait]
impl<S> FromRequest<S> for GenerateInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(body) = Form::<GenerateRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            Ok(Self(body))
        } else {
            let Json(body) = Json::<GenerateRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            Ok(Self(body))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate, POST /api/generate
///
/// Runs the full simulation: GitHub fetch → recruiter → candidate → interview → answer.
/// The whole run is bounded by PIPELINE_TIMEOUT_SECS.
pub async fn handle_generate(
    State(state): State<AppState>,
    GenerateInput(request): GenerateInput,
) -> Result<Json<GenerateResponse>, AppError> {
    let include_transcript = request.include_transcript;
    let input = request.validate()?;

    let timeout = state.config.pipeline_timeout;
    let outcome = tokio::time::timeout(timeout, state.orchestrator.run_pipeline(input))
        .await
        .map_err(|_| AppError::Timeout(timeout.as_secs()))??;

    let result = format_interview_result(&outcome.answer);
    let now = Local::now();

    let result_file = match &state.results {
        Some(store) => match store.save(outcome.run_id, &result, now).await {
            Ok(file_name) => Some(file_name),
            Err(e) => {
                warn!("Run {}: could not persist result: {e:#}", outcome.run_id);
                None
            }
        },
        None => None,
    };

    info!(
        "Run {} served (github data: {})",
        outcome.run_id,
        if outcome.github_fetched { "live" } else { "fallback" }
    );

    Ok(Json(GenerateResponse {
        success: true,
        result,
        timestamp: now.to_rfc3339(),
        run_id: outcome.run_id,
        result_file,
        transcript: include_transcript.then_some(outcome.transcript),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> GenerateRequest {
        GenerateRequest {
            recruiter_text: "Direct startup recruiter".to_string(),
            resume_text: "Full stack developer".to_string(),
            github_url: "  https://github.com/amaarkhan ".to_string(),
            job_description: "Senior Full Stack Developer".to_string(),
            include_transcript: false,
        }
    }

    #[test]
    fn test_validate_accepts_complete_request() {
        let input = full_request().validate().unwrap();
        assert_eq!(input.github_url, "https://github.com/amaarkhan");
        assert_eq!(input.recruiter_text, "Direct startup recruiter");
    }

    #[test]
    fn test_validate_lists_every_missing_field() {
        let request = GenerateRequest {
            resume_text: "   ".to_string(),
            job_description: String::new(),
            ..full_request()
        };
        match request.validate() {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Missing required fields: resume_text, job_description");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_request_deserializes_with_missing_fields() {
        let request: GenerateRequest =
            serde_json::from_str(r#"{"recruiter_text":"r","include_transcript":true}"#).unwrap();
        assert_eq!(request.recruiter_text, "r");
        assert!(request.resume_text.is_empty());
        assert!(request.include_transcript);
    }
}
