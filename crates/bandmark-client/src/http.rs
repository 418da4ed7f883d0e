//! HTTP exam API implementation.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use bandmark_core::error::ApiError;
use bandmark_core::model::{Question, QuestionKind, Skill, TestSet};
use bandmark_core::traits::{ExamApi, FetchRequest, ScoreSubmission};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Exam API backed by the hosted exam service.
pub struct HttpExamApi {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpExamApi {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("x-api-key", key),
            None => builder,
        }
    }
}

/// A test set as the wire sends it: the question list stays loosely typed so
/// one malformed question degrades instead of failing the fetch.
#[derive(Deserialize)]
struct WireTestSet {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    skill: Option<String>,
    #[serde(default)]
    part: Option<u32>,
    #[serde(default)]
    questions: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct WireError {
    message: String,
}

fn convert_test_set(wire: WireTestSet, requested_skill: Skill) -> TestSet {
    let skill = wire
        .skill
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(requested_skill);

    let questions = wire
        .questions
        .into_iter()
        .map(|value| match serde_json::from_value::<Question>(value.clone()) {
            Ok(question) => question,
            Err(e) => {
                let id = value
                    .get("id")
                    .map(|v| match v {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .unwrap_or_default();
                tracing::warn!("malformed question '{id}' will score zero: {e}");
                Question {
                    id,
                    text: String::new(),
                    kind: QuestionKind::Unsupported,
                }
            }
        })
        .collect();

    TestSet {
        id: wire.id,
        name: wire.name,
        description: wire.description,
        skill,
        part: wire.part,
        questions,
    }
}

/// Map an error response to a typed [`ApiError`].
async fn classify_response(
    response: reqwest::Response,
    test_id: &str,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status().as_u16();
    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5)
            * 1000;
        return Err(ApiError::RateLimited {
            retry_after_ms: retry_after,
        });
    }
    if status == 401 {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::AuthenticationFailed(body));
    }
    if status == 404 {
        return Err(ApiError::TestNotFound(test_id.to_string()));
    }
    if status >= 400 {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<WireError>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        return Err(ApiError::Api { status, message });
    }
    Ok(response)
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout(DEFAULT_TIMEOUT_SECS)
    } else {
        ApiError::Network(e.to_string())
    }
}

#[async_trait]
impl ExamApi for HttpExamApi {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, request), fields(test_id = %request.test_id))]
    async fn fetch_test(&self, request: &FetchRequest) -> anyhow::Result<TestSet> {
        let mut url = format!(
            "{}/api/exams/{}/{}",
            self.base_url, request.skill, request.test_id
        );
        if let Some(part) = request.part {
            url.push_str(&format!("?part={part}"));
        }

        let response = self
            .request(self.client.get(url))
            .send()
            .await
            .map_err(transport_error)?;
        let response = classify_response(response, &request.test_id).await?;

        let wire: WireTestSet = response.json().await.map_err(|e| ApiError::Api {
            status: 0,
            message: format!("failed to parse response: {e}"),
        })?;

        Ok(convert_test_set(wire, request.skill))
    }

    #[instrument(skip(self, submission), fields(test_id = %submission.test_id))]
    async fn submit_score(&self, submission: &ScoreSubmission) -> anyhow::Result<()> {
        let url = format!(
            "{}/api/attempts/{}/score",
            self.base_url, submission.attempt_id
        );

        let response = self
            .request(self.client.post(url))
            .json(submission)
            .send()
            .await
            .map_err(transport_error)?;
        classify_response(response, &submission.test_id).await?;

        Ok(())
    }
}
