//! Attempt orchestration.
//!
//! Fetches a test from an [`ExamApi`] backend, runs the pure scoring engine
//! over the submitted answers, and optionally reports the aggregate back.
//! Transient API failures are retried with exponential backoff; a failed
//! score submission is logged and swallowed so the candidate still gets
//! their result.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use crate::answer::UserAnswer;
use crate::error::ApiError;
use crate::model::{Question, Skill, TestSet};
use crate::report::{AttemptReport, TestSummary};
use crate::scoring::score_test;
use crate::statistics::{summarize, AggregatePolicy};
use crate::traits::{ExamApi, FetchRequest, ScoreSubmission};

/// Configuration for the attempt engine.
#[derive(Debug, Clone)]
pub struct AttemptEngineConfig {
    /// How the accuracy percentage is derived.
    pub policy: AggregatePolicy,
    /// Retries on transient API errors.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub retry_delay: Duration,
    /// Whether to report the aggregate back to the API after scoring.
    pub submit: bool,
}

impl Default for AttemptEngineConfig {
    fn default() -> Self {
        Self {
            policy: AggregatePolicy::default(),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            submit: false,
        }
    }
}

/// Orchestrates fetch, scoring, and submission for one attempt.
pub struct AttemptEngine {
    api: Arc<dyn ExamApi>,
    config: AttemptEngineConfig,
}

impl AttemptEngine {
    pub fn new(api: Arc<dyn ExamApi>, config: AttemptEngineConfig) -> Self {
        Self { api, config }
    }

    /// Run one attempt: fetch the requested parts, score the answers, and
    /// (if configured) submit the aggregate.
    ///
    /// Scoring itself is pure and cannot fail; only fetching can. A failed
    /// submission never fails the attempt.
    pub async fn run(
        &self,
        test_id: &str,
        skill: Skill,
        parts: &[u32],
        answers: &[UserAnswer],
    ) -> Result<AttemptReport> {
        let set = self.fetch_merged(test_id, skill, parts).await?;

        let results = score_test(&set.questions, answers);
        let summary = summarize(&set.questions, &results, self.config.policy);

        let report = AttemptReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            test: TestSummary {
                id: set.id,
                name: set.name,
                skill,
                question_count: set.questions.len(),
            },
            policy: self.config.policy,
            results,
            summary,
        };

        if self.config.submit {
            let submission = ScoreSubmission {
                test_id: test_id.to_string(),
                attempt_id: report.id,
                percentage: report.summary.percentage,
                points: report.summary.points,
                max_points: report.summary.max_points,
                completed_at: report.created_at,
            };
            if let Err(e) = self.api.submit_score(&submission).await {
                tracing::warn!("score submission failed, keeping local result: {e:#}");
            }
        }

        Ok(report)
    }

    /// Fetch the requested parts and merge them into one set, preserving
    /// part order.
    pub async fn fetch_merged(
        &self,
        test_id: &str,
        skill: Skill,
        parts: &[u32],
    ) -> Result<TestSet> {
        let sets = self.fetch_parts(test_id, skill, parts).await?;

        let name = sets
            .first()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| test_id.to_string());
        let description = sets
            .first()
            .map(|s| s.description.clone())
            .unwrap_or_default();
        let questions: Vec<Question> = sets.into_iter().flat_map(|s| s.questions).collect();

        Ok(TestSet {
            id: test_id.to_string(),
            name,
            description,
            skill,
            part: match parts {
                [only] => Some(*only),
                _ => None,
            },
            questions,
        })
    }

    /// Fetch the requested parts concurrently, or the whole paper when no
    /// parts are named.
    async fn fetch_parts(
        &self,
        test_id: &str,
        skill: Skill,
        parts: &[u32],
    ) -> Result<Vec<TestSet>> {
        if parts.is_empty() {
            let set = self
                .fetch_with_retry(FetchRequest {
                    test_id: test_id.to_string(),
                    skill,
                    part: None,
                })
                .await?;
            return Ok(vec![set]);
        }

        futures::future::try_join_all(parts.iter().map(|&part| {
            self.fetch_with_retry(FetchRequest {
                test_id: test_id.to_string(),
                skill,
                part: Some(part),
            })
        }))
        .await
    }

    /// Retry transient API errors with exponential backoff, honoring
    /// rate-limit hints. Permanent errors short-circuit.
    async fn fetch_with_retry(&self, request: FetchRequest) -> Result<TestSet> {
        let mut last_error = None;
        let mut retry_delay = self.config.retry_delay;
        for retry in 0..=self.config.max_retries {
            if retry > 0 {
                tokio::time::sleep(retry_delay).await;
                retry_delay = (retry_delay * 2).min(Duration::from_secs(60));
            }
            match self.api.fetch_test(&request).await {
                Ok(set) => return Ok(set),
                Err(e) => {
                    if let Some(api_error) = e.downcast_ref::<ApiError>() {
                        if api_error.is_permanent() {
                            return Err(e);
                        }
                        if let Some(ms) = api_error.retry_after_ms() {
                            retry_delay = Duration::from_millis(ms);
                        }
                    }
                    tracing::debug!(
                        "fetch attempt {} for '{}' failed: {e:#}",
                        retry + 1,
                        request.test_id
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
    }
}
