//! The remote exam API boundary.
//!
//! The async trait here is implemented by the `bandmark-client` crate; the
//! attempt engine only ever sees this interface. The remote service owns
//! authentication, content management, and grading persistence — this side
//! fetches question definitions and reports derived aggregates, nothing
//! more.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Skill, TestSet};

/// A remote source of test definitions and sink for attempt scores.
#[async_trait]
pub trait ExamApi: Send + Sync {
    /// Human-readable backend name (e.g. "http").
    fn name(&self) -> &str;

    /// Fetch the questions for one test (or one part of it).
    async fn fetch_test(&self, request: &FetchRequest) -> anyhow::Result<TestSet>;

    /// Record an attempt's aggregate score. Best-effort from the caller's
    /// point of view; implementations should not retry internally.
    async fn submit_score(&self, submission: &ScoreSubmission) -> anyhow::Result<()>;
}

/// Request for one test set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Test identifier as known to the remote service.
    pub test_id: String,
    /// Which skill's paper to fetch.
    pub skill: Skill,
    /// Part number, when fetching a single part rather than the whole paper.
    #[serde(default)]
    pub part: Option<u32>,
}

/// The aggregate posted back after an attempt.
///
/// Only derived numbers cross this boundary — never the per-question
/// results, which stay local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub test_id: String,
    pub attempt_id: Uuid,
    /// Rounded accuracy percentage, 0..=100.
    pub percentage: u32,
    pub points: u32,
    pub max_points: u32,
    pub completed_at: DateTime<Utc>,
}
