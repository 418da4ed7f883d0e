//! Mock exam API for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use bandmark_core::error::ApiError;
use bandmark_core::model::TestSet;
use bandmark_core::traits::{ExamApi, FetchRequest, ScoreSubmission};

/// A mock exam API for exercising the attempt engine and CLI without a
/// remote service.
///
/// Serves configured test sets by id and records everything submitted.
pub struct MockExamApi {
    /// Test sets keyed by test id.
    tests: HashMap<String, TestSet>,
    /// Whether submissions should fail.
    fail_submissions: bool,
    /// Number of fetches made.
    fetch_count: AtomicU32,
    /// Every submission received.
    submissions: Mutex<Vec<ScoreSubmission>>,
    /// Last fetch request received.
    last_fetch: Mutex<Option<FetchRequest>>,
}

impl MockExamApi {
    /// Create a mock serving the given test sets, keyed by their ids.
    pub fn new(sets: impl IntoIterator<Item = TestSet>) -> Self {
        Self {
            tests: sets.into_iter().map(|s| (s.id.clone(), s)).collect(),
            fail_submissions: false,
            fetch_count: AtomicU32::new(0),
            submissions: Mutex::new(Vec::new()),
            last_fetch: Mutex::new(None),
        }
    }

    /// Make every submission fail with an API error.
    pub fn with_failing_submissions(mut self) -> Self {
        self.fail_submissions = true;
        self
    }

    /// Number of fetches made against this mock.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    /// Every submission received, in order.
    pub fn submissions(&self) -> Vec<ScoreSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    /// The last fetch request received.
    pub fn last_fetch(&self) -> Option<FetchRequest> {
        self.last_fetch.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExamApi for MockExamApi {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_test(&self, request: &FetchRequest) -> anyhow::Result<TestSet> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        *self.last_fetch.lock().unwrap() = Some(request.clone());

        self.tests
            .get(&request.test_id)
            .cloned()
            .ok_or_else(|| ApiError::TestNotFound(request.test_id.clone()).into())
    }

    async fn submit_score(&self, submission: &ScoreSubmission) -> anyhow::Result<()> {
        self.submissions.lock().unwrap().push(submission.clone());
        if self.fail_submissions {
            return Err(ApiError::Api {
                status: 503,
                message: "submission endpoint unavailable".into(),
            }
            .into());
        }
        Ok(())
    }
}
