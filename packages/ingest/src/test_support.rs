//! In-memory judge and publisher used by the engine and run tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use leetsync_ingest_models::{Layout, Settings};
use leetsync_judge::{AuthError, FetchError, JudgeClient};
use leetsync_judge_models::{
    ACCEPTED, PAGE_SIZE, Submission, SubmissionDetail, SubmissionPage,
};
use leetsync_publish::{PublishError, Publisher};

/// Settings pointing at a fresh directory under the system temp dir.
pub fn scratch_settings(name: &str) -> Settings {
    let root = std::env::temp_dir().join(format!("leetsync_{name}"));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(&root).unwrap();
    let output_dir = root.join("solutions");

    Settings {
        cookie: "test-session".to_owned(),
        push_dir: output_dir.clone(),
        output_dir,
        retention_days: 1,
        overwrite: false,
        pending_file: root.join("pending.txt"),
        layout: Layout::Flat,
        endpoint: leetsync_judge::leetcode::DEFAULT_ENDPOINT.to_owned(),
    }
}

/// Removes the scratch directory created by [`scratch_settings`].
pub fn cleanup(settings: &Settings) {
    if let Some(root) = settings.pending_file.parent() {
        let _ = std::fs::remove_dir_all(root);
    }
}

/// A submission made `age_secs` seconds ago.
pub fn submission(id: u64, language: &str, status: &str, age_secs: i64) -> Submission {
    Submission {
        id,
        language: language.to_owned(),
        status: status.to_owned(),
        timestamp: chrono::Utc::now().timestamp() - age_secs,
        url: format!("/submissions/detail/{id}/"),
        title: String::new(),
    }
}

pub fn accepted(id: u64, language: &str, age_secs: i64) -> Submission {
    submission(id, language, ACCEPTED, age_secs)
}

pub fn detail(problem_id: &str, title: &str, code: &str) -> SubmissionDetail {
    SubmissionDetail {
        source_code: code.to_owned(),
        problem_id: problem_id.to_owned(),
        problem_title: title.to_owned(),
    }
}

/// Serves fixed pages and details, recording every request.
///
/// Submissions without a registered detail fail to resolve.
#[derive(Default)]
pub struct FakeJudge {
    pages: Vec<Vec<Submission>>,
    details: BTreeMap<u64, SubmissionDetail>,
    failing_offsets: BTreeSet<u32>,
    reject_login: bool,
    list_requests: Mutex<Vec<u32>>,
    detail_requests: Mutex<Vec<u64>>,
}

impl FakeJudge {
    pub fn new(pages: Vec<Vec<Submission>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn with_detail(mut self, id: u64, detail: SubmissionDetail) -> Self {
        self.details.insert(id, detail);
        self
    }

    pub fn failing_list_at(mut self, offset: u32) -> Self {
        self.failing_offsets.insert(offset);
        self
    }

    pub const fn rejecting_login(mut self) -> Self {
        self.reject_login = true;
        self
    }

    pub fn list_requests(&self) -> Vec<u32> {
        self.list_requests.lock().unwrap().clone()
    }

    pub fn detail_requests(&self) -> Vec<u64> {
        self.detail_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl JudgeClient for FakeJudge {
    async fn login(&self) -> Result<(), AuthError> {
        if self.reject_login {
            return Err(AuthError::Rejected { attempts: 3 });
        }
        Ok(())
    }

    async fn list_submissions(&self, offset: u32) -> Result<SubmissionPage, FetchError> {
        self.list_requests.lock().unwrap().push(offset);
        if self.failing_offsets.contains(&offset) {
            return Err(FetchError::Decode {
                message: "unexpected body".to_owned(),
            });
        }

        let index = (offset / PAGE_SIZE) as usize;
        Ok(SubmissionPage {
            submissions: self.pages.get(index).cloned().unwrap_or_default(),
            has_next: index + 1 < self.pages.len(),
            last_key: None,
        })
    }

    async fn fetch_detail(&self, submission_id: u64) -> Result<SubmissionDetail, FetchError> {
        self.detail_requests.lock().unwrap().push(submission_id);
        self.details
            .get(&submission_id)
            .cloned()
            .ok_or(FetchError::MissingDetail { id: submission_id })
    }
}

/// Records the directories it was asked to publish.
#[derive(Default)]
pub struct FakePublisher {
    fail: bool,
    published: Mutex<Vec<PathBuf>>,
}

impl FakePublisher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn published(&self) -> Vec<PathBuf> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for FakePublisher {
    async fn publish(&self, dir: &Path) -> Result<(), PublishError> {
        self.published.lock().unwrap().push(dir.to_path_buf());
        if self.fail {
            return Err(PublishError::StepFailed {
                step: "git push".to_owned(),
                status: "exit status: 1".to_owned(),
                output: "rejected".to_owned(),
            });
        }
        Ok(())
    }
}
