use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::jobs::pipeline::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

/// One upload and its analysis outcome. Records are replaced whole on every
/// status change, so readers never observe a half-written result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub filename: String,
    pub file_size: usize,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobRecord {
    pub fn processing(job_id: Uuid, filename: impl Into<String>, file_size: usize) -> Self {
        Self {
            job_id,
            status: JobStatus::Processing,
            filename: filename.into(),
            file_size,
            created_at: Utc::now(),
            completed_at: None,
            result: None,
            error: None,
        }
    }

    pub fn completed(self, result: AnalysisResult) -> Self {
        Self {
            status: JobStatus::Completed,
            completed_at: Some(Utc::now()),
            result: Some(result),
            error: None,
            ..self
        }
    }

    pub fn failed(self, error: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            completed_at: Some(Utc::now()),
            result: None,
            error: Some(error.into()),
            ..self
        }
    }
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Inserts or replaces the record stored under `record.job_id`.
    async fn put(&self, record: JobRecord);

    async fn get(&self, job_id: Uuid) -> Option<JobRecord>;
}

/// Finished records older than `ttl` are evicted on the next `put`.
/// Records still processing are never evicted.
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<Uuid, JobRecord>>,
    ttl: chrono::Duration,
}

impl InMemoryJobStore {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(5200)),
        }
    }

    fn is_expired(&self, record: &JobRecord, now: DateTime<Utc>) -> bool {
        match (record.status, record.completed_at) {
            (JobStatus::Processing, _) | (_, None) => false,
            (_, Some(finished)) => now - finished >= self.ttl,
        }
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn put(&self, record: JobRecord) {
        let now = Utc::now();
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, existing| !self.is_expired(existing, now));
        let evicted = before - jobs.len();
        if evicted > 0 {
            debug!(evicted, remaining = jobs.len(), "expired job records evicted");
        }
        jobs.insert(record.job_id, record);
    }

    async fn get(&self, job_id: Uuid) -> Option<JobRecord> {
        self.jobs.read().await.get(&job_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryJobStore {
        InMemoryJobStore::with_ttl(Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn test_unknown_job_is_none() {
        let store = store();
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_status_transitions_replace_record() {
        let store = store();
        let id = Uuid::new_v4();
        let record = JobRecord::processing(id, "cv.pdf", 1024);
        store.put(record.clone()).await;

        let stored = store.get(id).await.unwrap();
        assert_eq!(stored.status, JobStatus::Processing);
        assert!(stored.completed_at.is_none());

        store.put(record.failed("Could not read document")).await;
        let stored = store.get(id).await.unwrap();
        assert_eq!(stored.status, JobStatus::Failed);
        assert_eq!(stored.error.as_deref(), Some("Could not read document"));
        assert_eq!(stored.filename, "cv.pdf");
        assert!(stored.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_expired_finished_records_are_evicted_on_put() {
        let store = InMemoryJobStore::with_ttl(Duration::ZERO);
        let pending = Uuid::new_v4();
        let failed = Uuid::new_v4();
        store.put(JobRecord::processing(pending, "a.txt", 1)).await;
        store
            .put(JobRecord::processing(failed, "b.pdf", 1).failed("Could not read document"))
            .await;
        assert!(store.get(failed).await.is_some());

        store.put(JobRecord::processing(Uuid::new_v4(), "c.txt", 1)).await;
        assert!(store.get(failed).await.is_none());
        assert_eq!(
            store.get(pending).await.map(|r| r.status),
            Some(JobStatus::Processing)
        );
    }

    #[tokio::test]
    async fn test_fresh_finished_records_survive_put() {
        let store = store();
        let done = Uuid::new_v4();
        store
            .put(JobRecord::processing(done, "a.txt", 1).failed("boom"))
            .await;
        store.put(JobRecord::processing(Uuid::new_v4(), "b.txt", 1)).await;
        assert!(store.get(done).await.is_some());
    }

    #[test]
    fn test_processing_record_serializes_without_result() {
        let record = JobRecord::processing(Uuid::nil(), "cv.txt", 12);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "processing");
        assert!(json.get("result").is_none());
        assert!(json.get("error").is_none());
    }
}
