//! # Scheduler
//!
//! JSON-persisted scheduled jobs (spec §6: "a JSON array at a well-known
//! path, each entry `{id, name, type, time|hours|day, csv_path,
//! created_at, last_run}`"), backing the `schedule daily|list|start`
//! command surface. The job-manager convenience wrapper (add/list/remove
//! by name) supplements the scheduler per the Python original's
//! `scheduling/job_manager.py` (SPEC_FULL.md §C.3).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use retail_dw_domain::EtlError;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    Daily,
    Hourly,
    Weekly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledJob {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    /// `HH:MM` for daily/weekly, minute offset for hourly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    pub csv_path: String,
    pub created_at: DateTime<Utc>,
    pub last_run: Option<DateTime<Utc>>,
}

/// Persists scheduled jobs as a JSON array at a well-known path (spec
/// §6). Every mutating call rewrites the whole file; job lists are small
/// enough that this keeps the format trivially inspectable.
pub struct Scheduler {
    path: PathBuf,
}

impl Scheduler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Scheduler { path: path.into() }
    }

    pub async fn list(&self) -> Result<Vec<ScheduledJob>, EtlError> {
        self.read_all().await
    }

    pub async fn add_daily(&self, name: impl Into<String>, time: impl Into<String>, csv_path: impl Into<String>) -> Result<ScheduledJob, EtlError> {
        let job = ScheduledJob {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            schedule_type: ScheduleType::Daily,
            time: Some(time.into()),
            hours: None,
            day: None,
            csv_path: csv_path.into(),
            created_at: Utc::now(),
            last_run: None,
        };
        let mut jobs = self.read_all().await?;
        jobs.push(job.clone());
        self.write_all(&jobs).await?;
        info!(job_id = %job.id, job_name = %job.name, "scheduled job added");
        Ok(job)
    }

    pub async fn remove(&self, id: &str) -> Result<bool, EtlError> {
        let mut jobs = self.read_all().await?;
        let before = jobs.len();
        jobs.retain(|job| job.id != id);
        let removed = jobs.len() != before;
        if removed {
            self.write_all(&jobs).await?;
        }
        Ok(removed)
    }

    pub async fn mark_run(&self, id: &str, at: DateTime<Utc>) -> Result<(), EtlError> {
        let mut jobs = self.read_all().await?;
        if let Some(job) = jobs.iter_mut().find(|job| job.id == id) {
            job.last_run = Some(at);
        }
        self.write_all(&jobs).await
    }

    async fn read_all(&self) -> Result<Vec<ScheduledJob>, EtlError> {
        if !Path::new(&self.path).exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path).await.map_err(|err| EtlError::Infra(err.to_string()))?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents).map_err(|err| EtlError::Infra(format!("malformed scheduler state: {err}")))
    }

    async fn write_all(&self, jobs: &[ScheduledJob]) -> Result<(), EtlError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|err| EtlError::Infra(err.to_string()))?;
        }
        let contents = serde_json::to_string_pretty(jobs).map_err(|err| EtlError::Infra(err.to_string()))?;
        fs::write(&self.path, contents).await.map_err(|err| EtlError::Infra(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_then_list_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let scheduler = Scheduler::new(dir.path().join("jobs.json"));

        let job = scheduler.add_daily("nightly-load", "02:00", "/data/daily.csv").await.unwrap();
        let jobs = scheduler.list().await.unwrap();

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, job.id);
        assert_eq!(jobs[0].schedule_type, ScheduleType::Daily);
    }

    #[tokio::test]
    async fn remove_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let scheduler = Scheduler::new(dir.path().join("jobs.json"));
        let job = scheduler.add_daily("nightly-load", "02:00", "/data/daily.csv").await.unwrap();

        assert!(scheduler.remove(&job.id).await.unwrap());
        assert!(scheduler.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let scheduler = Scheduler::new(dir.path().join("does-not-exist.json"));
        assert!(scheduler.list().await.unwrap().is_empty());
    }
}
