// src/utils/sink.rs

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::{error::AppError, models::submission::SubmissionPayload};

/// The results collaborator: receives the payload once the session is over.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), AppError>;
}

/// Writes the payload as pretty JSON, creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SubmissionSink for JsonFileSink {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(payload)?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| AppError::Delivery(format!("{}: {}", self.path.display(), e)))?;
        tracing::info!(
            "Submission {} written to {}",
            payload.session_id,
            self.path.display()
        );
        Ok(())
    }
}

/// Prints the payload to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

#[async_trait]
impl SubmissionSink for StdoutSink {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), AppError> {
        let body = serde_json::to_string_pretty(payload)?;
        println!("{}", body);
        Ok(())
    }
}

/// Keeps delivered payloads in memory, for embedding hosts and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<SubmissionPayload>>,
}

impl MemorySink {
    pub fn delivered(&self) -> Vec<SubmissionPayload> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SubmissionSink for MemorySink {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), AppError> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.clone());
        Ok(())
    }
}
