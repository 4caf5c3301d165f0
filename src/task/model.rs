//! Task snapshots and lifecycle stages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle stage of a task.
///
/// `Accepted -> Generating -> Storing -> Emailing -> Completed`, with `Failed`
/// reachable from any non-terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Accepted,
    Generating,
    Storing,
    Emailing,
    Completed,
    Failed,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed | Stage::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Accepted => "accepted",
            Stage::Generating => "generating",
            Stage::Storing => "storing",
            Stage::Emailing => "emailing",
            Stage::Completed => "completed",
            Stage::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful pipeline result.
///
/// The image URL is the primary result; `email_sent` only records whether the
/// best-effort notification went out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub image_url: String,
    pub email_sent: bool,
}

/// Immutable snapshot of a task. Every transition builds a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: Uuid,
    #[serde(rename = "status")]
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// New task in the `Accepted` stage with a fresh identifier
    pub fn accepted() -> Self {
        Self {
            task_id: Uuid::new_v4(),
            stage: Stage::Accepted,
            image_url: None,
            email_sent: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.task_id
    }

    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Snapshot moved to an intermediate stage
    pub fn advance(&self, stage: Stage) -> Self {
        Self {
            stage,
            ..self.clone()
        }
    }

    pub fn complete(&self, outcome: PipelineOutcome) -> Self {
        Self {
            stage: Stage::Completed,
            image_url: Some(outcome.image_url),
            email_sent: Some(outcome.email_sent),
            error: None,
            completed_at: Some(Utc::now()),
            ..self.clone()
        }
    }

    pub fn fail(&self, reason: impl Into<String>) -> Self {
        Self {
            stage: Stage::Failed,
            image_url: None,
            email_sent: None,
            error: Some(reason.into()),
            completed_at: Some(Utc::now()),
            ..self.clone()
        }
    }
}
