//! # Stage Reports
//!
//! Deterministic mapping from a stage outcome to the caller-facing report.
//! Presentation only: the artifact is serialized verbatim, and every
//! failure carries its originating cause, a remediation hint, and a
//! timestamp.

use crate::error::{ErrorKind, StageError};
use crate::pipeline::Stage;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-facing outcome of a single stage invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageReport {
    Success {
        stage: Stage,
        /// The validated artifact, serialized verbatim
        artifact: Value,
        message: String,
        completed_at: DateTime<Utc>,
    },
    Failure {
        stage: Stage,
        kind: ErrorKind,
        message: String,
        /// Remediation hint for the invoking agent
        hint: String,
        failed_at: DateTime<Utc>,
    },
}

impl StageReport {
    pub fn is_success(&self) -> bool {
        matches!(self, StageReport::Success { .. })
    }

    /// One-line summary suitable for a progress/chat message.
    pub fn summary(&self) -> String {
        match self {
            StageReport::Success { stage, message, .. } => {
                format!("{} stage complete: {}", stage, message)
            }
            StageReport::Failure {
                stage,
                kind,
                message,
                ..
            } => format!("{} stage failed ({:?}): {}", stage, kind, message),
        }
    }
}

/// Map a stage outcome into a report.
pub fn format_outcome<T: Serialize>(
    stage: Stage,
    message: &str,
    outcome: Result<T, StageError>,
) -> StageReport {
    match outcome {
        Ok(artifact) => match serde_json::to_value(&artifact) {
            Ok(value) => StageReport::Success {
                stage,
                artifact: value,
                message: message.to_string(),
                completed_at: Utc::now(),
            },
            // A non-serializable artifact is reported as malformed rather
            // than silently succeeding.
            Err(e) => failure(
                stage,
                StageError::Malformed(format!("artifact could not be serialized: {}", e)),
            ),
        },
        Err(err) => failure(stage, err),
    }
}

fn failure(stage: Stage, err: StageError) -> StageReport {
    let kind = err.kind();
    StageReport::Failure {
        stage,
        kind,
        message: err.to_string(),
        hint: kind.hint().to_string(),
        failed_at: Utc::now(),
    }
}
