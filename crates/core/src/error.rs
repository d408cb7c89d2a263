//! # Stage Error Taxonomy
//!
//! Every runtime failure of a stage call falls into one of three kinds.
//! These are caught at the tool boundary and converted into failure
//! reports - they never propagate to the invoking agent as faults.

use crate::act::TreeError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Failure of a single stage invocation.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// Network/connection-level failure calling the remote service,
    /// including an undecodable response envelope.
    #[error("transport fault calling the generation service: {0}")]
    Transport(#[source] reqwest::Error),

    /// The service explicitly reported failure, or omitted required data.
    #[error("generation service rejected the request: {0}")]
    Rejected(String),

    /// The service reported success but the payload failed schema
    /// validation.
    #[error("malformed artifact: {0}")]
    Malformed(String),
}

impl From<TreeError> for StageError {
    fn from(err: TreeError) -> Self {
        StageError::Malformed(err.to_string())
    }
}

impl StageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StageError::Transport(_) => ErrorKind::TransportFault,
            StageError::Rejected(_) => ErrorKind::RemoteRejected,
            StageError::Malformed(_) => ErrorKind::MalformedArtifact,
        }
    }
}

/// Caller-facing error classification, carried on failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    TransportFault,
    RemoteRejected,
    MalformedArtifact,
}

impl ErrorKind {
    /// Remediation hint included in every failure report.
    pub fn hint(&self) -> &'static str {
        match self {
            ErrorKind::TransportFault => {
                "Check that the generation service is reachable at the configured address."
            }
            ErrorKind::RemoteRejected => {
                "The generation service declined the request; inspect the error message and retry with adjusted input."
            }
            ErrorKind::MalformedArtifact => {
                "The generation service returned data that failed schema validation; rerun the stage or report the payload upstream."
            }
        }
    }
}
