//! # Pipeline Artifacts
//!
//! Stage-local output types. Every artifact is created fresh per
//! invocation and handed back to the caller by value; nothing is
//! persisted, since the caller owns chaining between stages.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output of the `plan` stage, input to `structure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPlan {
    /// Unique id for this plan, e.g. `plan-20260805-101530-421`
    pub id: String,
    /// The free-text query the plan was generated for
    pub original_query: String,
    /// The plan itself, as produced by the remote generator
    pub plan_text: String,
    pub created_at: DateTime<Utc>,
}

impl ExecutionPlan {
    pub fn new(query: impl Into<String>, plan_text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("plan-{}", now.format("%Y%m%d-%H%M%S-%3f")),
            original_query: query.into(),
            plan_text: plan_text.into(),
            created_at: now,
        }
    }
}

/// Terminal output of the `merge` stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    /// Generated page code/text
    pub code: String,
    /// Language of the generated code, when the service reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}
