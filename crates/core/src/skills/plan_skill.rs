//! # Plan Skill
//!
//! First stage of the page pipeline: turns a free-text request into an
//! `ExecutionPlan`. Accepts either plain text or JSON `{ "query": "..." }`;
//! the artifact is a `StageReport` so the invoking agent can inspect the
//! plan (or the failure cause) before deciding to continue.

use crate::pipeline::{PipelineOrchestrator, Stage};
use crate::report::format_outcome;
use async_trait::async_trait;
use radkit::agent::{Artifact, OnRequestResult, SkillHandler};
use radkit::errors::{AgentError, AgentResult};
use radkit::macros::skill;
use radkit::models::Content;
use radkit::runtime::context::{ProgressSender, State};
use radkit::runtime::AgentRuntime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Structured input form for the plan tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlanInput {
    /// Free-text description of the page to build
    pub query: String,
}

/// Plan skill for the first pipeline stage
#[skill(
    id = "plan",
    name = "Plan",
    description = "Generates an execution plan for a UI page request. First of three stages; the plan feeds the structure tool.",
    tags = ["plan", "pipeline", "generation"],
    examples = ["Plan a login form page", "Plan a pricing table"],
    input_modes = ["text/plain", "application/json"],
    output_modes = ["application/json"]
)]
pub struct PlanSkill {
    orchestrator: Arc<PipelineOrchestrator>,
}

impl PlanSkill {
    pub fn new(orchestrator: Arc<PipelineOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Extract the query from raw tool input: JSON form first, raw text
    /// as fallback.
    pub fn parse_input(raw: &str) -> String {
        match serde_json::from_str::<PlanInput>(raw) {
            Ok(input) => input.query,
            Err(_) => raw.to_string(),
        }
    }
}

#[async_trait]
impl SkillHandler for PlanSkill {
    async fn on_request(
        &self,
        _state: &mut State,
        progress: &ProgressSender,
        _runtime: &dyn AgentRuntime,
        content: Content,
    ) -> AgentResult<OnRequestResult> {
        let raw = content.first_text().unwrap_or_default();
        let query = Self::parse_input(raw);

        progress.send_update("Requesting execution plan...").await?;

        let outcome = self.orchestrator.plan(&query).await;
        let message = match &outcome {
            Ok(plan) => format!("{} ({} chars)", plan.id, plan.plan_text.len()),
            Err(_) => String::new(),
        };
        let report = format_outcome(Stage::Plan, &message, outcome);

        progress.send_update("Plan stage finished.").await?;

        let artifact =
            Artifact::from_json("plan_report.json", &report).map_err(|e| AgentError::Internal {
                component: "plan_skill".to_string(),
                reason: format!("Failed to create artifact: {}", e),
            })?;

        Ok(OnRequestResult::Completed {
            message: Some(Content::from_text(&report.summary())),
            artifacts: vec![artifact],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_json_form() {
        let query = PlanSkill::parse_input("{\"query\": \"build a login form\"}");
        assert_eq!(query, "build a login form");
    }

    #[test]
    fn test_parse_input_raw_text_fallback() {
        let query = PlanSkill::parse_input("build a login form");
        assert_eq!(query, "build a login form");
    }
}
