//! # Structure Skill
//!
//! Second stage of the page pipeline: turns a query plus its
//! `ExecutionPlan` into an Abstract Component Tree. The remote payload is
//! gated by `validate_tree` before the stage reports success.
//!
//! ## Input Format
//!
//! ```json
//! {
//!   "query": "build a login form",
//!   "plan": { "id": "plan-...", "originalQuery": "...", "planText": "...", "createdAt": "..." }
//! }
//! ```

use crate::artifacts::ExecutionPlan;
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

/// Input for the structure tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StructureInput {
    /// The original free-text query
    pub query: String,
    /// The plan produced by the plan stage
    pub plan: ExecutionPlan,
}

/// Structure skill for the second pipeline stage
#[skill(
    id = "structure",
    name = "Structure",
    description = "Generates the Abstract Component Tree for a page from a query and its execution plan. Output is schema-validated before success is reported.",
    tags = ["structure", "pipeline", "generation", "act"],
    examples = ["Generate the component tree for a planned login form"],
    input_modes = ["application/json"],
    output_modes = ["application/json"]
)]
pub struct StructureSkill {
    orchestrator: Arc<PipelineOrchestrator>,
}

impl StructureSkill {
    pub fn new(orchestrator: Arc<PipelineOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

#[async_trait]
impl SkillHandler for StructureSkill {
    async fn on_request(
        &self,
        _state: &mut State,
        progress: &ProgressSender,
        _runtime: &dyn AgentRuntime,
        content: Content,
    ) -> AgentResult<OnRequestResult> {
        let raw = content.first_text().unwrap_or_default();

        let input: StructureInput =
            serde_json::from_str(raw).map_err(|e| AgentError::Internal {
                component: "structure_skill".to_string(),
                reason: format!(
                    "Invalid JSON input: {}. Expected {{ \"query\": \"...\", \"plan\": {{...}} }}",
                    e
                ),
            })?;

        progress.send_update("Requesting component tree...").await?;

        let outcome = self.orchestrator.structure(&input.query, &input.plan).await;
        let message = match &outcome {
            Ok(root) => format!("component tree with {} nodes", root.node_count()),
            Err(_) => String::new(),
        };
        let report = format_outcome(Stage::Structure, &message, outcome);

        progress.send_update("Structure stage finished.").await?;

        let artifact = Artifact::from_json("structure_report.json", &report).map_err(|e| {
            AgentError::Internal {
                component: "structure_skill".to_string(),
                reason: format!("Failed to create artifact: {}", e),
            }
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
    fn test_structure_input_round_trip() {
        let input = StructureInput {
            query: "build a login form".to_string(),
            plan: ExecutionPlan::new("build a login form", "1. layout"),
        };
        let json = serde_json::to_string(&input).unwrap();
        let back: StructureInput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.query, input.query);
        assert_eq!(back.plan.plan_text, "1. layout");
    }
}
