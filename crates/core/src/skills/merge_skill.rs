//! # Merge Skill
//!
//! Third and terminal stage of the page pipeline: turns a validated
//! Abstract Component Tree into generated page code. The tree is gated
//! before the remote call; a malformed tree produces a failure report
//! without touching the generation service.
//!
//! ## Input Format
//!
//! The ACT root itself:
//!
//! ```json
//! {
//!   "component": "Page",
//!   "description": "Login page",
//!   "children": [ ... ]
//! }
//! ```

use crate::act::ComponentNode;
use crate::artifacts::GeneratedArtifact;
use crate::pipeline::{PipelineOrchestrator, Stage};
use crate::report::format_outcome;
use async_trait::async_trait;
use radkit::agent::{Artifact, OnRequestResult, SkillHandler};
use radkit::errors::{AgentError, AgentResult};
use radkit::macros::skill;
use radkit::models::Content;
use radkit::runtime::context::{ProgressSender, State};
use radkit::runtime::AgentRuntime;
use std::sync::Arc;

/// Merge skill for the third pipeline stage
#[skill(
    id = "merge",
    name = "Merge",
    description = "Generates page code from a validated Abstract Component Tree. Terminal stage of the pipeline.",
    tags = ["merge", "codegen", "pipeline", "act"],
    examples = ["Generate code for this component tree"],
    input_modes = ["application/json"],
    output_modes = ["application/json"]
)]
pub struct MergeSkill {
    orchestrator: Arc<PipelineOrchestrator>,
}

impl MergeSkill {
    pub fn new(orchestrator: Arc<PipelineOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

#[async_trait]
impl SkillHandler for MergeSkill {
    async fn on_request(
        &self,
        _state: &mut State,
        progress: &ProgressSender,
        _runtime: &dyn AgentRuntime,
        content: Content,
    ) -> AgentResult<OnRequestResult> {
        let raw = content.first_text().unwrap_or_default();

        let candidate: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| AgentError::Internal {
                component: "merge_skill".to_string(),
                reason: format!("Invalid JSON input: {}. Expected an ACT root node", e),
            })?;

        // Gate the upstream artifact before any remote work; a malformed
        // tree is a stage failure, reported rather than thrown.
        let report = match ComponentNode::from_value(&candidate) {
            Err(tree_err) => {
                format_outcome::<GeneratedArtifact>(Stage::Merge, "", Err(tree_err.into()))
            }
            Ok(root) => {
                progress.send_update("Generating page code...").await?;
                let outcome = self.orchestrator.merge(&root).await;
                let message = match &outcome {
                    Ok(artifact) => format!("{} bytes of generated code", artifact.code.len()),
                    Err(_) => String::new(),
                };
                format_outcome(Stage::Merge, &message, outcome)
            }
        };

        progress.send_update("Merge stage finished.").await?;

        let artifact =
            Artifact::from_json("merge_report.json", &report).map_err(|e| AgentError::Internal {
                component: "merge_skill".to_string(),
                reason: format!("Failed to create artifact: {}", e),
            })?;

        Ok(OnRequestResult::Completed {
            message: Some(Content::from_text(&report.summary())),
            artifacts: vec![artifact],
        })
    }
}
