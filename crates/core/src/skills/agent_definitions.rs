//! # Agent Definitions
//!
//! Composes the PageForge agent from its skills using radkit's
//! `Agent::builder()`. The agent can run as an A2A server exposing the
//! three pipeline tools.

use crate::pipeline::PipelineOrchestrator;
use crate::skills::{MergeSkill, PlanSkill, StructureSkill};
use radkit::agent::{Agent, AgentDefinition};
use std::sync::Arc;

/// The Page Builder Agent
///
/// Exposes the three pipeline stages as independently invocable tools.
/// The agent never chains stages itself - the invoking agent inspects
/// each artifact and decides whether to continue.
pub fn page_builder_agent(orchestrator: Arc<PipelineOrchestrator>) -> AgentDefinition {
    Agent::builder()
        .with_name("Page Builder")
        .with_description(
            "Generates UI pages in three remote-backed stages: plan, structure, merge. \
             Each stage is independently invocable so the caller can inspect \
             intermediate artifacts before continuing.",
        )
        .with_skill(PlanSkill::new(orchestrator.clone()))
        .with_skill(StructureSkill::new(orchestrator.clone()))
        .with_skill(MergeSkill::new(orchestrator))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForgeConfig;

    #[test]
    fn test_agent_composes() {
        let config = ForgeConfig::new("http://localhost:9000", "secret");
        let orchestrator = Arc::new(PipelineOrchestrator::new(config).unwrap());
        let _agent = page_builder_agent(orchestrator);
    }
}
