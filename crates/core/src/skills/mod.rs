//! # PageForge Skills
//!
//! A2A-native skills forming the tool-invocation surface.
//!
//! ## Architecture
//!
//! ```text
//! Agent (A2A server)
//!   └── Skills (#[skill] + SkillHandler)
//!         └── PipelineOrchestrator → RemoteGenerationService
//! ```
//!
//! One skill per pipeline stage, invoked independently by the caller:
//! - `PlanSkill` - free-text request → `ExecutionPlan`
//! - `StructureSkill` - query + plan → Abstract Component Tree
//! - `MergeSkill` - validated ACT → generated page code
//!
//! Every skill returns a `StageReport` artifact; stage failures are
//! reports, never unhandled faults.

pub mod merge_skill;
pub mod plan_skill;
pub mod structure_skill;

// Agent Definitions (compose skills into the agent)
pub mod agent_definitions;

// Re-exports for convenience
pub use merge_skill::MergeSkill;
pub use plan_skill::{PlanInput, PlanSkill};
pub use structure_skill::{StructureInput, StructureSkill};

pub use agent_definitions::page_builder_agent;
