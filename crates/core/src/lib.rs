//! # PageForge Core
//!
//! The "Brain" of the PageForge system - the Abstract Component Tree
//! schema, the three-stage generation contract, and the orchestration
//! discipline around them.
//!
//! ## Architecture
//!
//! - `act` - recursive ACT schema and the structural validation gate
//! - `artifacts` - stage outputs (`ExecutionPlan`, `GeneratedArtifact`)
//! - `pipeline` - stage contract and the single-stage-per-call orchestrator
//! - `remote` - transport client for the remote generation service
//! - `report` - outcome → caller-facing report mapping
//! - `skills` - A2A-native tool surface (plan, structure, merge)
//! - `config` - process-wide configuration, resolved once at startup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pageforge_core::config::ForgeConfig;
//! use pageforge_core::pipeline::PipelineOrchestrator;
//!
//! let config = ForgeConfig::from_env()?;
//! let orchestrator = PipelineOrchestrator::new(config)?;
//! let plan = orchestrator.plan("build a login form").await?;
//! ```

pub mod act;
pub mod artifacts;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod remote;
pub mod report;
pub mod skills;
