//! PageForge Server
//!
//! Axum host for the three-stage page generation tools. Configuration is
//! resolved once at startup; a missing service address or secret is fatal
//! before any tool route is registered. Handlers call the orchestrator
//! directly and return `StageReport` JSON - identical semantics to the
//! skill surface.

use axum::{
    extract::State,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use clap::Parser;
use pageforge_core::act::ComponentNode;
use pageforge_core::config::ForgeConfig;
use pageforge_core::pipeline::{PipelineOrchestrator, Stage};
use pageforge_core::report::{format_outcome, StageReport};
use pageforge_core::skills::{PlanInput, StructureInput};
use serde::Serialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use utoipa::OpenApi;

/// PageForge - remote-backed UI page generation in three stages
#[derive(Parser)]
#[command(name = "pageforge", version)]
struct Cli {
    /// Port to bind the tool server on
    #[arg(long, default_value_t = 4280)]
    port: u16,
    /// Optional .env file to load before reading configuration
    #[arg(long)]
    env_file: Option<PathBuf>,
}

/// Application state
struct AppState {
    orchestrator: Arc<PipelineOrchestrator>,
}

type SharedState = Arc<AppState>;

// === Tool Handlers ===

/// Run the plan stage
#[utoipa::path(
    post,
    path = "/api/v1/tools/plan",
    tag = "tools",
    responses(
        (status = 200, description = "Stage report: execution plan or failure cause")
    )
)]
async fn plan_tool(
    State(state): State<SharedState>,
    Json(input): Json<PlanInput>,
) -> Json<StageReport> {
    let outcome = state.orchestrator.plan(&input.query).await;
    let message = match &outcome {
        Ok(plan) => format!("{} ({} chars)", plan.id, plan.plan_text.len()),
        Err(_) => String::new(),
    };
    Json(format_outcome(Stage::Plan, &message, outcome))
}

/// Run the structure stage
#[utoipa::path(
    post,
    path = "/api/v1/tools/structure",
    tag = "tools",
    responses(
        (status = 200, description = "Stage report: validated component tree or failure cause")
    )
)]
async fn structure_tool(
    State(state): State<SharedState>,
    Json(input): Json<StructureInput>,
) -> Json<StageReport> {
    let outcome = state.orchestrator.structure(&input.query, &input.plan).await;
    let message = match &outcome {
        Ok(root) => format!("component tree with {} nodes", root.node_count()),
        Err(_) => String::new(),
    };
    Json(format_outcome(Stage::Structure, &message, outcome))
}

/// Run the merge stage
///
/// The body is the ACT root itself. It is taken as raw JSON so that a
/// malformed tree surfaces as a failure report with the exact failing
/// path, not as a bare deserialization error.
#[utoipa::path(
    post,
    path = "/api/v1/tools/merge",
    tag = "tools",
    responses(
        (status = 200, description = "Stage report: generated page code or failure cause")
    )
)]
async fn merge_tool(
    State(state): State<SharedState>,
    Json(candidate): Json<Value>,
) -> Json<StageReport> {
    let report = match ComponentNode::from_value(&candidate) {
        Err(tree_err) => format_outcome::<pageforge_core::artifacts::GeneratedArtifact>(
            Stage::Merge,
            "",
            Err(tree_err.into()),
        ),
        Ok(root) => {
            let outcome = state.orchestrator.merge(&root).await;
            let message = match &outcome {
                Ok(artifact) => format!("{} bytes of generated code", artifact.code.len()),
                Err(_) => String::new(),
            };
            format_outcome(Stage::Merge, &message, outcome)
        }
    };
    Json(report)
}

// === Tool Manifest ===

#[derive(Serialize)]
struct ToolDescriptor {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    input_modes: Vec<&'static str>,
    output_modes: Vec<&'static str>,
    input_schema: Value,
}

fn schema_value<T: schemars::JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default()
}

/// List the three tools with their declared input schemas
#[utoipa::path(
    get,
    path = "/api/v1/tools",
    tag = "tools",
    responses(
        (status = 200, description = "Tool manifest with JSON input schemas")
    )
)]
async fn list_tools() -> Json<Vec<ToolDescriptor>> {
    Json(vec![
        ToolDescriptor {
            id: "plan",
            name: "Plan",
            description:
                "Generates an execution plan for a UI page request. First of three stages.",
            input_modes: vec!["text/plain", "application/json"],
            output_modes: vec!["application/json"],
            input_schema: schema_value::<PlanInput>(),
        },
        ToolDescriptor {
            id: "structure",
            name: "Structure",
            description:
                "Generates the Abstract Component Tree from a query and its execution plan.",
            input_modes: vec!["application/json"],
            output_modes: vec!["application/json"],
            input_schema: schema_value::<StructureInput>(),
        },
        ToolDescriptor {
            id: "merge",
            name: "Merge",
            description: "Generates page code from a validated Abstract Component Tree.",
            input_modes: vec!["application/json"],
            output_modes: vec!["application/json"],
            input_schema: schema_value::<ComponentNode>(),
        },
    ])
}

// === Health ===

/// Service health and configured generation endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "system",
    responses(
        (status = 200, description = "Health status")
    )
)]
async fn health(State(state): State<SharedState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "serviceUrl": state.orchestrator.service_url(),
    }))
}

// === OpenAPI Definition ===

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PageForge API",
        version = "0.1.0",
        description = "Three-stage remote-backed UI page generation tools"
    ),
    paths(plan_tool, structure_tool, merge_tool, list_tools, health)
)]
struct ApiDoc;

async fn serve_openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// === A2A Agent Card Handler ===

/// Serve the A2A agent card for agent discovery
///
/// Mirrors the skill metadata declared in `pageforge_core::skills`.
async fn serve_agent_card() -> impl IntoResponse {
    let agent_card = serde_json::json!({
        "name": "Page Builder",
        "description": "Generates UI pages in three remote-backed stages: plan, structure, merge. Each stage is independently invocable so the caller can inspect intermediate artifacts before continuing.",
        "version": "0.1.0",
        "capabilities": {
            "streaming": false,
            "pushNotifications": false,
            "stateTransitionHistory": false
        },
        "skills": [
            {
                "id": "plan",
                "name": "Plan",
                "description": "Generates an execution plan for a UI page request. First of three stages; the plan feeds the structure tool.",
                "tags": ["plan", "pipeline", "generation"],
                "inputModes": ["text/plain", "application/json"],
                "outputModes": ["application/json"]
            },
            {
                "id": "structure",
                "name": "Structure",
                "description": "Generates the Abstract Component Tree for a page from a query and its execution plan. Output is schema-validated before success is reported.",
                "tags": ["structure", "pipeline", "generation", "act"],
                "inputModes": ["application/json"],
                "outputModes": ["application/json"]
            },
            {
                "id": "merge",
                "name": "Merge",
                "description": "Generates page code from a validated Abstract Component Tree. Terminal stage of the pipeline.",
                "tags": ["merge", "codegen", "pipeline", "act"],
                "inputModes": ["application/json"],
                "outputModes": ["application/json"]
            }
        ]
    });
    Json(agent_card)
}

// === Server ===

async fn run_server(cli: Cli) -> anyhow::Result<()> {
    // Fatal: no tool is registered without a complete configuration.
    let config = ForgeConfig::from_env()?;
    let orchestrator = Arc::new(PipelineOrchestrator::new(config)?);

    tracing::info!(service_url = %orchestrator.service_url(), "generation service configured");

    let state: SharedState = Arc::new(AppState { orchestrator });

    let app = Router::new()
        .route("/api/v1/tools", get(list_tools))
        .route("/api/v1/tools/plan", post(plan_tool))
        .route("/api/v1/tools/structure", post(structure_tool))
        .route("/api/v1/tools/merge", post(merge_tool))
        .route("/api/v1/health", get(health))
        .route("/api/v1/openapi.json", get(serve_openapi))
        .route("/.well-known/agent-card.json", get(serve_agent_card))
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], cli.port));
    tracing::info!(%addr, "PageForge server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.env_file {
        dotenvy::from_path(path)?;
    } else {
        let _ = dotenvy::dotenv();
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    run_server(cli).await
}
