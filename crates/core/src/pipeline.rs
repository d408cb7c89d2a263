//! # Pipeline Stages & Orchestrator
//!
//! The three generation stages and the orchestrator that invokes exactly
//! one of them per call. The orchestrator never chains stages - the
//! calling agent inspects each artifact and decides what to do next - so
//! every invocation is independent and stateless.
//!
//! Contract per stage:
//!
//! | Stage     | Input                    | Output             |
//! |-----------|--------------------------|--------------------|
//! | plan      | free-text query          | `ExecutionPlan`    |
//! | structure | query + `ExecutionPlan`  | `ComponentNode`    |
//! | merge     | `ComponentNode`          | `GeneratedArtifact`|
//!
//! Each stage validates its own output before reporting success; a
//! structurally invalid payload from the remote service is a stage
//! failure, never forwarded.

use crate::act::ComponentNode;
use crate::artifacts::{ExecutionPlan, GeneratedArtifact};
use crate::config::ForgeConfig;
use crate::error::StageError;
use crate::remote::RemoteClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// One of the three pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Plan,
    Structure,
    Merge,
}

impl Stage {
    /// Remote endpoint path for this stage.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Stage::Plan => "plan",
            Stage::Structure => "structure",
            Stage::Merge => "merge",
        }
    }

    pub fn all() -> [Stage; 3] {
        [Stage::Plan, Stage::Structure, Stage::Merge]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// Invokes one stage per call against the remote generation service.
///
/// Holds no mutable state: the only state is the configured client, built
/// once at startup. No retries, no caching of partial pipeline output.
pub struct PipelineOrchestrator {
    client: RemoteClient,
}

impl PipelineOrchestrator {
    pub fn new(config: ForgeConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: RemoteClient::new(config)?,
        })
    }

    pub fn service_url(&self) -> &str {
        self.client.base_url()
    }

    /// Stage 1: turn a free-text query into an `ExecutionPlan`.
    pub async fn plan(&self, query: &str) -> Result<ExecutionPlan, StageError> {
        let data = self
            .client
            .invoke(Stage::Plan, json!({ "query": query }))
            .await?;

        let plan_text = data.get("plan").and_then(Value::as_str).ok_or_else(|| {
            StageError::Malformed("plan response is missing a string `plan` field".to_string())
        })?;

        let plan = ExecutionPlan::new(query, plan_text);
        tracing::info!(stage = %Stage::Plan, plan_id = %plan.id, "stage complete");
        Ok(plan)
    }

    /// Stage 2: turn a query plus its plan into an ACT root.
    ///
    /// The plan is forwarded as-is; whether it is semantically useful is
    /// the remote generator's concern, not a local precondition.
    pub async fn structure(
        &self,
        query: &str,
        plan: &ExecutionPlan,
    ) -> Result<ComponentNode, StageError> {
        let data = self
            .client
            .invoke(Stage::Structure, json!({ "query": query, "plan": plan }))
            .await?;

        let candidate = data.get("structure").ok_or_else(|| {
            StageError::Malformed("structure response is missing the `structure` field".to_string())
        })?;

        let root = ComponentNode::from_value(candidate)?;
        tracing::info!(stage = %Stage::Structure, nodes = root.node_count(), "stage complete");
        Ok(root)
    }

    /// Stage 3: turn a validated ACT into generated page code.
    ///
    /// The upstream tree is gated again before the remote call - a stage
    /// cannot be entered with a malformed upstream artifact.
    pub async fn merge(&self, root: &ComponentNode) -> Result<GeneratedArtifact, StageError> {
        root.validate()?;

        let data = self
            .client
            .invoke(Stage::Merge, json!({ "structure": root }))
            .await?;

        let code = data.get("code").and_then(Value::as_str).ok_or_else(|| {
            StageError::Malformed("merge response is missing a string `code` field".to_string())
        })?;
        let language = data
            .get("language")
            .and_then(Value::as_str)
            .map(str::to_string);

        tracing::info!(stage = %Stage::Merge, bytes = code.len(), "stage complete");
        Ok(GeneratedArtifact {
            code: code.to_string(),
            language,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::act::NodeChildren;
    use crate::error::ErrorKind;
    use axum::routing::post;
    use axum::{Json, Router};

    const TEST_SECRET: &str = "test-secret";

    /// Bind a stub generation service on an ephemeral port.
    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn orchestrator_for(url: &str) -> PipelineOrchestrator {
        PipelineOrchestrator::new(ForgeConfig::new(url, TEST_SECRET)).unwrap()
    }

    /// Stub handler that refuses any request missing the secret.
    fn authed(reply: Value) -> impl Fn(Json<Value>) -> std::future::Ready<Json<Value>> + Clone {
        move |Json(body): Json<Value>| {
            let out = if body.get("secret").and_then(Value::as_str) == Some(TEST_SECRET) {
                reply.clone()
            } else {
                json!({ "success": false, "error": "unauthorized" })
            };
            std::future::ready(Json(out))
        }
    }

    fn valid_structure_reply() -> Value {
        json!({
            "success": true,
            "data": {
                "structure": {
                    "component": "Page",
                    "description": "Login page",
                    "children": [
                        { "component": "Form", "description": "Login form", "children": "" }
                    ]
                }
            }
        })
    }

    #[tokio::test]
    async fn test_plan_success_carries_plan_text() {
        let app = Router::new().route(
            "/plan",
            post(authed(
                json!({ "success": true, "data": { "plan": "1. sketch the form" } }),
            )),
        );
        let url = spawn_stub(app).await;

        let plan = orchestrator_for(&url)
            .plan("build a login form")
            .await
            .unwrap();
        assert_eq!(plan.plan_text, "1. sketch the form");
        assert_eq!(plan.original_query, "build a login form");
    }

    #[tokio::test]
    async fn test_secret_is_injected() {
        // `authed` rejects when the secret is missing or wrong; a
        // mismatched orchestrator secret must therefore surface as a
        // rejection rather than a success.
        let app = Router::new().route(
            "/plan",
            post(authed(json!({ "success": true, "data": { "plan": "p" } }))),
        );
        let url = spawn_stub(app).await;

        let orchestrator =
            PipelineOrchestrator::new(ForgeConfig::new(url.as_str(), "wrong-secret")).unwrap();
        let err = orchestrator.plan("q").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteRejected);
        assert!(err.to_string().contains("unauthorized"));
    }

    #[tokio::test]
    async fn test_remote_rejection_preserves_message() {
        let app = Router::new().route(
            "/plan",
            post(authed(json!({ "success": false, "error": "rate limited" }))),
        );
        let url = spawn_stub(app).await;

        let err = orchestrator_for(&url).plan("q").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteRejected);
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_plan_missing_field_is_malformed() {
        let app = Router::new().route(
            "/plan",
            post(authed(json!({ "success": true, "data": { "steps": [] } }))),
        );
        let url = spawn_stub(app).await;

        let err = orchestrator_for(&url).plan("q").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedArtifact);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_fault() {
        // Nothing listens on port 1.
        let orchestrator = orchestrator_for("http://127.0.0.1:1");
        let err = orchestrator.plan("q").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportFault);
    }

    #[tokio::test]
    async fn test_structure_returns_validated_tree() {
        let app = Router::new().route("/structure", post(authed(valid_structure_reply())));
        let url = spawn_stub(app).await;

        let plan = ExecutionPlan::new("build a login form", "1. layout");
        let root = orchestrator_for(&url)
            .structure("build a login form", &plan)
            .await
            .unwrap();
        assert_eq!(root.component, "Page");
        assert_eq!(root.node_count(), 2);
    }

    #[tokio::test]
    async fn test_structure_with_empty_plan_text_is_forwarded() {
        // Stage independence: a syntactically valid but semantically
        // empty plan is the collaborator's problem, not a local crash.
        let app = Router::new().route("/structure", post(authed(valid_structure_reply())));
        let url = spawn_stub(app).await;

        let plan = ExecutionPlan::new("anything", "");
        let root = orchestrator_for(&url)
            .structure("anything", &plan)
            .await
            .unwrap();
        assert_eq!(root.component, "Page");
    }

    #[tokio::test]
    async fn test_invalid_structure_payload_is_malformed() {
        let app = Router::new().route(
            "/structure",
            post(authed(json!({
                "success": true,
                "data": {
                    "structure": { "component": "Grid", "description": "", "children": "x" }
                }
            }))),
        );
        let url = spawn_stub(app).await;

        let plan = ExecutionPlan::new("q", "p");
        let err = orchestrator_for(&url)
            .structure("q", &plan)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedArtifact);
        assert!(err.to_string().contains("description"));
    }

    #[tokio::test]
    async fn test_merge_success() {
        let app = Router::new().route(
            "/merge",
            post(authed(json!({
                "success": true,
                "data": { "code": "<div>login</div>", "language": "tsx" }
            }))),
        );
        let url = spawn_stub(app).await;

        let root = ComponentNode {
            component: "Page".to_string(),
            description: "Login page".to_string(),
            doc_query: None,
            children: NodeChildren::Text(String::new()),
        };
        let artifact = orchestrator_for(&url).merge(&root).await.unwrap();
        assert_eq!(artifact.code, "<div>login</div>");
        assert_eq!(artifact.language.as_deref(), Some("tsx"));
    }

    #[tokio::test]
    async fn test_merge_gates_malformed_upstream_tree() {
        // Point at a refused port: if the gate works, the remote is
        // never contacted and the error is Malformed, not Transport.
        let orchestrator = orchestrator_for("http://127.0.0.1:1");
        let root = ComponentNode {
            component: "Page".to_string(),
            description: String::new(),
            doc_query: None,
            children: NodeChildren::Nodes(vec![]),
        };
        let err = orchestrator.merge(&root).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedArtifact);
    }

    #[test]
    fn test_stage_display_matches_endpoint() {
        for stage in Stage::all() {
            assert_eq!(stage.to_string(), stage.endpoint());
        }
        assert_eq!(
            serde_json::to_string(&Stage::Structure).unwrap(),
            "\"structure\""
        );
    }
}
