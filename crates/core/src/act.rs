//! # Abstract Component Tree
//!
//! The recursive schema that threads the three generation stages together.
//! Stage 2 (`structure`) produces an ACT, stage 3 (`merge`) consumes one,
//! and every hand-off is re-checked by the structural gate in this module.
//!
//! ## Wire Format
//!
//! ```json
//! {
//!   "component": "Form",
//!   "description": "Login form with email and password",
//!   "docQuery": "form validation",
//!   "children": [
//!     { "component": "TextInput", "description": "Email field", "children": "" }
//!   ]
//! }
//! ```
//!
//! `children` is either a plain string (leaf text content) or an array of
//! child nodes. The two cases never coerce into each other.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single node of the Abstract Component Tree.
///
/// `component` is a free-form element kind - no closed enumeration is
/// enforced here; semantic validity belongs to the remote generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    /// UI element kind (e.g. "Form", "Grid", "Button")
    pub component: String,
    /// Human-readable purpose of this node
    pub description: String,
    /// Optional lookup key for supplementary component documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_query: Option<String>,
    /// Child content: nested nodes or leaf text
    pub children: NodeChildren,
}

/// The `children` union: leaf text or an ordered sequence of nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum NodeChildren {
    /// Leaf case - plain text content, possibly empty
    Text(String),
    /// Container case - ordered child nodes, possibly empty
    Nodes(Vec<ComponentNode>),
}

/// A structural defect in a candidate tree, located by path.
///
/// Paths read like `children[2].children[0]`; the root node is `root`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid node at {path}: {reason}")]
pub struct TreeError {
    pub path: String,
    pub reason: String,
}

impl TreeError {
    fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Validate an arbitrary JSON candidate as an ACT.
///
/// Pure structural gate: no trimming or case-folding is performed.
/// Uses an explicit work stack so arbitrarily deep trees cannot overflow
/// the call stack. The first defect found is returned with its exact path.
pub fn validate_tree(candidate: &Value) -> Result<(), TreeError> {
    let mut stack: Vec<(String, &Value)> = vec![("root".to_string(), candidate)];

    while let Some((path, value)) = stack.pop() {
        let obj = value
            .as_object()
            .ok_or_else(|| TreeError::new(&path, "expected an object"))?;

        match obj.get("component") {
            Some(Value::String(s)) if !s.is_empty() => {}
            Some(Value::String(_)) => {
                return Err(TreeError::new(&path, "`component` must be non-empty"))
            }
            Some(_) => return Err(TreeError::new(&path, "`component` must be a string")),
            None => return Err(TreeError::new(&path, "missing `component`")),
        }

        match obj.get("description") {
            Some(Value::String(s)) if !s.is_empty() => {}
            Some(Value::String(_)) => {
                return Err(TreeError::new(&path, "`description` must be non-empty"))
            }
            Some(_) => return Err(TreeError::new(&path, "`description` must be a string")),
            None => return Err(TreeError::new(&path, "missing `description`")),
        }

        // docQuery is optional; null counts as absent
        match obj.get("docQuery") {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => {
                return Err(TreeError::new(
                    &path,
                    "`docQuery` must be a string when present",
                ))
            }
        }

        match obj.get("children") {
            Some(Value::String(_)) => {}
            Some(Value::Array(items)) => {
                for (idx, child) in items.iter().enumerate() {
                    let child_path = if path == "root" {
                        format!("children[{}]", idx)
                    } else {
                        format!("{}.children[{}]", path, idx)
                    };
                    stack.push((child_path, child));
                }
            }
            Some(_) => {
                return Err(TreeError::new(
                    &path,
                    "`children` must be a string or an array of nodes",
                ))
            }
            None => return Err(TreeError::new(&path, "missing `children`")),
        }
    }

    Ok(())
}

impl ComponentNode {
    /// Validate a JSON candidate and deserialize it into a typed tree.
    pub fn from_value(candidate: &Value) -> Result<Self, TreeError> {
        validate_tree(candidate)?;
        serde_json::from_value(candidate.clone()).map_err(|e| TreeError {
            path: "root".to_string(),
            reason: format!("deserialization failed after validation: {}", e),
        })
    }

    /// Re-run the structural gate against this tree's serialized form.
    ///
    /// Typed construction does not enforce the non-empty invariants, so
    /// trees handed across a stage boundary are gated again here.
    pub fn validate(&self) -> Result<(), TreeError> {
        let value = serde_json::to_value(self).map_err(|e| TreeError {
            path: "root".to_string(),
            reason: format!("serialization failed: {}", e),
        })?;
        validate_tree(&value)
    }

    /// Total node count, counted iteratively.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&ComponentNode> = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            if let NodeChildren::Nodes(children) = &node.children {
                stack.extend(children.iter());
            }
        }
        count
    }
}
