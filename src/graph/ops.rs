//! Graph operations handed to the renderer.
//!
//! JSON shape:
//! [
//!   { "op": "node", "name": "Db" },
//!   { "op": "edge", "from": "App", "to": "Db",
//!     "attributes": { "color": "blue", "label": "7474/tcp" } }
//! ]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GraphOp {
    Node {
        name: String,
    },
    Edge {
        from: String,
        to: String,
        attributes: EdgeAttributes,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeAttributes {
    pub color: EdgeColor,
    pub label: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeColor {
    #[default]
    Blue,
}

impl GraphOp {
    pub fn node(name: impl Into<String>) -> Self {
        GraphOp::Node { name: name.into() }
    }

    /// Ingress edge `from -> to`, drawn blue.
    pub fn edge(from: impl Into<String>, to: impl Into<String>, label: impl Into<String>) -> Self {
        GraphOp::Edge {
            from: from.into(),
            to: to.into(),
            attributes: EdgeAttributes {
                color: EdgeColor::Blue,
                label: label.into(),
            },
        }
    }
}

/// Counts over an op script, for run summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OpsSummary {
    pub nodes: usize,
    pub edges: usize,
}

impl OpsSummary {
    pub fn of(ops: &[GraphOp]) -> Self {
        ops.iter().fold(Self::default(), |mut acc, op| {
            match op {
                GraphOp::Node { .. } => acc.nodes += 1,
                GraphOp::Edge { .. } => acc.edges += 1,
            }
            acc
        })
    }
}
