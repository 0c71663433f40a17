//! In-memory security group model consumed by the graph builder.
//!
//! JSON shape (native format):
//! [
//!   {
//!     "name": "Db",
//!     "ingress": [
//!       { "kind": "group", "source_group": "App", "port": "7474" },
//!       { "kind": "cidr", "cidr_block": "127.0.0.1/32", "port": "22" }
//!     ]
//!   }
//! ]

use serde::{Deserialize, Serialize};

/// A named security group and its inbound rules, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub name: String,

    #[serde(default)]
    pub ingress: Vec<IngressRule>,
}

impl SecurityGroup {
    pub fn new(name: impl Into<String>, ingress: Vec<IngressRule>) -> Self {
        Self {
            name: name.into(),
            ingress,
        }
    }
}

/// Where inbound traffic may come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IngressRule {
    /// Another security group, which may live outside the current batch.
    Group { source_group: String, port: String },
    /// A raw IP range such as `10.0.0.0/8`.
    Cidr { cidr_block: String, port: String },
}

impl IngressRule {
    pub fn group(port: impl Into<String>, source_group: impl Into<String>) -> Self {
        IngressRule::Group {
            source_group: source_group.into(),
            port: port.into(),
        }
    }

    pub fn cidr(port: impl Into<String>, cidr_block: impl Into<String>) -> Self {
        IngressRule::Cidr {
            cidr_block: cidr_block.into(),
            port: port.into(),
        }
    }

    pub fn port(&self) -> &str {
        match self {
            IngressRule::Group { port, .. } | IngressRule::Cidr { port, .. } => port,
        }
    }

    /// Edge label, e.g. "22/tcp".
    pub fn label(&self) -> String {
        format!("{}/tcp", self.port())
    }
}
