//! Security group reachability graph.
//!
//! Turns a batch of security groups into an ordered script of graph
//! operations (nodes and labeled edges) that a renderer can replay.

pub mod config;
pub mod graph;
pub mod model;
pub mod peer;
pub mod source;

pub type Result<T> = anyhow::Result<T>;

pub use config::Config;
pub use graph::{EdgeAttributes, EdgeColor, GraphBuilder, GraphOp, build_ops};
pub use model::{IngressRule, SecurityGroup};
pub use peer::{ExclusionFilter, PeerResolver};
