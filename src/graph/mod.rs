//! Graph building: security groups in, an ordered op script out.
//!
//! The op script is replayed by a renderer, so the order of ops matters:
//! each group's node comes first, followed by the edges into it.

pub mod build;
pub mod ops;

pub use build::{GraphBuilder, NameFilter, PeerNames, build_ops};
pub use ops::{EdgeAttributes, EdgeColor, GraphOp, OpsSummary};
