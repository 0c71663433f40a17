//! Security groups -> op script.
//!
//! For each group, in input order:
//! 1) skip it entirely if its name is excluded (no node, no inbound edges)
//! 2) emit its node
//! 3) for each ingress rule, resolve the source to a peer name and emit
//!    `peer -> group` unless the peer is excluded or the same
//!    (peer, group, label) edge was already emitted.
//!
//! Peers seen only as rule sources never get a node of their own.

use crate::graph::ops::GraphOp;
use crate::model::{IngressRule, SecurityGroup};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Maps a CIDR block to the peer name shown in the graph.
pub trait PeerNames {
    fn resolve<'a>(&'a self, cidr: &'a str) -> &'a str;
}

/// Decides whether a group or peer name is left out of the graph.
pub trait NameFilter {
    fn matches(&self, name: &str) -> bool;
}

/// Builds op scripts with an injected resolver and filter.
pub struct GraphBuilder<'a, R: ?Sized, F: ?Sized> {
    resolver: &'a R,
    filter: &'a F,
}

impl<'a, R, F> GraphBuilder<'a, R, F>
where
    R: PeerNames + ?Sized,
    F: NameFilter + ?Sized,
{
    pub fn new(resolver: &'a R, filter: &'a F) -> Self {
        Self { resolver, filter }
    }

    pub fn build(&self, groups: &[SecurityGroup]) -> Vec<GraphOp> {
        let mut ops = Vec::new();
        // (peer, group, label) of every edge emitted so far.
        let mut emitted: BTreeSet<(String, String, String)> = BTreeSet::new();

        for group in groups {
            if self.filter.matches(&group.name) {
                debug!(
                    group = %group.name,
                    rules = group.ingress.len(),
                    "excluded group, dropping node and inbound edges"
                );
                continue;
            }

            ops.push(GraphOp::node(&group.name));

            for rule in &group.ingress {
                let peer = self.peer_name(rule);

                if self.filter.matches(peer) {
                    debug!(peer, group = %group.name, "excluded peer, dropping edge");
                    continue;
                }

                let label = rule.label();
                if !emitted.insert((peer.to_string(), group.name.clone(), label.clone())) {
                    trace!(peer, group = %group.name, %label, "duplicate edge");
                    continue;
                }

                ops.push(GraphOp::edge(peer, &group.name, label));
            }
        }

        ops
    }

    fn peer_name<'r>(&'r self, rule: &'r IngressRule) -> &'r str {
        match rule {
            IngressRule::Group { source_group, .. } => source_group,
            IngressRule::Cidr { cidr_block, .. } => self.resolver.resolve(cidr_block),
        }
    }
}

/// Build the op script for `groups`.
pub fn build_ops<R, F>(groups: &[SecurityGroup], resolver: &R, filter: &F) -> Vec<GraphOp>
where
    R: PeerNames + ?Sized,
    F: NameFilter + ?Sized,
{
    GraphBuilder::new(resolver, filter).build(groups)
}
