//! Run configuration (YAML; JSON also parses).
//!
//! Example:
//! exclude:
//!   - '^amazon-elb'
//! groups:
//!   '127.0.0.1/32': Work
//!   '192.168.0.1/32': Work
//!
//! `exclude` feeds the exclusion filter, `groups` the CIDR mapping table.

use crate::Result;
use crate::peer::{ExclusionFilter, PeerResolver};
use anyhow::Context;
use ipnet::IpNet;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub exclude: Vec<String>,

    /// CIDR block -> display name.
    #[serde(default)]
    pub groups: BTreeMap<String, String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
        Self::parse(&text).with_context(|| format!("parse config file {}", path))
    }

    pub fn parse(text: &str) -> Result<Self> {
        // An empty file is an empty config.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Append extra exclude patterns after the ones from the file.
    pub fn with_excludes<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.exclude.extend(extra);
        self
    }

    pub fn exclusion_filter(&self) -> Result<ExclusionFilter> {
        ExclusionFilter::new(&self.exclude)
    }

    pub fn peer_resolver(&self) -> PeerResolver {
        for cidr in self.groups.keys() {
            if cidr.parse::<IpNet>().is_err() {
                warn!(key = %cidr, "group mapping key is not a CIDR block and will never match");
            }
        }
        PeerResolver::new(self.groups.clone())
    }
}
