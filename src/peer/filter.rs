//! Exclusion patterns.
//!
//! Each pattern is a regular expression matched anywhere in a name:
//! `D.*b` excludes `Db`, `127.*` excludes `127.0.0.1/32`.

use crate::Result;
use crate::graph::NameFilter;
use anyhow::Context;
use regex::{Regex, RegexSet};

#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    set: RegexSet,
}

impl ExclusionFilter {
    /// Compile `patterns`. Fails on the first invalid regular expression.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();

        // Compile one by one so the error names the offending pattern.
        for p in &patterns {
            Regex::new(p).with_context(|| format!("bad exclude pattern {:?}", p))?;
        }
        let set = RegexSet::new(&patterns).context("compile exclude patterns")?;

        Ok(Self { set })
    }

    /// A filter that excludes nothing.
    pub fn none() -> Self {
        Self {
            set: RegexSet::empty(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.set.is_match(name)
    }

    pub fn patterns(&self) -> &[String] {
        self.set.patterns()
    }
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::none()
    }
}

impl NameFilter for ExclusionFilter {
    fn matches(&self, name: &str) -> bool {
        ExclusionFilter::matches(self, name)
    }
}
