//! Security group input documents.
//!
//! Two JSON shapes are accepted, told apart by their top level:
//! - an object with `SecurityGroups` (AWS CLI describe output)
//! - an array of groups in this crate's own model shape

pub mod aws;

use crate::Result;
use crate::model::SecurityGroup;
use anyhow::{Context, bail};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use tracing::warn;

pub use aws::DescribeSecurityGroups;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GroupsDocument {
    Aws(DescribeSecurityGroups),
    Native(Vec<SecurityGroup>),
}

impl GroupsDocument {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context(
            "expected `aws ec2 describe-security-groups` output or a JSON array of groups",
        )
    }

    pub fn into_groups(self, vpc: Option<&str>) -> Result<Vec<SecurityGroup>> {
        match self {
            GroupsDocument::Aws(doc) => doc.validate_and_build(vpc),
            GroupsDocument::Native(groups) => {
                if let Some(vpc) = vpc {
                    warn!(vpc, "native group documents carry no vpc ids, ignoring vpc filter");
                }
                check_group_names(groups.iter().map(|g| (g.name.as_str(), None)))?;
                Ok(groups)
            }
        }
    }
}

/// Group names are identities: non-empty and unique within a document.
///
/// Items are `(name, id)`; the id, when known, names an unnamed group in the
/// error, otherwise its 1-based position does.
pub(crate) fn check_group_names<'a, I>(groups: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut seen = BTreeSet::new();
    for (index, (name, id)) in groups.into_iter().enumerate() {
        if name.is_empty() {
            let which = match id {
                Some(id) => id.to_string(),
                None => format!("#{}", index + 1),
            };
            bail!("security group {} has no name", which);
        }
        if !seen.insert(name) {
            bail!("duplicate security group name: {}", name);
        }
    }
    Ok(())
}

/// Load groups from `path`, or from stdin when `path` is "-".
pub fn load_groups(path: &str, vpc: Option<&str>) -> Result<Vec<SecurityGroup>> {
    let text = if path == "-" {
        io::read_to_string(io::stdin()).context("read security groups from stdin")?
    } else {
        fs::read_to_string(path).with_context(|| format!("read security groups file {}", path))?
    };

    GroupsDocument::parse(&text)
        .and_then(|doc| doc.into_groups(vpc))
        .with_context(|| format!("load security groups from {}", path))
}
