//! CIDR mapping table.
//!
//! Several CIDR blocks often stand for one logical peer (an office, a VPN
//! range). The table maps each block to a display name so that they collapse
//! into a single graph endpoint.

use crate::graph::PeerNames;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerResolver {
    mapping: BTreeMap<String, String>,
}

impl PeerResolver {
    pub fn new(mapping: BTreeMap<String, String>) -> Self {
        Self { mapping }
    }

    /// Display name for `cidr`; unmapped blocks pass through unchanged.
    pub fn resolve<'a>(&'a self, cidr: &'a str) -> &'a str {
        self.mapping.get(cidr).map(String::as_str).unwrap_or(cidr)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PeerResolver
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(cidr, name)| (cidr.into(), name.into()))
                .collect(),
        )
    }
}

impl PeerNames for PeerResolver {
    fn resolve<'a>(&'a self, cidr: &'a str) -> &'a str {
        PeerResolver::resolve(self, cidr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_cidr_passes_through() {
        let resolver = PeerResolver::default();
        assert_eq!(resolver.resolve("127.0.0.1/32"), "127.0.0.1/32");
        assert!(resolver.is_empty());
    }

    #[test]
    fn mapped_cidrs_share_a_name() {
        let resolver: PeerResolver = [("127.0.0.1/32", "Work"), ("192.168.0.1/32", "Work")]
            .into_iter()
            .collect();

        assert_eq!(resolver.len(), 2);
        assert_eq!(resolver.resolve("127.0.0.1/32"), "Work");
        assert_eq!(resolver.resolve("192.168.0.1/32"), "Work");
        assert_eq!(resolver.resolve("10.0.0.0/8"), "10.0.0.0/8");
    }

    #[test]
    fn lookup_is_exact() {
        let resolver: PeerResolver = [("127.0.0.1/32", "Work")].into_iter().collect();
        assert_eq!(resolver.resolve("127.0.0.1"), "127.0.0.1");
        assert_eq!(resolver.resolve(" 127.0.0.1/32"), " 127.0.0.1/32");
    }
}
