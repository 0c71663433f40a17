//! Peer naming: CIDR-to-name mapping and name exclusion.

pub mod filter;
pub mod resolver;

pub use filter::ExclusionFilter;
pub use resolver::PeerResolver;
