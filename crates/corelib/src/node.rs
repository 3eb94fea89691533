//! Node identity and replica endpoints.
//!
//! An `Endpoint` is the handle the router hands back to the request path. The
//! router treats it as an opaque comparable value and never looks inside.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Compact identifier for a data node in the cluster.
///
/// Newtype over `u128` so comparisons and hashing are very fast while giving
/// plenty of space for uniqueness.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId(pub u128);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// A reachable data node serving one replica of a partition.
///
/// Keep this struct small and cheap to clone; connection state belongs to the
/// transport layer, not here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: NodeId,
    /// `host:port` the transport connects to.
    pub address: String,
    /// Optional data center label, as reported by topology metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<String>,
}

impl Endpoint {
    /// Construct an endpoint with no placement metadata.
    pub fn new(id: NodeId, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
            datacenter: None,
        }
    }

    pub fn with_datacenter(
        id: NodeId,
        address: impl Into<String>,
        datacenter: impl Into<Option<String>>,
    ) -> Self {
        Self {
            id,
            address: address.into(),
            datacenter: datacenter.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id.0, self.address)
    }
}

/// Parses `"<id>@<host:port>"`, the same shape `Display` produces.
impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, address) = s
            .split_once('@')
            .ok_or_else(|| Error::InvalidEndpoint(format!("missing '@' in {:?}", s)))?;
        let id = id
            .trim()
            .parse::<u128>()
            .map_err(|e| Error::InvalidEndpoint(format!("bad node id {:?}: {}", id, e)))?;
        let address = address.trim();
        if address.is_empty() {
            return Err(Error::InvalidEndpoint(format!("empty address in {:?}", s)));
        }
        Ok(Self::new(NodeId(id), address))
    }
}
