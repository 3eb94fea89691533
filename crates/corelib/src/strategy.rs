//! Read strategies.
//!
//! A read strategy tells the router which replica category to prefer when
//! serving a read. The external names (`kReadLeader`, ...) are part of the
//! table configuration format and must not change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Which replica of a partition a read should be sent to.
///
/// "No strategy configured" is expressed as `Option<ReadStrategy>::None` by
/// callers; the router treats it like [`ReadStrategy::ReadLeader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadStrategy {
    /// Always read from the leader.
    #[serde(rename = "kReadLeader")]
    ReadLeader,
    /// Read from a random follower, falling back to the leader.
    #[serde(rename = "kReadFollower")]
    ReadFollower,
    /// Read from the local/fast replica, then a random follower, then the leader.
    #[serde(rename = "kReadLocal")]
    ReadLocal,
    /// Read from any replica, leader included, uniformly at random.
    #[serde(rename = "kReadRandom", alias = "KReadRandom")]
    ReadRandom,
    /// A value this client does not recognize. Routed like the leader.
    #[serde(other)]
    Unspecified,
}

impl ReadStrategy {
    pub const ALL: [ReadStrategy; 4] = [
        ReadStrategy::ReadLeader,
        ReadStrategy::ReadFollower,
        ReadStrategy::ReadLocal,
        ReadStrategy::ReadRandom,
    ];

    /// External configuration name.
    pub const fn as_str(self) -> &'static str {
        match self {
            ReadStrategy::ReadLeader => "kReadLeader",
            ReadStrategy::ReadFollower => "kReadFollower",
            ReadStrategy::ReadLocal => "kReadLocal",
            ReadStrategy::ReadRandom => "kReadRandom",
            ReadStrategy::Unspecified => "unspecified",
        }
    }

    /// Returns `true` if this strategy may return a non-leader replica.
    pub const fn is_follower_read(self) -> bool {
        matches!(
            self,
            ReadStrategy::ReadFollower | ReadStrategy::ReadLocal | ReadStrategy::ReadRandom
        )
    }
}

impl fmt::Display for ReadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "kReadLeader" => Ok(ReadStrategy::ReadLeader),
            "kReadFollower" => Ok(ReadStrategy::ReadFollower),
            "kReadLocal" => Ok(ReadStrategy::ReadLocal),
            "kReadRandom" | "KReadRandom" => Ok(ReadStrategy::ReadRandom),
            other => Err(Error::InvalidStrategy(other.to_string())),
        }
    }
}
