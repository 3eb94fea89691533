//! Per-partition replica selection.
//!
//! A [`PartitionRouter`] holds the replica set of one partition: the leader,
//! its followers, and optionally a replica flagged as local/fast for this
//! client. Given a [`ReadStrategy`] it picks exactly one endpoint to read from.
//!
//! # Selection rules
//!
//! | Strategy                        | Result                                          |
//! |---------------------------------|-------------------------------------------------|
//! | unset, or no followers          | leader                                          |
//! | `kReadLeader`                   | leader                                          |
//! | `kReadFollower`                 | random follower                                 |
//! | `kReadLocal`                    | local endpoint, else random follower            |
//! | `kReadRandom`                   | uniform over leader and followers               |
//! | unrecognized                    | leader                                          |
//!
//! The first row is checked before any strategy. An absent result is always
//! reported as [`RoutingError::NoAvailableEndpoint`].
//!
//! # Performance
//!
//! Selection is O(1), never allocates and never blocks. The router is
//! immutable once built, so it can be read from many threads without locking.

use corelib::{Endpoint, ReadStrategy};
use rand::Rng;
use tracing::{debug, warn};

use crate::error::{Result, RoutingError};

/// Immutable replica set of one partition.
///
/// The topology manager is responsible for never listing the leader among
/// the followers; the router does not deduplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRouter<E = Endpoint> {
    leader: Option<E>,
    followers: Vec<E>,
    local: Option<E>,
}

impl<E> Default for PartitionRouter<E> {
    fn default() -> Self {
        Self {
            leader: None,
            followers: Vec::new(),
            local: None,
        }
    }
}

impl<E> PartitionRouter<E> {
    /// Start assembling a replica set.
    pub fn builder() -> PartitionRouterBuilder<E> {
        PartitionRouterBuilder::default()
    }

    /// A router that knows no replicas. Every selection fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn leader(&self) -> Option<&E> {
        self.leader.as_ref()
    }

    /// Followers in the order the topology manager supplied them.
    pub fn followers(&self) -> &[E] {
        &self.followers
    }

    pub fn local_endpoint(&self) -> Option<&E> {
        self.local.as_ref()
    }

    /// Number of distinct replicas (leader plus followers).
    pub fn replica_count(&self) -> usize {
        self.followers.len() + usize::from(self.leader.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.leader.is_none() && self.followers.is_empty() && self.local.is_none()
    }

    /// Select an endpoint using the thread-local random generator.
    pub fn select_read_endpoint(&self, strategy: Option<ReadStrategy>) -> Result<&E> {
        self.select_read_endpoint_with(strategy, &mut rand::rng())
    }

    /// Select an endpoint drawing randomness from `rng`.
    pub fn select_read_endpoint_with<R: Rng + ?Sized>(
        &self,
        strategy: Option<ReadStrategy>,
        rng: &mut R,
    ) -> Result<&E> {
        let chosen = match strategy {
            // single replica, or nothing to choose by
            _ if self.followers.is_empty() => {
                debug!("single replica partition, choose leader for reading");
                self.leader.as_ref()
            }
            None | Some(ReadStrategy::ReadLeader) | Some(ReadStrategy::Unspecified) => {
                debug!("choose leader partition for reading");
                self.leader.as_ref()
            }
            Some(ReadStrategy::ReadFollower) => {
                debug!("rand choose follower partition for reading");
                Some(self.random_follower(rng))
            }
            Some(ReadStrategy::ReadLocal) => match self.local.as_ref() {
                Some(local) => {
                    debug!("choose fast partition for reading");
                    Some(local)
                }
                None => {
                    debug!("rand choose follower partition for reading");
                    Some(self.random_follower(rng))
                }
            },
            Some(ReadStrategy::ReadRandom) => {
                debug!("rand choose partition for reading");
                self.random_replica(rng)
            }
        };

        chosen.ok_or_else(|| {
            warn!(
                strategy = strategy.map_or("unset", ReadStrategy::as_str),
                "no available partition for reading"
            );
            RoutingError::NoAvailableEndpoint { strategy }
        })
    }

    /// Callers guarantee `followers` is non-empty.
    fn random_follower<R: Rng + ?Sized>(&self, rng: &mut R) -> &E {
        &self.followers[rng.random_range(0..self.followers.len())]
    }

    /// Uniform over `{leader} ∪ followers`; index 0 is the leader when present.
    fn random_replica<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&E> {
        let total = self.replica_count();
        if total == 0 {
            return None;
        }
        let index = rng.random_range(0..total);
        match &self.leader {
            Some(leader) if index == 0 => Some(leader),
            Some(_) => self.followers.get(index - 1),
            None => self.followers.get(index),
        }
    }
}

/// Builder for [`PartitionRouter`].
///
/// # Example
///
/// ```rust
/// use corelib::{Endpoint, NodeId, ReadStrategy};
/// use routing::PartitionRouter;
///
/// let router = PartitionRouter::builder()
///     .leader(Endpoint::new(NodeId(1), "10.0.0.1:9527"))
///     .follower(Endpoint::new(NodeId(2), "10.0.0.2:9527"))
///     .build();
///
/// let endpoint = router.select_read_endpoint(Some(ReadStrategy::ReadLeader)).unwrap();
/// assert_eq!(endpoint.id, NodeId(1));
/// ```
#[derive(Debug, Clone)]
pub struct PartitionRouterBuilder<E = Endpoint> {
    inner: PartitionRouter<E>,
}

impl<E> Default for PartitionRouterBuilder<E> {
    fn default() -> Self {
        Self {
            inner: PartitionRouter::default(),
        }
    }
}

impl<E> PartitionRouterBuilder<E> {
    pub fn leader(mut self, leader: E) -> Self {
        self.inner.leader = Some(leader);
        self
    }

    /// Set or clear the leader, e.g. while an election is in progress.
    pub fn maybe_leader(mut self, leader: Option<E>) -> Self {
        self.inner.leader = leader;
        self
    }

    /// Append one follower.
    pub fn follower(mut self, follower: E) -> Self {
        self.inner.followers.push(follower);
        self
    }

    /// Append followers, keeping their order.
    pub fn followers(mut self, followers: impl IntoIterator<Item = E>) -> Self {
        self.inner.followers.extend(followers);
        self
    }

    pub fn local_endpoint(mut self, local: E) -> Self {
        self.inner.local = Some(local);
        self
    }

    pub fn build(self) -> PartitionRouter<E> {
        self.inner
    }
}
