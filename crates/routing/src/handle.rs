//! Atomic publication of partition routers.
//!
//! The topology manager never edits a live router. On every leadership or
//! membership change it builds a new [`PartitionRouter`] and publishes it
//! through a [`RouterHandle`]; readers pick up whichever snapshot is current.
//!
//! # Performance
//!
//! - **Reads**: Lock-free via `ArcSwap::load()`. No contention on the hot path.
//! - **Writes**: Atomic pointer swap. Writers do not block readers.

use std::sync::Arc;

use arc_swap::ArcSwap;
use corelib::{Endpoint, ReadStrategy};
use tracing::debug;

use crate::error::Result;
use crate::router::PartitionRouter;

/// Shared, swappable reference to the current router of one partition.
///
/// Safe to clone and share across threads; all clones observe the same
/// published router.
#[derive(Debug)]
pub struct RouterHandle<E = Endpoint> {
    inner: Arc<ArcSwap<PartitionRouter<E>>>,
}

impl<E> Clone for RouterHandle<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> Default for RouterHandle<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E> RouterHandle<E> {
    pub fn new(router: PartitionRouter<E>) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(router)),
        }
    }

    /// A handle whose partition has no known replicas yet.
    pub fn empty() -> Self {
        Self::new(PartitionRouter::empty())
    }

    /// Current router snapshot.
    ///
    /// The snapshot stays valid and unchanged even if a new router is
    /// published while the caller holds it.
    pub fn load(&self) -> Arc<PartitionRouter<E>> {
        self.inner.load_full()
    }

    /// Replace the router wholesale. Returns the previously published one.
    pub fn publish(&self, router: PartitionRouter<E>) -> Arc<PartitionRouter<E>> {
        debug!(
            replicas = router.replica_count(),
            has_leader = router.leader().is_some(),
            has_local = router.local_endpoint().is_some(),
            "publishing partition router"
        );
        self.inner.swap(Arc::new(router))
    }
}

impl<E: Clone> RouterHandle<E> {
    /// Select an endpoint from the current snapshot.
    ///
    /// The whole decision is made against one snapshot, so a concurrent
    /// `publish` can never mix old and new replica fields.
    pub fn select_read_endpoint(&self, strategy: Option<ReadStrategy>) -> Result<E> {
        let router = self.inner.load();
        let endpoint = router.select_read_endpoint(strategy)?.clone();
        Ok(endpoint)
    }
}
