//! Client-side read routing for partitioned, replicated tables.
//!
//! This crate decides which replica of a partition a read is sent to:
//! - [`PartitionRouter`]: immutable replica set with the selection logic
//! - [`RouterHandle`]: atomic publication of new replica sets
//! - [`TableRouter`] / [`RoutingTable`]: per-table strategy and partitions
//! - [`RoutingConfig`]: strategy configuration

pub mod config;
pub mod error;
pub mod handle;
pub mod router;
pub mod table;

pub use config::RoutingConfig;
pub use corelib::{Endpoint, NodeId, ReadStrategy};
pub use error::{Result, RoutingError};
pub use handle::RouterHandle;
pub use router::{PartitionRouter, PartitionRouterBuilder};
pub use table::{RoutingTable, TableRouter};
