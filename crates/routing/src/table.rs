//! Table-level routing.
//!
//! A table is split into a fixed number of partitions, each with its own
//! [`RouterHandle`]. The table carries the read strategy configured for it,
//! so the request path only names `(table, partition)`.

use std::sync::Arc;

use arc_swap::ArcSwap;
use corelib::{Endpoint, ReadStrategy};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::info;

use crate::config::RoutingConfig;
use crate::error::{Result, RoutingError};
use crate::handle::RouterHandle;
use crate::router::PartitionRouter;

/// Routers for every partition of one table, plus the table's strategy.
///
/// Cloning is cheap: clones share the same partition handles.
#[derive(Debug)]
pub struct TableRouter<E = Endpoint> {
    name: Arc<str>,
    strategy: Option<ReadStrategy>,
    partitions: Arc<[RouterHandle<E>]>,
}

impl<E> Clone for TableRouter<E> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            strategy: self.strategy,
            partitions: Arc::clone(&self.partitions),
        }
    }
}

impl<E> TableRouter<E> {
    /// Create a table whose partitions have no known replicas yet.
    pub fn new(
        name: impl Into<Arc<str>>,
        partition_count: usize,
        strategy: Option<ReadStrategy>,
    ) -> Self {
        Self {
            name: name.into(),
            strategy,
            partitions: (0..partition_count).map(|_| RouterHandle::empty()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy(&self) -> Option<ReadStrategy> {
        self.strategy
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Same partitions, different strategy.
    pub fn with_strategy(&self, strategy: Option<ReadStrategy>) -> Self {
        Self {
            strategy,
            ..self.clone()
        }
    }

    pub fn partition(&self, pid: usize) -> Result<&RouterHandle<E>> {
        self.partitions
            .get(pid)
            .ok_or_else(|| RoutingError::PartitionNotFound {
                table: self.name.to_string(),
                pid,
            })
    }

    /// Publish a new replica set for one partition.
    pub fn publish_partition(&self, pid: usize, router: PartitionRouter<E>) -> Result<()> {
        self.partition(pid)?.publish(router);
        Ok(())
    }
}

impl<E: Clone> TableRouter<E> {
    /// Select a read endpoint using the table's configured strategy.
    pub fn select_read_endpoint(&self, pid: usize) -> Result<E> {
        self.select_read_endpoint_with_strategy(pid, self.strategy)
    }

    /// Select a read endpoint with a per-call strategy override.
    pub fn select_read_endpoint_with_strategy(
        &self,
        pid: usize,
        strategy: Option<ReadStrategy>,
    ) -> Result<E> {
        self.partition(pid)?.select_read_endpoint(strategy)
    }
}

/// Registry of every table this client routes reads for.
#[derive(Debug)]
pub struct RoutingTable<E = Endpoint> {
    config: ArcSwap<RoutingConfig>,
    tables: DashMap<String, TableRouter<E>>,
}

impl<E> Default for RoutingTable<E> {
    fn default() -> Self {
        Self::new(RoutingConfig::default())
    }
}

impl<E> RoutingTable<E> {
    pub fn new(config: RoutingConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            tables: DashMap::new(),
        }
    }

    pub fn config(&self) -> Arc<RoutingConfig> {
        self.config.load_full()
    }

    /// Register a table, or return it if already registered with the same
    /// partition count. A changed partition count replaces the table.
    ///
    /// Lookup and insert happen under one shard lock, so concurrent callers
    /// registering the same table all get the same partition handles.
    pub fn register(&self, name: &str, partition_count: usize) -> TableRouter<E> {
        match self.tables.entry(name.to_string()) {
            Entry::Occupied(existing) if existing.get().partition_count() == partition_count => {
                existing.get().clone()
            }
            Entry::Occupied(mut existing) => {
                let table = self.new_table(name, partition_count);
                existing.insert(table.clone());
                table
            }
            Entry::Vacant(vacant) => {
                let table = self.new_table(name, partition_count);
                vacant.insert(table.clone());
                table
            }
        }
    }

    /// Called with the table's shard lock held.
    fn new_table(&self, name: &str, partition_count: usize) -> TableRouter<E> {
        let strategy = self.config.load().strategy_for(name);
        info!(
            table = name,
            partitions = partition_count,
            strategy = strategy.map_or("unset", ReadStrategy::as_str),
            "registered table for read routing"
        );
        TableRouter::new(name, partition_count, strategy)
    }

    pub fn get(&self, name: &str) -> Option<TableRouter<E>> {
        self.tables.get(name).map(|table| table.clone())
    }

    pub fn remove(&self, name: &str) -> Option<TableRouter<E>> {
        self.tables.remove(name).map(|(_, table)| table)
    }

    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Install a new config and re-derive every table's strategy. Partition
    /// handles are kept, so published routers survive.
    ///
    /// The config is stored before tables are visited, and each table reads
    /// the current config under its shard lock. A table registered
    /// concurrently either sees the new config itself or is visited here.
    pub fn apply_config(&self, config: RoutingConfig) {
        self.config.store(Arc::new(config));

        for mut entry in self.tables.iter_mut() {
            let strategy = self.config.load().strategy_for(entry.key());
            if entry.strategy() != strategy {
                info!(
                    table = entry.key().as_str(),
                    strategy = strategy.map_or("unset", ReadStrategy::as_str),
                    "read strategy changed"
                );
                let updated = entry.with_strategy(strategy);
                *entry.value_mut() = updated;
            }
        }
    }
}

impl<E: Clone> RoutingTable<E> {
    pub fn select_read_endpoint(&self, table: &str, pid: usize) -> Result<E> {
        self.get(table)
            .ok_or_else(|| RoutingError::TableNotFound(table.to_string()))?
            .select_read_endpoint(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::NodeId;

    fn ep(id: u128) -> Endpoint {
        Endpoint::new(NodeId(id), format!("10.0.0.{}:9527", id))
    }

    #[test]
    fn test_table_partitions_start_empty() {
        let table: TableRouter = TableRouter::new("t1", 4, None);
        assert_eq!(table.partition_count(), 4);
        for pid in 0..4 {
            assert!(table.partition(pid).unwrap().load().is_empty());
        }
    }

    #[test]
    fn test_unknown_partition() {
        let table: TableRouter = TableRouter::new("t1", 2, None);
        let err = table.select_read_endpoint(2).unwrap_err();
        assert!(matches!(
            err,
            RoutingError::PartitionNotFound { ref table, pid: 2 } if table == "t1"
        ));
        assert!(table
            .publish_partition(5, PartitionRouter::builder().leader(ep(1)).build())
            .is_err());
    }

    #[test]
    fn test_table_strategy_applies_per_partition() {
        let table = TableRouter::new("t1", 2, Some(ReadStrategy::ReadFollower));
        table
            .publish_partition(
                0,
                PartitionRouter::builder().leader(ep(1)).follower(ep(2)).build(),
            )
            .unwrap();
        table
            .publish_partition(1, PartitionRouter::builder().leader(ep(3)).build())
            .unwrap();

        assert_eq!(table.select_read_endpoint(0).unwrap(), ep(2));
        assert_eq!(table.select_read_endpoint(1).unwrap(), ep(3));
        assert_eq!(
            table
                .select_read_endpoint_with_strategy(0, Some(ReadStrategy::ReadLeader))
                .unwrap(),
            ep(1)
        );
    }

    #[test]
    fn test_register_uses_config_strategy() {
        let registry: RoutingTable = RoutingTable::new(
            RoutingConfig::default()
                .with_default(ReadStrategy::ReadLeader)
                .with_table("hot", ReadStrategy::ReadRandom),
        );

        assert_eq!(registry.register("hot", 1).strategy(), Some(ReadStrategy::ReadRandom));
        assert_eq!(registry.register("cold", 1).strategy(), Some(ReadStrategy::ReadLeader));
        assert_eq!(registry.table_names(), vec!["cold".to_string(), "hot".to_string()]);
    }

    #[test]
    fn test_register_is_idempotent_for_same_shape() {
        let registry: RoutingTable = RoutingTable::default();
        let first = registry.register("t1", 2);
        first
            .publish_partition(0, PartitionRouter::builder().leader(ep(1)).build())
            .unwrap();

        let again = registry.register("t1", 2);
        assert_eq!(again.select_read_endpoint(0).unwrap(), ep(1));

        let resized = registry.register("t1", 3);
        assert_eq!(resized.partition_count(), 3);
        assert!(resized.select_read_endpoint(0).is_err());
    }

    #[test]
    fn test_select_through_registry() {
        let registry: RoutingTable = RoutingTable::default();
        let table = registry.register("t1", 1);
        table
            .publish_partition(0, PartitionRouter::builder().leader(ep(7)).build())
            .unwrap();

        assert_eq!(registry.select_read_endpoint("t1", 0).unwrap(), ep(7));
        assert!(matches!(
            registry.select_read_endpoint("missing", 0),
            Err(RoutingError::TableNotFound(name)) if name == "missing"
        ));

        assert!(registry.remove("t1").is_some());
        assert!(registry.get("t1").is_none());
    }

    #[test]
    fn test_apply_config_keeps_published_routers() {
        let registry: RoutingTable = RoutingTable::default();
        let table = registry.register("t1", 1);
        table
            .publish_partition(
                0,
                PartitionRouter::builder().leader(ep(1)).follower(ep(2)).build(),
            )
            .unwrap();
        assert_eq!(registry.select_read_endpoint("t1", 0).unwrap(), ep(1));

        registry.apply_config(RoutingConfig::default().with_table("t1", ReadStrategy::ReadFollower));

        assert_eq!(registry.get("t1").unwrap().strategy(), Some(ReadStrategy::ReadFollower));
        assert_eq!(registry.select_read_endpoint("t1", 0).unwrap(), ep(2));
        assert_eq!(
            registry.config().strategy_for("t1"),
            Some(ReadStrategy::ReadFollower)
        );
    }
}
