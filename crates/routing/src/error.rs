//! Error types for read routing.

use corelib::ReadStrategy;
use thiserror::Error;

/// Result type alias for the routing crate.
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors surfaced to the request path.
///
/// The router never retries and never substitutes a default endpoint; the
/// caller owns retry and failover policy.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// No replica is known for the partition under the requested strategy.
    /// The partition is currently unroutable for reads.
    #[error("no available endpoint for reading (strategy: {})", display_strategy(.strategy))]
    NoAvailableEndpoint { strategy: Option<ReadStrategy> },

    /// Partition id is outside the table's partition range.
    #[error("partition {pid} not found in table {table:?}")]
    PartitionNotFound { table: String, pid: usize },

    /// Table has not been registered with the routing table.
    #[error("table {0:?} is not registered")]
    TableNotFound(String),

    /// Routing configuration could not be parsed.
    #[error("invalid routing config: {0}")]
    Config(#[from] serde_json::Error),
}

fn display_strategy(strategy: &Option<ReadStrategy>) -> &'static str {
    strategy.map_or("unset", ReadStrategy::as_str)
}
