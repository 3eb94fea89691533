//! Read routing configuration.
//!
//! Strategies are configured per table, with an optional cluster-wide
//! default. A table with no override and no default reads from its leader.
//!
//! ```json
//! {
//!   "default_strategy": "kReadLeader",
//!   "tables": { "user_profile": "kReadLocal", "click_log": "kReadRandom" }
//! }
//! ```

use std::collections::HashMap;

use corelib::ReadStrategy;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Strategy selection for every table this client reads from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Strategy for tables without their own entry. `None` means leader reads.
    pub default_strategy: Option<ReadStrategy>,
    /// Per-table overrides keyed by table name.
    pub tables: HashMap<String, ReadStrategy>,
}

impl RoutingConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_default(mut self, strategy: ReadStrategy) -> Self {
        self.default_strategy = Some(strategy);
        self
    }

    pub fn with_table(mut self, table: impl Into<String>, strategy: ReadStrategy) -> Self {
        self.tables.insert(table.into(), strategy);
        self
    }

    /// Table override if present, otherwise the default.
    pub fn strategy_for(&self, table: &str) -> Option<ReadStrategy> {
        self.tables.get(table).copied().or(self.default_strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoutingError;

    #[test]
    fn test_parse_full_config() {
        let config = RoutingConfig::from_json_str(
            r#"{
                "default_strategy": "kReadFollower",
                "tables": { "t1": "kReadLocal", "t2": "KReadRandom" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.strategy_for("t1"), Some(ReadStrategy::ReadLocal));
        assert_eq!(config.strategy_for("t2"), Some(ReadStrategy::ReadRandom));
        assert_eq!(config.strategy_for("other"), Some(ReadStrategy::ReadFollower));
    }

    #[test]
    fn test_empty_config_means_unset() {
        let config = RoutingConfig::from_json_str("{}").unwrap();
        assert_eq!(config, RoutingConfig::default());
        assert_eq!(config.strategy_for("anything"), None);
    }

    #[test]
    fn test_unknown_strategy_name_is_unspecified() {
        let config =
            RoutingConfig::from_json_str(r#"{ "tables": { "t1": "kReadNearest" } }"#).unwrap();
        assert_eq!(config.strategy_for("t1"), Some(ReadStrategy::Unspecified));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = RoutingConfig::from_json_str("{ \"tables\": 3 }").unwrap_err();
        assert!(matches!(err, RoutingError::Config(_)));
    }

    #[test]
    fn test_builder_methods() {
        let config = RoutingConfig::default()
            .with_default(ReadStrategy::ReadLeader)
            .with_table("t1", ReadStrategy::ReadRandom);
        assert_eq!(config.strategy_for("t1"), Some(ReadStrategy::ReadRandom));
        assert_eq!(config.strategy_for("t2"), Some(ReadStrategy::ReadLeader));
    }
}
