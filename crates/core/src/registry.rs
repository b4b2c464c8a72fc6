//! Registry of collector factories

use crate::{BoxedCollector, Collector};
use anyhow::{anyhow, bail, Result};
use cncsnap_types::CollectorConfig;
use std::collections::{HashMap, HashSet};

/// Function that creates a collector from its registration entry
pub type CollectorFactory = fn(&CollectorConfig) -> BoxedCollector;

/// Information about a registered collector
#[derive(Clone)]
pub struct CollectorInfo {
    pub id: String,
    pub name: String,
    /// Collector ids that must be registered earlier in the list
    pub requires: Vec<String>,
    factory: CollectorFactory,
}

impl std::fmt::Debug for CollectorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("requires", &self.requires)
            .finish()
    }
}

/// Maps collector ids to factories.
///
/// Turning a configured registration list into collectors goes through
/// [`Registry::build`], which enforces the ordering contract between
/// derived collectors and the raw fields they read.
pub struct Registry {
    collectors: HashMap<String, CollectorInfo>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            collectors: HashMap::new(),
        }
    }

    /// Register a collector
    pub fn register_collector(
        &mut self,
        id: &str,
        name: &str,
        requires: &[&str],
        factory: CollectorFactory,
    ) {
        self.collectors.insert(
            id.to_string(),
            CollectorInfo {
                id: id.to_string(),
                name: name.to_string(),
                requires: requires.iter().map(|r| r.to_string()).collect(),
                factory,
            },
        );
    }

    pub fn get(&self, id: &str) -> Option<&CollectorInfo> {
        self.collectors.get(id)
    }

    /// Create one collector, applying the entry's policy override
    pub fn create_collector(&self, config: &CollectorConfig) -> Result<BoxedCollector> {
        let info = self
            .collectors
            .get(&config.id)
            .ok_or_else(|| anyhow!("Unknown collector: {}", config.id))?;
        let mut collector = (info.factory)(config);
        if let Some(policy) = config.policy {
            collector.set_policy(policy);
        }
        Ok(collector)
    }

    /// Create the full collector list in registration order
    pub fn build(&self, configs: &[CollectorConfig]) -> Result<Vec<BoxedCollector>> {
        let mut seen = HashSet::new();
        let mut collectors = Vec::with_capacity(configs.len());

        for config in configs {
            let info = self
                .collectors
                .get(&config.id)
                .ok_or_else(|| anyhow!("Unknown collector: {}", config.id))?;

            for required in &info.requires {
                if !seen.contains(required.as_str()) {
                    bail!(
                        "Collector '{}' must be registered after '{}'",
                        config.id,
                        required
                    );
                }
            }

            if !seen.insert(config.id.as_str()) {
                bail!("Collector '{}' registered more than once", config.id);
            }

            collectors.push(self.create_collector(config)?);
        }

        Ok(collectors)
    }

    /// All registered collectors, sorted by id
    pub fn list_collectors(&self) -> Vec<&CollectorInfo> {
        let mut list: Vec<&CollectorInfo> = self.collectors.values().collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
