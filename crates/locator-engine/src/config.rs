//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::emitter::Framework;
use crate::errors::LocatorError;
use crate::ranker::DEFAULT_MAX_FALLBACKS;
use crate::strategies::DEFAULT_GENERATED_CLASS_PREFIXES;

/// Default number of concurrent batch workers
pub const DEFAULT_BATCH_WORKERS: usize = 8;

/// Tunables for the locator engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ranked results kept in the locator cache
    pub cache_capacity: usize,

    /// Fallbacks attached to each ranked candidate
    pub max_fallbacks: usize,

    /// Concurrent workers used by batch analysis
    pub batch_workers: usize,

    /// Class prefixes treated as framework-generated
    pub generated_class_prefixes: Vec<String>,

    /// Dialect used when the caller does not name one
    pub default_framework: Framework,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_fallbacks: DEFAULT_MAX_FALLBACKS,
            batch_workers: DEFAULT_BATCH_WORKERS,
            generated_class_prefixes: DEFAULT_GENERATED_CLASS_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            default_framework: Framework::Selenium,
        }
    }
}

impl EngineConfig {
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_batch_workers(mut self, workers: usize) -> Self {
        self.batch_workers = workers;
        self
    }

    pub fn with_max_fallbacks(mut self, max: usize) -> Self {
        self.max_fallbacks = max;
        self
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), LocatorError> {
        if self.cache_capacity == 0 {
            return Err(LocatorError::InvalidConfig(
                "cache_capacity must be > 0".to_string(),
            ));
        }
        if self.batch_workers == 0 {
            return Err(LocatorError::InvalidConfig(
                "batch_workers must be > 0".to_string(),
            ));
        }
        if self
            .generated_class_prefixes
            .iter()
            .any(|prefix| prefix.trim().is_empty())
        {
            return Err(LocatorError::InvalidConfig(
                "generated_class_prefixes must not contain blank entries".to_string(),
            ));
        }
        Ok(())
    }
}
