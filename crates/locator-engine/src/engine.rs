//! Engine façade owning catalog, ranker and the shared cache

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::batch::BatchAnalyzer;
use crate::cache::{CacheStats, LocatorCache};
use crate::config::EngineConfig;
use crate::descriptor::ElementDescriptor;
use crate::emitter::{self, Action, Framework};
use crate::errors::LocatorError;
use crate::ranker::LocatorRanker;
use crate::script::{self, TestScriptBuilder};
use crate::strategies::LocatorCatalog;
use crate::types::{LocatorCandidate, LocatorReport, RankedLocators};
use crate::waiting::{self, WaitPlan};

/// Locator engine entry point
///
/// Cheap to clone; clones share the cache.
#[derive(Debug, Clone)]
pub struct LocatorEngine {
    config: EngineConfig,
    catalog: Arc<LocatorCatalog>,
    ranker: LocatorRanker,
    cache: Arc<LocatorCache>,
}

impl LocatorEngine {
    /// Build an engine from a validated config
    pub fn new(config: EngineConfig) -> Result<Self, LocatorError> {
        config.validate()?;
        let catalog = LocatorCatalog::new(config.generated_class_prefixes.iter());
        let ranker = LocatorRanker::new(config.max_fallbacks);
        let cache = LocatorCache::new(config.cache_capacity);

        info!(
            cache_capacity = config.cache_capacity,
            max_fallbacks = config.max_fallbacks,
            batch_workers = config.batch_workers,
            "locator engine initialized"
        );

        Ok(Self {
            config,
            catalog: Arc::new(catalog),
            ranker,
            cache: Arc::new(cache),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Default framework from config
    pub fn framework(&self) -> Framework {
        self.config.default_framework
    }

    /// Unranked candidates in catalog order
    pub fn analyze(&self, descriptor: &ElementDescriptor) -> Vec<LocatorCandidate> {
        self.catalog.analyze(descriptor)
    }

    pub fn rank(&self, candidates: Vec<LocatorCandidate>) -> RankedLocators {
        self.ranker.rank(candidates)
    }

    /// Analyze and rank, consulting the shared cache first
    pub fn resolve(&self, descriptor: &ElementDescriptor) -> RankedLocators {
        let ranker = self.ranker;
        let catalog = &self.catalog;
        let ranked = self
            .cache
            .get_or_compute(descriptor, |d| ranker.rank(catalog.analyze(d)));
        if ranked.is_empty() {
            warn!(tag = %descriptor.tag(), "no locator could be determined");
        }
        ranked
    }

    pub fn select_wait(&self, descriptor: &ElementDescriptor) -> WaitPlan {
        waiting::select_wait(descriptor)
    }

    /// Resolve and summarize one named element
    pub fn report(&self, element_name: &str, descriptor: &ElementDescriptor) -> LocatorReport {
        let locators = self.resolve(descriptor);
        let wait = self.select_wait(descriptor);
        debug!(
            element = element_name,
            resolved = !locators.is_empty(),
            wait = wait.kind.name(),
            "report built"
        );
        LocatorReport::new(element_name, locators, wait)
    }

    /// Resolve and emit code for one action
    pub fn emit(
        &self,
        descriptor: &ElementDescriptor,
        action: &Action,
        element_name: &str,
        framework: Framework,
        value: Option<&str>,
    ) -> Result<String, LocatorError> {
        let ranked = self.resolve(descriptor);
        Ok(emitter::emit(&ranked, action, element_name, framework, value)?)
    }

    /// Resolve and emit a page-object fragment
    pub fn page_object(
        &self,
        descriptor: &ElementDescriptor,
        element_name: &str,
        framework: Framework,
    ) -> String {
        script::emit_page_object(&self.resolve(descriptor), element_name, framework)
    }

    /// Register a resolved element and its wait plan on a script builder
    pub fn register(
        &self,
        builder: TestScriptBuilder,
        element_name: &str,
        descriptor: &ElementDescriptor,
    ) -> TestScriptBuilder {
        let report = self.report(element_name, descriptor);
        builder.element_with_wait(element_name, report.locators, report.wait)
    }

    /// Rank many descriptors concurrently; output order matches input order
    pub async fn analyze_many(
        &self,
        descriptors: Vec<ElementDescriptor>,
    ) -> Result<Vec<RankedLocators>, LocatorError> {
        self.batch().analyze_many(descriptors).await
    }

    pub async fn analyze_many_with_cancel(
        &self,
        descriptors: Vec<ElementDescriptor>,
        cancel: CancellationToken,
    ) -> Result<Vec<RankedLocators>, LocatorError> {
        self.batch().analyze_many_with_cancel(descriptors, cancel).await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn batch(&self) -> BatchAnalyzer {
        BatchAnalyzer::new(
            Arc::clone(&self.catalog),
            self.ranker,
            Arc::clone(&self.cache),
            self.config.batch_workers,
        )
    }
}
