//! Concurrent analysis of many descriptors (one crawled page at a time)

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::LocatorCache;
use crate::config::DEFAULT_BATCH_WORKERS;
use crate::descriptor::ElementDescriptor;
use crate::errors::LocatorError;
use crate::ranker::LocatorRanker;
use crate::strategies::LocatorCatalog;
use crate::types::RankedLocators;

/// Fans descriptor ranking out over tokio tasks, sharing one cache
#[derive(Debug, Clone)]
pub struct BatchAnalyzer {
    catalog: Arc<LocatorCatalog>,
    ranker: LocatorRanker,
    cache: Arc<LocatorCache>,
    workers: usize,
}

impl BatchAnalyzer {
    pub fn new(
        catalog: Arc<LocatorCatalog>,
        ranker: LocatorRanker,
        cache: Arc<LocatorCache>,
        workers: usize,
    ) -> Self {
        Self {
            catalog,
            ranker,
            cache,
            workers: workers.max(1),
        }
    }

    /// Analyzer with default catalog/ranker over the given cache
    pub fn with_cache(cache: Arc<LocatorCache>) -> Self {
        Self::new(
            Arc::new(LocatorCatalog::default()),
            LocatorRanker::default(),
            cache,
            DEFAULT_BATCH_WORKERS,
        )
    }

    pub fn cache(&self) -> &Arc<LocatorCache> {
        &self.cache
    }

    /// Rank every descriptor; output order matches input order
    pub async fn analyze_many(
        &self,
        descriptors: Vec<ElementDescriptor>,
    ) -> Result<Vec<RankedLocators>, LocatorError> {
        self.analyze_many_with_cancel(descriptors, CancellationToken::new())
            .await
    }

    /// Like [`analyze_many`](Self::analyze_many), but stops submitting work
    /// once `cancel` fires. In-flight descriptors are allowed to finish.
    pub async fn analyze_many_with_cancel(
        &self,
        descriptors: Vec<ElementDescriptor>,
        cancel: CancellationToken,
    ) -> Result<Vec<RankedLocators>, LocatorError> {
        let total = descriptors.len();
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();
        let mut submitted = 0usize;

        for (index, descriptor) in descriptors.into_iter().enumerate() {
            if cancel.is_cancelled() {
                break;
            }
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                permit = semaphore.clone().acquire_owned() => permit
                    .map_err(|err| LocatorError::Internal(format!("worker pool closed: {}", err)))?,
            };

            let catalog = Arc::clone(&self.catalog);
            let cache = Arc::clone(&self.cache);
            let ranker = self.ranker;
            tasks.spawn(async move {
                let _permit = permit;
                let ranked =
                    cache.get_or_compute(&descriptor, |d| ranker.rank(catalog.analyze(d)));
                (index, ranked)
            });
            submitted += 1;
        }

        let mut slots: Vec<Option<RankedLocators>> = vec![None; total];
        let mut completed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            let (index, ranked) = joined
                .map_err(|err| LocatorError::Internal(format!("batch worker failed: {}", err)))?;
            debug!(index, candidates = ranked.len(), "descriptor ranked");
            slots[index] = Some(ranked);
            completed += 1;
        }

        if submitted < total {
            warn!(completed, total, "batch analysis cancelled");
            return Err(LocatorError::Cancelled { completed, total });
        }

        let results: Vec<RankedLocators> = slots.into_iter().flatten().collect();
        if results.len() != total {
            return Err(LocatorError::Internal(format!(
                "batch produced {} results for {} descriptors",
                results.len(),
                total
            )));
        }

        let unresolved = results.iter().filter(|r| r.is_empty()).count();
        info!(
            total,
            unresolved,
            cached = self.cache.len(),
            "batch analysis complete"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocatorKind;

    #[tokio::test]
    async fn test_results_follow_input_order() {
        let analyzer = BatchAnalyzer::with_cache(Arc::new(LocatorCache::new(16)));
        let descriptors: Vec<ElementDescriptor> = (0..20)
            .map(|i| ElementDescriptor::new("input").with_name(format!("field-{}", i)))
            .collect();

        let results = analyzer.analyze_many(descriptors).await.unwrap();
        assert_eq!(results.len(), 20);
        for (i, ranked) in results.iter().enumerate() {
            let best = ranked.best().unwrap();
            assert_eq!(best.kind, LocatorKind::Name);
            assert_eq!(best.value, format!("field-{}", i));
        }
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let analyzer = BatchAnalyzer::with_cache(Arc::new(LocatorCache::default()));
        assert!(analyzer.analyze_many(Vec::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let analyzer = BatchAnalyzer::with_cache(Arc::new(LocatorCache::default()));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = analyzer
            .analyze_many_with_cancel(vec![ElementDescriptor::new("a").with_id("x")], cancel)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LocatorError::Cancelled {
                completed: 0,
                total: 1
            }
        );
    }

    #[tokio::test]
    async fn test_duplicates_share_cache_entry() {
        let cache = Arc::new(LocatorCache::new(16));
        let analyzer = BatchAnalyzer::new(
            Arc::new(LocatorCatalog::default()),
            LocatorRanker::default(),
            Arc::clone(&cache),
            2,
        );
        let descriptor = ElementDescriptor::new("button").with_id("save");
        let results = analyzer
            .analyze_many(vec![descriptor.clone(), descriptor.clone(), descriptor])
            .await
            .unwrap();
        assert_eq!(results[0], results[2]);
        assert_eq!(cache.len(), 1);
    }
}
