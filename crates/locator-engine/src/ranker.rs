//! Candidate ranking with fallback chain construction

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::types::{LocatorCandidate, LocatorKind, RankedLocators};

/// Default number of fallbacks attached to each ranked candidate
pub const DEFAULT_MAX_FALLBACKS: usize = 3;

/// Orders catalog output into a ranked result
#[derive(Debug, Clone, Copy)]
pub struct LocatorRanker {
    max_fallbacks: usize,
}

impl Default for LocatorRanker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FALLBACKS)
    }
}

impl LocatorRanker {
    pub fn new(max_fallbacks: usize) -> Self {
        Self { max_fallbacks }
    }

    pub fn max_fallbacks(&self) -> usize {
        self.max_fallbacks
    }

    /// Sort by confidence (kind order breaks ties), keep the first candidate
    /// of each kind and attach the next candidates as fallbacks.
    pub fn rank(&self, mut candidates: Vec<LocatorCandidate>) -> RankedLocators {
        if candidates.is_empty() {
            return RankedLocators::empty();
        }

        candidates.sort_by(compare_candidates);

        let mut seen: Vec<LocatorKind> = Vec::with_capacity(candidates.len());
        candidates.retain(|candidate| {
            if seen.contains(&candidate.kind) {
                warn!(kind = candidate.kind.name(), "dropping duplicate candidate");
                false
            } else {
                seen.push(candidate.kind);
                true
            }
        });

        let stripped: Vec<LocatorCandidate> = candidates
            .iter()
            .map(LocatorCandidate::without_fallbacks)
            .collect();

        let ranked: Vec<LocatorCandidate> = candidates
            .into_iter()
            .enumerate()
            .map(|(index, mut candidate)| {
                candidate.fallbacks = stripped
                    .iter()
                    .skip(index + 1)
                    .take(self.max_fallbacks)
                    .cloned()
                    .collect();
                candidate
            })
            .collect();

        if let Some(best) = ranked.first() {
            debug!(
                "Best locator {} = {} (confidence: {:.2}, alternatives: {})",
                best.kind.name(),
                best.value,
                best.confidence,
                ranked.len() - 1
            );
        }

        RankedLocators::from_sorted(ranked)
    }
}

/// Rank with the default fallback depth
pub fn rank(candidates: Vec<LocatorCandidate>) -> RankedLocators {
    LocatorRanker::default().rank(candidates)
}

fn compare_candidates(a: &LocatorCandidate, b: &LocatorCandidate) -> Ordering {
    b.confidence
        .partial_cmp(&a.confidence)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.kind.priority().cmp(&b.kind.priority()))
}
