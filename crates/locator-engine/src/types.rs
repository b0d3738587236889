//! Core types for locator system

use serde::{Deserialize, Serialize};

use crate::waiting::WaitPlan;

/// Locator strategy kind
///
/// Declaration order is the catalog enumeration order and the tie-break order
/// when two candidates carry equal confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorKind {
    /// Raw `id` attribute
    Id,

    /// `data-testid` attribute selector
    TestId,

    /// `aria-label` attribute selector
    AccessibilityId,

    /// Raw `name` attribute
    Name,

    /// Composed CSS selector
    Css,

    /// Composed XPath expression
    Xpath,

    /// Visible text match
    Text,

    /// Class selector
    Class,
}

impl LocatorKind {
    /// All kinds in catalog enumeration order
    pub const ALL: [LocatorKind; 8] = [
        LocatorKind::Id,
        LocatorKind::TestId,
        LocatorKind::AccessibilityId,
        LocatorKind::Name,
        LocatorKind::Css,
        LocatorKind::Xpath,
        LocatorKind::Text,
        LocatorKind::Class,
    ];

    /// Get kind name as string
    pub fn name(&self) -> &'static str {
        match self {
            LocatorKind::Id => "id",
            LocatorKind::TestId => "test_id",
            LocatorKind::AccessibilityId => "accessibility_id",
            LocatorKind::Name => "name",
            LocatorKind::Css => "css",
            LocatorKind::Xpath => "xpath",
            LocatorKind::Text => "text",
            LocatorKind::Class => "class",
        }
    }

    /// Base confidence of candidates produced by this kind
    pub fn confidence(&self) -> f64 {
        match self {
            LocatorKind::Id => 0.95,
            LocatorKind::TestId => 0.90,
            LocatorKind::AccessibilityId => 0.85,
            LocatorKind::Name => 0.80,
            LocatorKind::Css => 0.75,
            LocatorKind::Xpath => 0.70,
            LocatorKind::Text => 0.65,
            LocatorKind::Class => 0.55,
        }
    }

    /// Position in the enumeration order
    pub fn priority(&self) -> usize {
        *self as usize
    }
}

/// One proposed way to locate an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorCandidate {
    /// Strategy that produced this candidate
    pub kind: LocatorKind,

    /// Locator expression in the native dialect of `kind`
    pub value: String,

    /// Human-readable rationale
    pub description: String,

    /// Confidence score (0.0-1.0), fixed per kind
    pub confidence: f64,

    /// Lower-ranked alternatives, filled in by the ranker
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<LocatorCandidate>,
}

impl LocatorCandidate {
    /// Create a new candidate; confidence comes from the kind
    pub fn new(kind: LocatorKind, value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            description: description.into(),
            confidence: kind.confidence(),
            fallbacks: Vec::new(),
        }
    }

    /// Check if this is a high-confidence locator (>= 0.8)
    pub fn is_high_confidence(&self) -> bool {
        self.confidence >= 0.8
    }

    /// Copy of this candidate without its fallback list
    pub fn without_fallbacks(&self) -> Self {
        Self {
            fallbacks: Vec::new(),
            ..self.clone()
        }
    }
}

/// Confidence-sorted, kind-deduplicated candidates for one descriptor.
///
/// Empty means the locator could not be determined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedLocators(Vec<LocatorCandidate>);

impl RankedLocators {
    pub(crate) fn from_sorted(candidates: Vec<LocatorCandidate>) -> Self {
        Self(candidates)
    }

    /// Empty result ("locator not determinable")
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Highest-ranked candidate
    pub fn best(&self) -> Option<&LocatorCandidate> {
        self.0.first()
    }

    /// Every candidate after the best one, in rank order
    pub fn alternatives(&self) -> &[LocatorCandidate] {
        self.0.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LocatorCandidate> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[LocatorCandidate] {
        &self.0
    }

    /// Kinds in rank order
    pub fn kinds(&self) -> Vec<LocatorKind> {
        self.0.iter().map(|c| c.kind).collect()
    }
}

impl<'a> IntoIterator for &'a RankedLocators {
    type Item = &'a LocatorCandidate;
    type IntoIter = std::slice::Iter<'a, LocatorCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Per-element summary handed to callers for display and persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorReport {
    /// Caller-supplied element name
    pub element_name: String,

    /// False when no locator could be determined
    pub resolved: bool,

    /// Best locator, if any
    pub best: Option<LocatorCandidate>,

    /// Full ranked list
    pub locators: RankedLocators,

    /// Wait plan for the element
    pub wait: WaitPlan,
}

impl LocatorReport {
    /// Build a report from a ranked result and wait plan
    pub fn new(element_name: impl Into<String>, locators: RankedLocators, wait: WaitPlan) -> Self {
        Self {
            element_name: element_name.into(),
            resolved: !locators.is_empty(),
            best: locators.best().map(LocatorCandidate::without_fallbacks),
            locators,
            wait,
        }
    }
}
