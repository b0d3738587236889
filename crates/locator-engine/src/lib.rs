//! Element locator resolution
//!
//! Turns a static element descriptor into ranked, framework-neutral locators
//! and renders them as automation code:
//! - Strategy catalog with fixed per-kind confidence
//! - Deterministic ranking with bounded fallbacks
//! - Wait-plan selection by element kind
//! - Selenium and Playwright code emission, page objects and test scripts
//! - Bounded result cache and concurrent batch analysis

pub mod batch;
pub mod cache;
pub mod config;
pub mod descriptor;
pub mod emitter;
pub mod engine;
pub mod errors;
pub mod ranker;
pub mod script;
pub mod strategies;
pub mod types;
pub mod waiting;

pub use batch::BatchAnalyzer;
pub use cache::{CacheStats, LocatorCache, DEFAULT_CACHE_CAPACITY};
pub use config::{EngineConfig, DEFAULT_BATCH_WORKERS};
pub use descriptor::ElementDescriptor;
pub use emitter::{emit, emit_wait, Action, Dialect, Framework};
pub use engine::LocatorEngine;
pub use errors::*;
pub use ranker::{rank, LocatorRanker, DEFAULT_MAX_FALLBACKS};
pub use script::{emit_page_object, ScriptStep, TestScriptBuilder};
pub use strategies::{analyze, LocatorCatalog};
pub use types::*;
pub use waiting::{select_wait, WaitKind, WaitPlan};
