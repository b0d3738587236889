//! Locator Forge - drive the locator engine from descriptor and plan files

pub mod cli;
pub mod config;

pub use config::{apply_env_overrides, load_config, Config};
