pub mod analyze;
pub mod emit;
pub mod input;
pub mod output;
pub mod script;
pub mod version;

pub use analyze::{cmd_analyze, AnalyzeArgs};
pub use emit::{cmd_emit, EmitArgs};
pub use output::OutputFormat;
pub use script::{cmd_script, ScriptArgs};
pub use version::cmd_version;

use anyhow::Result;
use locator_engine::{Framework, LocatorEngine};

/// `--framework` if given, else the configured default
pub(crate) fn resolve_framework(flag: Option<&str>, engine: &LocatorEngine) -> Result<Framework> {
    match flag {
        Some(name) => Ok(name.parse::<Framework>()?),
        None => Ok(engine.framework()),
    }
}
