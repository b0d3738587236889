use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use locator_engine::{LocatorEngine, ScriptStep, TestScriptBuilder};
use tokio::fs;
use tracing::info;

use super::input::{name_elements, read_plan};
use super::resolve_framework;

#[derive(Args, Clone, Debug)]
pub struct ScriptArgs {
    /// Plan file with page_url, elements and steps
    pub file: PathBuf,

    /// Target framework (selenium, playwright); defaults to config
    #[arg(short, long)]
    pub framework: Option<String>,

    /// Write the script here instead of stdout
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,
}

pub async fn cmd_script(args: ScriptArgs, engine: &LocatorEngine) -> Result<()> {
    let framework = resolve_framework(args.framework.as_deref(), engine)?;
    let plan = read_plan(&args.file).await?;

    let mut builder = TestScriptBuilder::new(framework, plan.page_url.clone());
    if let Some(name) = plan.test_name.as_deref() {
        builder = builder.test_name(name);
    }
    for element in name_elements(plan.elements.clone()) {
        builder = engine.register(builder, &element.name, &element.descriptor);
    }
    for step in &plan.steps {
        builder = builder.step(ScriptStep::from(step));
    }

    let script = builder.build()?;
    info!(
        "Built {} script with {} step(s) for {}",
        framework,
        plan.steps.len(),
        plan.page_url
    );

    match args.save {
        Some(path) => {
            fs::write(&path, &script)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Script written to {}", path.display());
        }
        None => print!("{}", script),
    }
    Ok(())
}
