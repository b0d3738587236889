use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use locator_engine::{Action, LocatorEngine};
use serde::Serialize;
use tracing::info;

use super::input::read_descriptors;
use super::output::{render_structured, OutputFormat};
use super::resolve_framework;

#[derive(Args, Clone, Debug)]
pub struct EmitArgs {
    /// Descriptor file (JSON or YAML)
    pub file: PathBuf,

    /// Target framework (selenium, playwright); defaults to config
    #[arg(short, long)]
    pub framework: Option<String>,

    /// Action to perform on every element
    #[arg(short, long, default_value = "click")]
    pub action: String,

    /// Text typed by the `input` action
    #[arg(long)]
    pub value: Option<String>,

    /// Emit page-object fragments instead of action code
    #[arg(long)]
    pub page_object: bool,
}

#[derive(Debug, Serialize)]
struct EmittedCode {
    element_name: String,
    code: String,
}

pub async fn cmd_emit(args: EmitArgs, engine: &LocatorEngine, format: OutputFormat) -> Result<()> {
    let framework = resolve_framework(args.framework.as_deref(), engine)?;
    let action = Action::from(args.action.as_str());
    let elements = read_descriptors(&args.file).await?;
    info!(
        "Emitting {} code for {} element(s)",
        framework,
        elements.len()
    );

    let mut emitted = Vec::with_capacity(elements.len());
    for element in &elements {
        let code = if args.page_object {
            engine.page_object(&element.descriptor, &element.name, framework)
        } else {
            engine.emit(
                &element.descriptor,
                &action,
                &element.name,
                framework,
                args.value.as_deref(),
            )?
        };
        emitted.push(EmittedCode {
            element_name: element.name.clone(),
            code,
        });
    }

    match render_structured(&emitted, format)? {
        Some(text) => println!("{}", text),
        None => {
            let blocks: Vec<&str> = emitted.iter().map(|e| e.code.as_str()).collect();
            println!("{}", blocks.join("\n\n"));
        }
    }
    Ok(())
}
