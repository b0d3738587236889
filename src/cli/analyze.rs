use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use locator_engine::{LocatorEngine, LocatorReport};
use tracing::info;

use super::input::read_descriptors;
use super::output::{render_report, render_structured, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct AnalyzeArgs {
    /// Descriptor file (JSON or YAML)
    pub file: PathBuf,
}

pub async fn cmd_analyze(
    args: AnalyzeArgs,
    engine: &LocatorEngine,
    format: OutputFormat,
) -> Result<()> {
    let elements = read_descriptors(&args.file).await?;
    info!("Analyzing {} element(s) from {}", elements.len(), args.file.display());

    let reports = build_reports(engine, &elements).await?;
    match render_structured(&reports, format)? {
        Some(text) => println!("{}", text),
        None => {
            for report in &reports {
                print!("{}", render_report(report));
            }
            let unresolved = reports.iter().filter(|r| !r.resolved).count();
            println!(
                "\n{} element(s), {} unresolved",
                reports.len(),
                unresolved
            );
        }
    }
    Ok(())
}

/// Batch-resolve every element and pair it with its wait plan
pub async fn build_reports(
    engine: &LocatorEngine,
    elements: &[super::input::Element],
) -> Result<Vec<LocatorReport>> {
    let descriptors = elements.iter().map(|e| e.descriptor.clone()).collect();
    let ranked = engine.analyze_many(descriptors).await?;
    Ok(elements
        .iter()
        .zip(ranked)
        .map(|(element, locators)| {
            LocatorReport::new(
                element.name.clone(),
                locators,
                engine.select_wait(&element.descriptor),
            )
        })
        .collect())
}
