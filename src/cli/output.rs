use anyhow::{Context, Result};
use clap::ValueEnum;
use locator_engine::LocatorReport;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Yaml,
}

/// Serialize for the machine-readable formats; `None` for human output
pub fn render_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<Option<String>> {
    match format {
        OutputFormat::Human => Ok(None),
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(Some)
            .context("Failed to serialize JSON output"),
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map(Some)
            .context("Failed to serialize YAML output"),
    }
}

/// Human-readable block for one report
pub fn render_report(report: &LocatorReport) -> String {
    let mut out = String::new();
    match &report.best {
        Some(best) => {
            out.push_str(&format!(
                "{}: {} = {} ({:.2})\n",
                report.element_name,
                best.kind.name(),
                best.value,
                best.confidence
            ));
            for alt in report.locators.alternatives() {
                out.push_str(&format!(
                    "  - {} = {} ({:.2})\n",
                    alt.kind.name(),
                    alt.value,
                    alt.confidence
                ));
            }
        }
        None => out.push_str(&format!(
            "{}: UNRESOLVED (locator could not be determined)\n",
            report.element_name
        )),
    }
    out.push_str(&format!(
        "  wait: {} {}s (poll {}s)\n",
        report.wait.kind.name(),
        report.wait.timeout_seconds,
        report.wait.poll_interval_seconds
    ));
    out
}
