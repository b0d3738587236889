//! Descriptor and plan files (JSON or YAML)

use std::path::Path;

use anyhow::{bail, Context, Result};
use locator_engine::{Action, ElementDescriptor, ScriptStep};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tokio::fs;

/// Descriptor record optionally carrying the caller's element name
#[derive(Debug, Clone)]
pub struct NamedDescriptor {
    pub element_name: Option<String>,
    pub descriptor: ElementDescriptor,
}

impl<'de> Deserialize<'de> for NamedDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut record = Map::<String, Value>::deserialize(deserializer)?;
        let element_name = match record.remove("element_name") {
            Some(Value::String(name)) => Some(name),
            Some(Value::Null) | None => None,
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "element_name must be a string, got {}",
                    other
                )))
            }
        };
        let descriptor =
            ElementDescriptor::deserialize(Value::Object(record)).map_err(D::Error::custom)?;
        Ok(Self {
            element_name,
            descriptor,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptorFile {
    List(Vec<NamedDescriptor>),
    Wrapped { elements: Vec<NamedDescriptor> },
}

/// Script plan: page, registered elements and ordered steps
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptPlan {
    pub page_url: String,

    #[serde(default)]
    pub test_name: Option<String>,

    #[serde(default)]
    pub elements: Vec<NamedDescriptor>,

    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanStep {
    pub element_name: String,
    pub action: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl From<&PlanStep> for ScriptStep {
    fn from(step: &PlanStep) -> Self {
        let mut out = ScriptStep::new(step.element_name.clone(), Action::from(step.action.as_str()));
        out.value = step.value.clone();
        out
    }
}

/// An element with its resolved display name
#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub descriptor: ElementDescriptor,
}

/// Give every record a name: its own, else `element_<n>` (1-based)
pub fn name_elements(records: Vec<NamedDescriptor>) -> Vec<Element> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| Element {
            name: record
                .element_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| format!("element_{}", index + 1)),
            descriptor: record.descriptor,
        })
        .collect()
}

/// Parse descriptors: a list of records or `{ elements: [...] }`
pub fn parse_descriptors(content: &str, path: &Path) -> Result<Vec<Element>> {
    let file: DescriptorFile = parse_document(content, path)?;
    let records = match file {
        DescriptorFile::List(records) => records,
        DescriptorFile::Wrapped { elements } => elements,
    };
    Ok(name_elements(records))
}

pub async fn read_descriptors(path: &Path) -> Result<Vec<Element>> {
    let content = read(path).await?;
    parse_descriptors(&content, path)
}

pub fn parse_plan(content: &str, path: &Path) -> Result<ScriptPlan> {
    let plan: ScriptPlan = parse_document(content, path)?;
    if plan.page_url.trim().is_empty() {
        bail!("Plan {} has an empty page_url", path.display());
    }
    Ok(plan)
}

pub async fn read_plan(path: &Path) -> Result<ScriptPlan> {
    let content = read(path).await?;
    parse_plan(&content, path)
}

async fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// `.json` parses as JSON, everything else as YAML (a JSON superset)
fn parse_document<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        serde_json::from_str(content)
            .with_context(|| format!("Failed to parse JSON from {}", path.display()))
    } else {
        serde_yaml::from_str(content)
            .with_context(|| format!("Failed to parse YAML from {}", path.display()))
    }
}
