//! Element descriptor - normalized facts about one DOM element

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Wildcard tag used when the caller supplies no tag name
pub const WILDCARD_TAG: &str = "*";

/// Normalized facts about a single DOM element.
///
/// Descriptors arrive as flat key-value records from the page crawler or the
/// test-generation prompt. Unknown fields are ignored, absent fields default
/// to empty and a blank scalar attribute counts as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Element tag name (`*` when unknown)
    #[serde(
        default = "default_tag",
        alias = "tag",
        deserialize_with = "deserialize_tag"
    )]
    pub tag_name: String,

    /// `id` attribute
    #[serde(default)]
    pub id: Option<String>,

    /// `name` attribute
    #[serde(default, alias = "name_attr")]
    pub name: Option<String>,

    /// `aria-label` attribute
    #[serde(default)]
    pub aria_label: Option<String>,

    /// `data-testid` attribute
    #[serde(default, alias = "data_testid", alias = "test_id")]
    pub data_test_id: Option<String>,

    /// Visible text content
    #[serde(default, alias = "text")]
    pub text_content: Option<String>,

    /// Class list in document order
    #[serde(
        default,
        alias = "classes",
        deserialize_with = "deserialize_class_names"
    )]
    pub class_names: Vec<String>,

    /// Whether identity attributes may change between renders
    #[serde(default)]
    pub is_dynamic: bool,
}

impl Default for ElementDescriptor {
    fn default() -> Self {
        Self::new(WILDCARD_TAG)
    }
}

impl ElementDescriptor {
    /// Create a descriptor with only a tag name
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: normalize_tag(tag_name.into()),
            id: None,
            name: None,
            aria_label: None,
            data_test_id: None,
            text_content: None,
            class_names: Vec::new(),
            is_dynamic: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    pub fn with_test_id(mut self, test_id: impl Into<String>) -> Self {
        self.data_test_id = Some(test_id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class_names = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn dynamic(mut self, is_dynamic: bool) -> Self {
        self.is_dynamic = is_dynamic;
        self
    }

    /// Tag name, lowercased for rule matching
    pub fn tag(&self) -> String {
        normalize_tag(self.tag_name.clone()).to_ascii_lowercase()
    }

    /// Whether the tag is the `*` wildcard
    pub fn is_wildcard_tag(&self) -> bool {
        self.tag() == WILDCARD_TAG
    }

    pub fn id(&self) -> Option<&str> {
        present(&self.id)
    }

    pub fn name(&self) -> Option<&str> {
        present(&self.name)
    }

    pub fn aria_label(&self) -> Option<&str> {
        present(&self.aria_label)
    }

    pub fn test_id(&self) -> Option<&str> {
        present(&self.data_test_id)
    }

    /// Trimmed text content, if any
    pub fn text(&self) -> Option<&str> {
        present(&self.text_content)
    }

    /// Non-blank class names in document order
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class_names
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }

    /// Stable identity used as the cache key.
    ///
    /// Optional fields are keyed by name so their declaration order does not
    /// matter; class names keep document order.
    pub fn identity_key(&self) -> String {
        let mut fields = Map::new();
        fields.insert("tag_name".into(), Value::String(self.tag()));
        let scalars = [
            ("id", self.id()),
            ("name", self.name()),
            ("aria_label", self.aria_label()),
            ("data_test_id", self.test_id()),
            ("text_content", self.text()),
        ];
        for (key, value) in scalars {
            if let Some(value) = value {
                fields.insert(key.into(), Value::String(value.to_string()));
            }
        }
        let classes: Vec<Value> = self
            .classes()
            .map(|c| Value::String(c.to_string()))
            .collect();
        if !classes.is_empty() {
            fields.insert("class_names".into(), Value::Array(classes));
        }
        if self.is_dynamic {
            fields.insert("is_dynamic".into(), Value::Bool(true));
        }
        Value::Object(fields).to_string()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn default_tag() -> String {
    WILDCARD_TAG.to_string()
}

fn normalize_tag(tag: String) -> String {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        default_tag()
    } else {
        trimmed.to_string()
    }
}

fn deserialize_tag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(normalize_tag(raw.unwrap_or_default()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassNames {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_class_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<ClassNames> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(ClassNames::List(list)) => list,
        Some(ClassNames::Joined(joined)) => {
            joined.split_whitespace().map(str::to_string).collect()
        }
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_defaults_to_wildcard() {
        let descriptor: ElementDescriptor = serde_json::from_str("{}").unwrap();
        assert_eq!(descriptor.tag_name, "*");
        assert!(descriptor.is_wildcard_tag());
        assert!(descriptor.id().is_none());
        assert!(descriptor.class_names.is_empty());
        assert!(!descriptor.is_dynamic);
    }

    #[test]
    fn test_record_aliases_and_unknown_fields() {
        let descriptor: ElementDescriptor = serde_json::from_str(
            r#"{
                "tag": "BUTTON",
                "name_attr": "login",
                "data_testid": "login-button",
                "classes": "btn  btn-primary",
                "description": "ignored"
            }"#,
        )
        .unwrap();
        assert_eq!(descriptor.tag(), "button");
        assert_eq!(descriptor.name(), Some("login"));
        assert_eq!(descriptor.test_id(), Some("login-button"));
        assert_eq!(descriptor.class_names, vec!["btn", "btn-primary"]);
    }

    #[test]
    fn test_yaml_record() {
        let descriptor: ElementDescriptor = serde_yaml::from_str(
            "tag_name: select\nid: country\nclass_names: [form-control, ng-pristine]\nis_dynamic: true\n",
        )
        .unwrap();
        assert_eq!(descriptor.tag(), "select");
        assert_eq!(descriptor.id(), Some("country"));
        assert_eq!(descriptor.classes().count(), 2);
        assert!(descriptor.is_dynamic);
    }

    #[test]
    fn test_blank_attributes_are_absent() {
        let descriptor = ElementDescriptor::new("  ")
            .with_id("   ")
            .with_text("  Sign in ");
        assert!(descriptor.is_wildcard_tag());
        assert_eq!(descriptor.id(), None);
        assert_eq!(descriptor.text(), Some("Sign in"));
    }

    #[test]
    fn test_null_tag_defaults() {
        let descriptor: ElementDescriptor =
            serde_json::from_str(r#"{"tag_name": null, "class_names": null}"#).unwrap();
        assert_eq!(descriptor.tag_name, "*");
        assert!(descriptor.class_names.is_empty());
    }

    #[test]
    fn test_identity_key_is_field_order_independent() {
        let a: ElementDescriptor =
            serde_json::from_str(r#"{"id": "x", "name": "y", "tag_name": "input"}"#).unwrap();
        let b: ElementDescriptor =
            serde_json::from_str(r#"{"tag_name": "input", "name": "y", "id": "x"}"#).unwrap();
        assert_eq!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn test_identity_key_preserves_class_order() {
        let a = ElementDescriptor::new("div").with_classes(["a", "b"]);
        let b = ElementDescriptor::new("div").with_classes(["b", "a"]);
        assert_ne!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn test_identity_key_distinguishes_dynamic_flag() {
        let a = ElementDescriptor::new("div").with_text("hello");
        let b = a.clone().dynamic(true);
        assert_ne!(a.identity_key(), b.identity_key());
    }
}
