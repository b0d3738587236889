//! Locator strategy catalog
//!
//! One pure function per [`LocatorKind`], each yielding zero or one candidate
//! for a descriptor. The catalog walks the kinds in declaration order:
//! 1. ID - raw `id`
//! 2. TEST_ID - `[data-testid="..."]`
//! 3. ACCESSIBILITY_ID - `[aria-label="..."]`
//! 4. NAME - raw `name`
//! 5. CSS - tag plus the strongest attribute, else stable classes
//! 6. XPATH - `//tag[@attr="..."]`, else a text predicate
//! 7. TEXT - trimmed visible text
//! 8. CLASS - first two class names

use tracing::debug;

use crate::descriptor::ElementDescriptor;
use crate::types::{LocatorCandidate, LocatorKind};

/// Class-name prefixes emitted by frameworks rather than authors
pub const DEFAULT_GENERATED_CLASS_PREFIXES: &[&str] = &["ng-"];

/// Longest text (in characters, after trimming) used in an XPath text predicate
pub const MAX_XPATH_TEXT_CHARS: usize = 50;

/// Strategy catalog turning a descriptor into unranked candidates
#[derive(Debug, Clone)]
pub struct LocatorCatalog {
    generated_class_prefixes: Vec<String>,
}

impl Default for LocatorCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATED_CLASS_PREFIXES.iter().map(|p| p.to_string()))
    }
}

impl LocatorCatalog {
    /// Create a catalog that treats the given class prefixes as generated
    pub fn new<I, S>(generated_class_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            generated_class_prefixes: generated_class_prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// Run every strategy in enumeration order
    pub fn analyze(&self, descriptor: &ElementDescriptor) -> Vec<LocatorCandidate> {
        let candidates: Vec<LocatorCandidate> = LocatorKind::ALL
            .iter()
            .filter_map(|kind| self.locate(*kind, descriptor))
            .collect();
        debug!(
            tag = %descriptor.tag(),
            count = candidates.len(),
            "catalog produced candidates"
        );
        candidates
    }

    /// Run a single strategy
    pub fn locate(
        &self,
        kind: LocatorKind,
        descriptor: &ElementDescriptor,
    ) -> Option<LocatorCandidate> {
        match kind {
            LocatorKind::Id => id_locator(descriptor),
            LocatorKind::TestId => test_id_locator(descriptor),
            LocatorKind::AccessibilityId => accessibility_locator(descriptor),
            LocatorKind::Name => name_locator(descriptor),
            LocatorKind::Css => self.css_locator(descriptor),
            LocatorKind::Xpath => self.xpath_locator(descriptor),
            LocatorKind::Text => text_locator(descriptor),
            LocatorKind::Class => class_locator(descriptor),
        }
    }

    /// Whether a class name looks framework-generated
    pub fn is_generated_class(&self, class_name: &str) -> bool {
        self.generated_class_prefixes
            .iter()
            .any(|prefix| class_name.starts_with(prefix.as_str()))
    }

    fn stable_classes<'a>(&self, descriptor: &'a ElementDescriptor) -> Vec<&'a str> {
        descriptor
            .classes()
            .filter(|c| !self.is_generated_class(c))
            .take(2)
            .collect()
    }

    /// Smart CSS selector: tag, then the first of id / test id / name, else
    /// up to two stable classes.
    pub fn css_locator(&self, descriptor: &ElementDescriptor) -> Option<LocatorCandidate> {
        let mut selector = if descriptor.is_wildcard_tag() {
            String::new()
        } else {
            descriptor.tag()
        };

        if let Some(id) = descriptor.id() {
            selector.push('#');
            selector.push_str(&css_identifier(id));
        } else if let Some(test_id) = descriptor.test_id() {
            selector.push_str(&attribute_selector("data-testid", test_id));
        } else if let Some(name) = descriptor.name() {
            selector.push_str(&attribute_selector("name", name));
        } else {
            let classes = self.stable_classes(descriptor);
            if classes.is_empty() {
                return None;
            }
            selector.push_str(&class_selector(&classes));
        }

        Some(LocatorCandidate::new(
            LocatorKind::Css,
            selector.clone(),
            format!("Smart CSS selector: {}", selector),
        ))
    }

    /// Smart XPath: tag constrained by id, name or aria-label, else by text.
    ///
    /// The text predicate needs a stable class alongside the text; an element
    /// known only by tag and text is left to the TEXT strategy.
    pub fn xpath_locator(&self, descriptor: &ElementDescriptor) -> Option<LocatorCandidate> {
        let tag = descriptor.tag();
        let predicate = if let Some(id) = descriptor.id() {
            format!("@id={}", xpath_literal(id))
        } else if let Some(name) = descriptor.name() {
            format!("@name={}", xpath_literal(name))
        } else if let Some(label) = descriptor.aria_label() {
            format!("@aria-label={}", xpath_literal(label))
        } else {
            let text = descriptor
                .text()
                .filter(|t| t.chars().count() < MAX_XPATH_TEXT_CHARS)?;
            if self.stable_classes(descriptor).is_empty() {
                return None;
            }
            format!("text()={}", xpath_literal(text))
        };

        let expression = format!("//{}[{}]", tag, predicate);
        Some(LocatorCandidate::new(
            LocatorKind::Xpath,
            expression.clone(),
            format!("Smart XPath: {}", expression),
        ))
    }
}

/// Analyze with the default catalog
pub fn analyze(descriptor: &ElementDescriptor) -> Vec<LocatorCandidate> {
    LocatorCatalog::default().analyze(descriptor)
}

pub fn id_locator(descriptor: &ElementDescriptor) -> Option<LocatorCandidate> {
    let id = descriptor.id()?;
    Some(LocatorCandidate::new(
        LocatorKind::Id,
        id,
        format!("Locate by id: {}", id),
    ))
}

pub fn test_id_locator(descriptor: &ElementDescriptor) -> Option<LocatorCandidate> {
    let test_id = descriptor.test_id()?;
    Some(LocatorCandidate::new(
        LocatorKind::TestId,
        attribute_selector("data-testid", test_id),
        format!("Locate by test id: {}", test_id),
    ))
}

pub fn accessibility_locator(descriptor: &ElementDescriptor) -> Option<LocatorCandidate> {
    let label = descriptor.aria_label()?;
    Some(LocatorCandidate::new(
        LocatorKind::AccessibilityId,
        attribute_selector("aria-label", label),
        format!("Locate by accessible label: {}", label),
    ))
}

pub fn name_locator(descriptor: &ElementDescriptor) -> Option<LocatorCandidate> {
    let name = descriptor.name()?;
    Some(LocatorCandidate::new(
        LocatorKind::Name,
        name,
        format!("Locate by name attribute: {}", name),
    ))
}

pub fn text_locator(descriptor: &ElementDescriptor) -> Option<LocatorCandidate> {
    let text = descriptor.text()?;
    Some(LocatorCandidate::new(
        LocatorKind::Text,
        text,
        format!("Locate by visible text: {}", text),
    ))
}

pub fn class_locator(descriptor: &ElementDescriptor) -> Option<LocatorCandidate> {
    let classes: Vec<&str> = descriptor.classes().take(2).collect();
    if classes.is_empty() {
        return None;
    }
    let selector = class_selector(&classes);
    Some(LocatorCandidate::new(
        LocatorKind::Class,
        selector.clone(),
        format!("Locate by class names: {}", selector),
    ))
}

/// `[attr="value"]` with the value escaped for a double-quoted CSS string
pub fn attribute_selector(attribute: &str, value: &str) -> String {
    format!("[{}=\"{}\"]", attribute, escape_css_string(value))
}

fn class_selector(classes: &[&str]) -> String {
    classes
        .iter()
        .map(|c| format!(".{}", css_identifier(c)))
        .collect()
}

/// Serialize a value as a CSS identifier (`#id`, `.class`).
///
/// Follows CSSOM `serialize an identifier`: ASCII punctuation is
/// backslash-escaped and a leading digit becomes a code point escape.
pub fn css_identifier(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut escaped = String::with_capacity(value.len());
    for (index, &ch) in chars.iter().enumerate() {
        match ch {
            '\0' => escaped.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => {
                escaped.push_str(&format!("\\{:x} ", ch as u32));
            }
            '0'..='9' if index == 0 || (index == 1 && chars[0] == '-') => {
                escaped.push_str(&format!("\\{:x} ", ch as u32));
            }
            '-' if index == 0 && chars.len() == 1 => escaped.push_str("\\-"),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() => {
                escaped.push(c);
            }
            c => {
                escaped.push('\\');
                escaped.push(c);
            }
        }
    }
    escaped
}

fn escape_css_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Quote a value as an XPath 1.0 string literal
pub fn xpath_literal(value: &str) -> String {
    match (value.contains('"'), value.contains('\'')) {
        (false, _) => format!("\"{}\"", value),
        (true, false) => format!("'{}'", value),
        (true, true) => {
            let parts: Vec<String> = value
                .split('"')
                .map(|part| format!("\"{}\"", part))
                .collect();
            format!("concat({})", parts.join(", '\"', "))
        }
    }
}
