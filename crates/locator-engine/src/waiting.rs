//! Wait-strategy selection for located elements

use serde::{Deserialize, Serialize};

use crate::descriptor::ElementDescriptor;

/// Poll interval shared by every wait plan (seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: f64 = 0.5;

/// Waiting semantics applied before acting on an element
///
/// - Clickable: visible and enabled (interactive elements)
/// - Present: attached to the DOM (media, generic content)
/// - Visible: attached and rendered (dynamically mounted content)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitKind {
    Clickable,
    Present,
    Visible,
}

impl WaitKind {
    pub fn name(&self) -> &'static str {
        match self {
            WaitKind::Clickable => "clickable",
            WaitKind::Present => "present",
            WaitKind::Visible => "visible",
        }
    }

    /// Expected-condition name in the browser-driver dialect
    pub fn driver_condition(&self) -> &'static str {
        match self {
            WaitKind::Clickable => "element_to_be_clickable",
            WaitKind::Present => "presence_of_element_located",
            WaitKind::Visible => "visibility_of_element_located",
        }
    }

    /// Locator state in the auto-wait dialect
    pub fn auto_wait_state(&self) -> &'static str {
        match self {
            WaitKind::Present => "attached",
            WaitKind::Clickable | WaitKind::Visible => "visible",
        }
    }
}

/// Wait condition with timeout and polling cadence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaitPlan {
    #[serde(rename = "type")]
    pub kind: WaitKind,
    pub timeout_seconds: f64,
    pub poll_interval_seconds: f64,
}

impl WaitPlan {
    /// Create a plan with the default poll interval
    pub fn new(kind: WaitKind, timeout_seconds: f64) -> Self {
        Self {
            kind,
            timeout_seconds,
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECS,
        }
    }

    /// Timeout in whole milliseconds
    pub fn timeout_ms(&self) -> u64 {
        (self.timeout_seconds * 1000.0).round() as u64
    }
}

/// Pick the wait plan for a descriptor; first matching rule wins
pub fn select_wait(descriptor: &ElementDescriptor) -> WaitPlan {
    let tag = descriptor.tag();
    match tag.as_str() {
        "input" | "button" | "a" => WaitPlan::new(WaitKind::Clickable, 10.0),
        "img" | "video" => WaitPlan::new(WaitKind::Present, 15.0),
        _ if descriptor.is_dynamic => WaitPlan::new(WaitKind::Visible, 20.0),
        _ => WaitPlan::new(WaitKind::Present, 10.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_elements_wait_clickable() {
        for tag in ["input", "button", "a", "BUTTON"] {
            let plan = select_wait(&ElementDescriptor::new(tag));
            assert_eq!(plan.kind, WaitKind::Clickable);
            assert_eq!(plan.timeout_seconds, 10.0);
            assert_eq!(plan.poll_interval_seconds, 0.5);
        }
    }

    #[test]
    fn test_media_waits_for_presence() {
        let plan = select_wait(&ElementDescriptor::new("video").dynamic(true));
        assert_eq!(plan.kind, WaitKind::Present);
        assert_eq!(plan.timeout_seconds, 15.0);
    }

    #[test]
    fn test_interactive_rule_beats_dynamic_flag() {
        let plan = select_wait(&ElementDescriptor::new("button").dynamic(true));
        assert_eq!(plan.kind, WaitKind::Clickable);
    }

    #[test]
    fn test_dynamic_content_waits_visible() {
        let plan = select_wait(&ElementDescriptor::new("div").dynamic(true));
        assert_eq!(plan.kind, WaitKind::Visible);
        assert_eq!(plan.timeout_seconds, 20.0);
        assert_eq!(plan.timeout_ms(), 20_000);
    }

    #[test]
    fn test_default_is_presence_not_clickable() {
        let plan = select_wait(&ElementDescriptor::default());
        assert_eq!(plan.kind, WaitKind::Present);
        assert_eq!(plan.timeout_seconds, 10.0);
    }

    #[test]
    fn test_select_follows_generic_rules() {
        let plan = select_wait(&ElementDescriptor::new("select"));
        assert_eq!(plan.kind, WaitKind::Present);
        assert_eq!(plan.timeout_seconds, 10.0);

        let plan = select_wait(&ElementDescriptor::new("select").dynamic(true));
        assert_eq!(plan.kind, WaitKind::Visible);
        assert_eq!(plan.timeout_seconds, 20.0);
    }

    #[test]
    fn test_plan_serializes_type_field() {
        let json = serde_json::to_value(WaitPlan::new(WaitKind::Visible, 20.0)).unwrap();
        assert_eq!(json["type"], "visible");
        assert_eq!(json["timeout_seconds"], 20.0);
    }
}
