//! Framework-specific code emission
//!
//! Each supported dialect owns one translation rule per [`LocatorKind`];
//! adding a dialect means adding one [`Dialect`] table, not new control flow.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::EmitError;
use crate::strategies::{attribute_selector, xpath_literal};
use crate::types::{LocatorCandidate, LocatorKind, RankedLocators};
use crate::waiting::{WaitKind, WaitPlan};

/// Target automation framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framework {
    /// Browser-driver style (explicit finds, explicit waits)
    Selenium,

    /// Auto-waiting locator style
    Playwright,
}

impl Framework {
    pub const ALL: [Framework; 2] = [Framework::Selenium, Framework::Playwright];

    pub fn name(&self) -> &'static str {
        self.dialect().name
    }

    /// Translation table for this framework
    pub fn dialect(&self) -> &'static Dialect {
        match self {
            Framework::Selenium => &SELENIUM,
            Framework::Playwright => &PLAYWRIGHT,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Framework {
    type Err = EmitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Framework::ALL
            .into_iter()
            .find(|framework| framework.name() == wanted)
            .ok_or_else(|| EmitError::UnknownFramework(s.to_string()))
    }
}

/// Action performed on a located element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Click,
    Input,
    AssertVisible,
    /// Read the element's text into `text`
    GetText,
    /// Explicit clickable wait in place of the plain locate statement
    Wait,
    /// Any other read-only action; emits the locate statement only
    Other(String),
}

impl Action {
    pub fn name(&self) -> &str {
        match self {
            Action::Click => "click",
            Action::Input => "input",
            Action::AssertVisible => "assert_visible",
            Action::GetText => "get_text",
            Action::Wait => "wait",
            Action::Other(name) => name,
        }
    }

    /// Whether the action changes page state
    pub fn is_mutating(&self) -> bool {
        matches!(self, Action::Click | Action::Input)
    }
}

impl From<&str> for Action {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "click" => Action::Click,
            "input" | "fill" | "type" => Action::Input,
            "assert_visible" => Action::AssertVisible,
            "get_text" => Action::GetText,
            "wait" => Action::Wait,
            other => Action::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Translates a locator value into a dialect query fragment
pub type QueryRule = fn(&str) -> String;

/// Per-framework translation table
pub struct Dialect {
    pub name: &'static str,

    /// Query rules indexed by [`LocatorKind::priority`]
    queries: [QueryRule; 8],

    /// Wraps a query fragment into an expression yielding the element
    locate: fn(&str) -> String,

    /// Renders explicit-wait statements binding `var` from a query fragment
    wait: fn(&str, &str, &WaitPlan) -> Vec<String>,

    /// Method used to type text after clearing
    type_method: &'static str,

    /// Expression suffix reading the element's text
    read_text: &'static str,
}

impl Dialect {
    /// Query fragment for one locator
    pub fn query(&self, kind: LocatorKind, value: &str) -> String {
        (self.queries[kind.priority()])(value)
    }

    /// Expression locating the element described by a candidate
    pub fn locate(&self, candidate: &LocatorCandidate) -> String {
        (self.locate)(&self.query(candidate.kind, &candidate.value))
    }

    pub fn type_method(&self) -> &'static str {
        self.type_method
    }

    /// Statements waiting for the element and binding it to `var`
    pub fn wait_lines(&self, var: &str, candidate: &LocatorCandidate, plan: &WaitPlan) -> Vec<String> {
        (self.wait)(var, &self.query(candidate.kind, &candidate.value), plan)
    }
}

static SELENIUM: Dialect = Dialect {
    name: "selenium",
    queries: [
        |v| format!("By.ID, {}", py_string(v)),
        |v| format!("By.CSS_SELECTOR, {}", py_string(v)),
        |v| format!("By.CSS_SELECTOR, {}", py_string(v)),
        |v| format!("By.NAME, {}", py_string(v)),
        |v| format!("By.CSS_SELECTOR, {}", py_string(v)),
        |v| format!("By.XPATH, {}", py_string(v)),
        |v| {
            let normalized = v.split_whitespace().collect::<Vec<_>>().join(" ");
            let xpath = format!("//*[normalize-space(text())={}]", xpath_literal(&normalized));
            format!("By.XPATH, {}", py_string(&xpath))
        },
        |v| format!("By.CSS_SELECTOR, {}", py_string(v)),
    ],
    locate: |query| format!("driver.find_element({})", query),
    wait: |var, query, plan| {
        vec![format!(
            "{} = WebDriverWait(driver, {}, poll_frequency={}).until(EC.{}(({})))",
            var,
            plan.timeout_seconds,
            plan.poll_interval_seconds,
            plan.kind.driver_condition(),
            query
        )]
    },
    type_method: "send_keys",
    read_text: ".text",
};

static PLAYWRIGHT: Dialect = Dialect {
    name: "playwright",
    queries: [
        |v| {
            if is_css_identifier(v) {
                format!("page.locator({})", py_string(&format!("#{}", v)))
            } else {
                format!("page.locator({})", py_string(&attribute_selector("id", v)))
            }
        },
        |v| format!("page.locator({})", py_string(v)),
        |v| format!("page.locator({})", py_string(v)),
        |v| format!("page.locator({})", py_string(&attribute_selector("name", v))),
        |v| format!("page.locator({})", py_string(v)),
        |v| format!("page.locator({})", py_string(&format!("xpath={}", v))),
        |v| format!("page.get_by_text({}, exact=True)", py_string(v)),
        |v| format!("page.locator({})", py_string(v)),
    ],
    locate: |query| query.to_string(),
    wait: |var, query, plan| {
        vec![
            format!("{} = {}", var, query),
            format!(
                "{}.wait_for(state={}, timeout={})",
                var,
                py_string(plan.kind.auto_wait_state()),
                plan.timeout_ms()
            ),
        ]
    },
    type_method: "fill",
    read_text: ".text_content()",
};

/// Render automation code for one element action.
///
/// An empty ranked result renders a single explanatory comment instead of
/// failing, so one unresolved element never aborts a whole script.
pub fn emit(
    ranked: &RankedLocators,
    action: &Action,
    element_name: &str,
    framework: Framework,
    value: Option<&str>,
) -> Result<String, EmitError> {
    let Some(best) = ranked.best() else {
        warn!(element = element_name, "no locator available; emitting placeholder");
        return Ok(undetermined_comment(element_name));
    };

    let dialect = framework.dialect();
    let var = element_var(element_name);
    let mut lines = vec![format!("# {}", comment_text(&best.description))];
    if *action == Action::Wait {
        lines.extend(dialect.wait_lines(&var, best, &action_wait_plan()));
    } else {
        lines.push(format!("{} = {}", var, dialect.locate(best)));
    }

    match action {
        Action::Click => lines.push(format!("{}.click()", var)),
        Action::Input => {
            let text = value.ok_or_else(|| EmitError::MissingInputValue {
                element: element_name.to_string(),
            })?;
            lines.push(format!("{}.clear()", var));
            lines.push(format!("{}.{}({})", var, dialect.type_method, py_string(text)));
        }
        Action::GetText => lines.push(format!("text = {}{}", var, dialect.read_text)),
        Action::AssertVisible | Action::Wait | Action::Other(_) => {}
    }

    lines.extend(alternative_lines(ranked, dialect, &var));

    debug!(
        element = element_name,
        framework = dialect.name,
        action = action.name(),
        kind = best.kind.name(),
        "emitted locator code"
    );
    Ok(lines.join("\n"))
}

/// Render an explicit wait for the best locator using the given plan
pub fn emit_wait(
    ranked: &RankedLocators,
    plan: &WaitPlan,
    element_name: &str,
    framework: Framework,
) -> String {
    let Some(best) = ranked.best() else {
        return undetermined_comment(element_name);
    };
    let var = element_var(element_name);
    let mut lines = vec![format!(
        "# wait up to {}s for `{}` ({})",
        plan.timeout_seconds,
        comment_text(element_name),
        plan.kind.name()
    )];
    lines.extend(framework.dialect().wait_lines(&var, best, plan));
    lines.join("\n")
}

/// Wait used by the `wait` action
fn action_wait_plan() -> WaitPlan {
    WaitPlan::new(WaitKind::Clickable, 10.0)
}

/// Placeholder emitted when no locator could be determined
pub fn undetermined_comment(element_name: &str) -> String {
    format!(
        "# locator could not be determined for `{}`",
        comment_text(element_name)
    )
}

fn alternative_lines(ranked: &RankedLocators, dialect: &Dialect, var: &str) -> Vec<String> {
    ranked
        .alternatives()
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            format!(
                "# alternative {} ({}, {:.2}): {} = {}",
                index + 1,
                candidate.kind.name(),
                candidate.confidence,
                var,
                dialect.locate(candidate)
            )
        })
        .collect()
}

/// Variable name bound to the located element
pub fn element_var(element_name: &str) -> String {
    format!("{}_element", identifier(element_name))
}

/// Turn an arbitrary element name into a Python identifier
pub fn identifier(name: &str) -> String {
    let mut ident: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() {
        ident.push_str("element");
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Render a Python string literal
pub fn py_string(value: &str) -> String {
    let quote = if value.contains('"') && !value.contains('\'') {
        '\''
    } else {
        '"'
    };
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c if c == quote => {
                literal.push('\\');
                literal.push(c);
            }
            c => literal.push(c),
        }
    }
    literal.push(quote);
    literal
}

fn comment_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_css_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ElementDescriptor;
    use crate::ranker::rank;
    use crate::strategies::analyze;
    use crate::waiting::{select_wait, WaitKind};

    fn ranked(descriptor: ElementDescriptor) -> RankedLocators {
        rank(analyze(&descriptor))
    }

    #[test]
    fn test_selenium_click_by_id() {
        let ranked = ranked(ElementDescriptor::new("button").with_id("login-btn"));
        let code = emit(&ranked, &Action::Click, "login_button", Framework::Selenium, None).unwrap();
        let lines: Vec<&str> = code.lines().collect();
        assert_eq!(lines[0], "# Locate by id: login-btn");
        assert_eq!(
            lines[1],
            r#"login_button_element = driver.find_element(By.ID, "login-btn")"#
        );
        assert_eq!(lines[2], "login_button_element.click()");
        assert_eq!(
            lines[3],
            r#"# alternative 1 (css, 0.75): login_button_element = driver.find_element(By.CSS_SELECTOR, "button#login-btn")"#
        );
        assert_eq!(
            lines[4],
            r#"# alternative 2 (xpath, 0.70): login_button_element = driver.find_element(By.XPATH, '//button[@id="login-btn"]')"#
        );
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_playwright_input_clears_then_fills() {
        let ranked = ranked(ElementDescriptor::new("input").with_test_id("username"));
        let code = emit(
            &ranked,
            &Action::Input,
            "username",
            Framework::Playwright,
            Some("alice"),
        )
        .unwrap();
        let lines: Vec<&str> = code.lines().collect();
        assert_eq!(
            lines[1],
            r#"username_element = page.locator('[data-testid="username"]')"#
        );
        assert_eq!(lines[2], "username_element.clear()");
        assert_eq!(lines[3], r#"username_element.fill("alice")"#);
    }

    #[test]
    fn test_selenium_input_uses_send_keys() {
        let ranked = ranked(ElementDescriptor::new("input").with_name("q"));
        let code = emit(&ranked, &Action::Input, "search", Framework::Selenium, Some("rust")).unwrap();
        assert!(code.contains(r#"search_element = driver.find_element(By.NAME, "q")"#));
        assert!(code.contains("search_element.clear()\nsearch_element.send_keys(\"rust\")"));
    }

    #[test]
    fn test_input_without_value_fails() {
        let ranked = ranked(ElementDescriptor::new("input").with_id("email"));
        let err = emit(&ranked, &Action::Input, "email", Framework::Playwright, None).unwrap_err();
        assert_eq!(
            err,
            EmitError::MissingInputValue {
                element: "email".into()
            }
        );
    }

    #[test]
    fn test_assert_visible_emits_locate_only() {
        let ranked = ranked(ElementDescriptor::new("div").with_id("banner"));
        let code = emit(&ranked, &Action::AssertVisible, "banner", Framework::Playwright, None).unwrap();
        let lines: Vec<&str> = code.lines().collect();
        assert_eq!(lines[1], r##"banner_element = page.locator("#banner")"##);
        assert!(lines[2].starts_with("# alternative 1"));
        assert!(!code.contains(".click()"));
    }

    #[test]
    fn test_empty_result_emits_comment() {
        for framework in Framework::ALL {
            let code = emit(&RankedLocators::empty(), &Action::Input, "ghost", framework, None).unwrap();
            assert_eq!(code, "# locator could not be determined for `ghost`");
        }
    }

    #[test]
    fn test_unknown_framework() {
        assert_eq!("Selenium".parse::<Framework>().unwrap(), Framework::Selenium);
        assert_eq!(" playwright ".parse::<Framework>().unwrap(), Framework::Playwright);
        assert_eq!(
            "cypress".parse::<Framework>().unwrap_err(),
            EmitError::UnknownFramework("cypress".into())
        );
    }

    #[test]
    fn test_every_kind_translates_in_every_dialect() {
        for framework in Framework::ALL {
            for kind in LocatorKind::ALL {
                let candidate = LocatorCandidate::new(kind, "value", "");
                let expression = framework.dialect().locate(&candidate);
                assert!(expression.contains("value"), "{} {:?}", framework, kind);
            }
        }
    }

    #[test]
    fn test_playwright_text_and_xpath() {
        let text = LocatorCandidate::new(LocatorKind::Text, "登录", "");
        assert_eq!(
            PLAYWRIGHT.locate(&text),
            r#"page.get_by_text("登录", exact=True)"#
        );
        let xpath = LocatorCandidate::new(LocatorKind::Xpath, "//a[@name=\"x\"]", "");
        assert_eq!(PLAYWRIGHT.locate(&xpath), r#"page.locator('xpath=//a[@name="x"]')"#);
    }

    #[test]
    fn test_playwright_id_with_special_characters() {
        let id = LocatorCandidate::new(LocatorKind::Id, "user:email", "");
        assert_eq!(PLAYWRIGHT.locate(&id), r#"page.locator('[id="user:email"]')"#);
    }

    #[test]
    fn test_selenium_text_uses_xpath() {
        let text = LocatorCandidate::new(LocatorKind::Text, "Sign in", "");
        assert_eq!(
            SELENIUM.locate(&text),
            r#"driver.find_element(By.XPATH, '//*[normalize-space(text())="Sign in"]')"#
        );
    }

    #[test]
    fn test_selenium_text_collapses_whitespace() {
        let text = LocatorCandidate::new(LocatorKind::Text, "Sign\n  in", "");
        assert_eq!(
            SELENIUM.locate(&text),
            r#"driver.find_element(By.XPATH, '//*[normalize-space(text())="Sign in"]')"#
        );
    }

    #[test]
    fn test_selenium_escaped_classes() {
        let ranked = ranked(ElementDescriptor::default().with_classes(["md:flex", "w-1/2"]));
        let code = emit(&ranked, &Action::AssertVisible, "panel", Framework::Selenium, None).unwrap();
        let lines: Vec<&str> = code.lines().collect();
        assert_eq!(
            lines[1],
            r#"panel_element = driver.find_element(By.CSS_SELECTOR, ".md\\:flex.w-1\\/2")"#
        );
    }

    #[test]
    fn test_get_text_both_dialects() {
        let ranked = ranked(ElementDescriptor::new("h1").with_id("title"));

        let selenium = emit(&ranked, &Action::GetText, "title", Framework::Selenium, None).unwrap();
        let lines: Vec<&str> = selenium.lines().collect();
        assert_eq!(lines[1], r#"title_element = driver.find_element(By.ID, "title")"#);
        assert_eq!(lines[2], "text = title_element.text");

        let playwright = emit(&ranked, &Action::GetText, "title", Framework::Playwright, None).unwrap();
        let lines: Vec<&str> = playwright.lines().collect();
        assert_eq!(lines[1], r##"title_element = page.locator("#title")"##);
        assert_eq!(lines[2], "text = title_element.text_content()");
    }

    #[test]
    fn test_wait_action_both_dialects() {
        let ranked = ranked(ElementDescriptor::new("div").with_id("x"));

        let selenium = emit(&ranked, &Action::Wait, "x", Framework::Selenium, None).unwrap();
        let lines: Vec<&str> = selenium.lines().collect();
        assert_eq!(
            lines[1],
            r#"x_element = WebDriverWait(driver, 10, poll_frequency=0.5).until(EC.element_to_be_clickable((By.ID, "x")))"#
        );
        assert!(lines[2].starts_with("# alternative 1"));
        assert!(!selenium.contains("x_element = driver.find_element"));

        let playwright = emit(&ranked, &Action::Wait, "x", Framework::Playwright, None).unwrap();
        let lines: Vec<&str> = playwright.lines().collect();
        assert_eq!(lines[1], r##"x_element = page.locator("#x")"##);
        assert_eq!(lines[2], r#"x_element.wait_for(state="visible", timeout=10000)"#);
        assert!(lines[3].starts_with("# alternative 1"));
    }

    #[test]
    fn test_emit_is_deterministic() {
        let ranked = ranked(
            ElementDescriptor::new("button")
                .with_name("go")
                .with_text("Go")
                .with_classes(["btn"]),
        );
        let a = emit(&ranked, &Action::Click, "go", Framework::Selenium, None).unwrap();
        let b = emit(&ranked, &Action::Click, "go", Framework::Selenium, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_emit_wait_both_dialects() {
        let descriptor = ElementDescriptor::new("button").with_id("save");
        let ranked = ranked(descriptor.clone());
        let plan = select_wait(&descriptor);
        assert_eq!(plan.kind, WaitKind::Clickable);

        let selenium = emit_wait(&ranked, &plan, "save", Framework::Selenium);
        assert_eq!(
            selenium,
            "# wait up to 10s for `save` (clickable)\n\
             save_element = WebDriverWait(driver, 10, poll_frequency=0.5).until(EC.element_to_be_clickable((By.ID, \"save\")))"
        );

        let playwright = emit_wait(&ranked, &plan, "save", Framework::Playwright);
        assert_eq!(
            playwright,
            "# wait up to 10s for `save` (clickable)\n\
             save_element = page.locator(\"#save\")\n\
             save_element.wait_for(state=\"visible\", timeout=10000)"
        );
    }

    #[test]
    fn test_identifier_sanitizing() {
        assert_eq!(identifier("login button"), "login_button");
        assert_eq!(identifier("2fa-code"), "_2fa_code");
        assert_eq!(identifier(""), "element");
        assert_eq!(element_var("提交"), "提交_element");
    }

    #[test]
    fn test_py_string_quoting() {
        assert_eq!(py_string("plain"), r#""plain""#);
        assert_eq!(py_string(r#"a"b"#), r#"'a"b'"#);
        assert_eq!(py_string(r#"it's "x""#), r#""it's \"x\"""#);
        assert_eq!(py_string("line\nbreak"), r#""line\nbreak""#);
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!(Action::from("fill"), Action::Input);
        assert_eq!(Action::from("CLICK"), Action::Click);
        assert_eq!(Action::from("get_text"), Action::GetText);
        assert_eq!(Action::from("Wait"), Action::Wait);
        assert_eq!(Action::from("hover"), Action::Other("hover".into()));
        assert!(!Action::from("assert_visible").is_mutating());
    }
}
