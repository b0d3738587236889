//! Page objects and full test scripts assembled from emitted snippets

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::emitter::{emit, emit_wait, identifier, py_string, undetermined_comment, Action, Framework};
use crate::errors::EmitError;
use crate::types::RankedLocators;
use crate::waiting::WaitPlan;

const INDENT: &str = "    ";

/// Render a page-object fragment for one element: a property returning the
/// located element plus `click_<name>` and `input_<name>` helpers.
pub fn emit_page_object(ranked: &RankedLocators, element_name: &str, framework: Framework) -> String {
    let Some(best) = ranked.best() else {
        warn!(element = element_name, "page object skipped; no locator");
        return undetermined_comment(element_name);
    };

    let dialect = framework.dialect();
    let prop = identifier(element_name);
    let lines = [
        "@property".to_string(),
        format!("def {}(self):", prop),
        format!("{}# {}", INDENT, best.description.split_whitespace().collect::<Vec<_>>().join(" ")),
        format!("{}return self.{}", INDENT, dialect.locate(best)),
        String::new(),
        format!("def click_{}(self):", prop),
        format!("{}self.{}.click()", INDENT, prop),
        String::new(),
        format!("def input_{}(self, text):", prop),
        format!("{}element = self.{}", INDENT, prop),
        format!("{}element.clear()", INDENT),
        format!("{}element.{}(text)", INDENT, dialect.type_method()),
    ];
    lines.join("\n")
}

/// One scripted interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub element_name: String,
    pub action: Action,
    pub value: Option<String>,
}

impl ScriptStep {
    pub fn new(element_name: impl Into<String>, action: Action) -> Self {
        Self {
            element_name: element_name.into(),
            action,
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone)]
struct RegisteredElement {
    locators: RankedLocators,
    wait: Option<WaitPlan>,
}

/// Assembles a runnable test function for one page
#[derive(Debug, Clone)]
pub struct TestScriptBuilder {
    framework: Framework,
    page_url: String,
    test_name: String,
    elements: HashMap<String, RegisteredElement>,
    steps: Vec<ScriptStep>,
}

impl TestScriptBuilder {
    pub fn new(framework: Framework, page_url: impl Into<String>) -> Self {
        Self {
            framework,
            page_url: page_url.into(),
            test_name: "test_page".to_string(),
            elements: HashMap::new(),
            steps: Vec::new(),
        }
    }

    pub fn test_name(mut self, name: &str) -> Self {
        let ident = identifier(name);
        self.test_name = if ident.starts_with("test_") {
            ident
        } else {
            format!("test_{}", ident)
        };
        self
    }

    /// Register ranked locators under `element_name`
    pub fn element(mut self, element_name: impl Into<String>, locators: RankedLocators) -> Self {
        self.elements.insert(
            element_name.into(),
            RegisteredElement {
                locators,
                wait: None,
            },
        );
        self
    }

    /// Register ranked locators plus a wait issued before each step on it
    pub fn element_with_wait(
        mut self,
        element_name: impl Into<String>,
        locators: RankedLocators,
        wait: WaitPlan,
    ) -> Self {
        self.elements.insert(
            element_name.into(),
            RegisteredElement {
                locators,
                wait: Some(wait),
            },
        );
        self
    }

    pub fn step(mut self, step: ScriptStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Render the complete script
    pub fn build(&self) -> Result<String, EmitError> {
        let mut body = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            body.push(format!(
                "# step {}: {} `{}`",
                index + 1,
                step.action,
                step.element_name
            ));
            body.extend(self.render_step(step)?.lines().map(str::to_string));
        }

        let script = match self.framework {
            Framework::Selenium => self.selenium_template(&body),
            Framework::Playwright => self.playwright_template(&body),
        };
        debug!(
            framework = self.framework.name(),
            steps = self.steps.len(),
            elements = self.elements.len(),
            "assembled test script"
        );
        Ok(script)
    }

    fn render_step(&self, step: &ScriptStep) -> Result<String, EmitError> {
        let Some(element) = self.elements.get(&step.element_name) else {
            warn!(element = %step.element_name, "step references unregistered element");
            return Ok(format!(
                "# element `{}` was not registered; step skipped",
                step.element_name
            ));
        };

        let action = emit(
            &element.locators,
            &step.action,
            &step.element_name,
            self.framework,
            step.value.as_deref(),
        )?;
        match (&element.wait, element.locators.is_empty()) {
            (Some(plan), false) => Ok(format!(
                "{}\n{}",
                emit_wait(&element.locators, plan, &step.element_name, self.framework),
                action
            )),
            _ => Ok(action),
        }
    }

    fn selenium_template(&self, body: &[String]) -> String {
        let mut out = vec![
            "from selenium import webdriver".to_string(),
            "from selenium.webdriver.common.by import By".to_string(),
            "from selenium.webdriver.support import expected_conditions as EC".to_string(),
            "from selenium.webdriver.support.ui import WebDriverWait".to_string(),
            String::new(),
            String::new(),
            format!("def {}():", self.test_name),
            format!("{}options = webdriver.ChromeOptions()", INDENT),
            format!("{}options.add_argument(\"--headless\")", INDENT),
            format!("{}driver = webdriver.Chrome(options=options)", INDENT),
            format!("{}try:", INDENT),
            format!("{}driver.get({})", INDENT.repeat(2), py_string(&self.page_url)),
        ];
        out.extend(indent(body, 2));
        out.push(format!("{}finally:", INDENT));
        out.push(format!("{}driver.quit()", INDENT.repeat(2)));
        out.push(String::new());
        out.join("\n")
    }

    fn playwright_template(&self, body: &[String]) -> String {
        let mut out = vec![
            "from playwright.sync_api import sync_playwright".to_string(),
            String::new(),
            String::new(),
            format!("def {}():", self.test_name),
            format!("{}with sync_playwright() as p:", INDENT),
            format!("{}browser = p.chromium.launch(headless=True)", INDENT.repeat(2)),
            format!("{}page = browser.new_page()", INDENT.repeat(2)),
            format!("{}try:", INDENT.repeat(2)),
            format!("{}page.goto({})", INDENT.repeat(3), py_string(&self.page_url)),
        ];
        out.extend(indent(body, 3));
        out.push(format!("{}finally:", INDENT.repeat(2)));
        out.push(format!("{}browser.close()", INDENT.repeat(3)));
        out.push(String::new());
        out.join("\n")
    }
}

fn indent(lines: &[String], depth: usize) -> impl Iterator<Item = String> + '_ {
    let prefix = INDENT.repeat(depth);
    lines.iter().map(move |line| {
        if line.is_empty() {
            String::new()
        } else {
            format!("{}{}", prefix, line)
        }
    })
}
