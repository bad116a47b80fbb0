use cucumber_expressions::Expression;
use regex::Regex;

use crate::browser::page::Page;
use crate::error::{E2eError, StepError};
use crate::steps::state::ScenarioState;
use crate::world::context::ExecutionContext;

/// Everything a step handler may touch: the scenario's browser session
/// and its scenario-local state.
pub struct StepContext<'a> {
    pub world: &'a mut ExecutionContext,
    pub state: &'a mut ScenarioState,
}

impl StepContext<'_> {
    pub fn page(&mut self) -> Result<&mut dyn Page, StepError> {
        self.world.page().map_err(|_| StepError::NoPage)
    }

    /// Take this step's screenshot now instead of at the step boundary.
    pub fn capture_step(&mut self) -> Result<(), StepError> {
        let label = self.state.step_label();
        match self.world.capture(&label) {
            Ok(Some(_)) => {
                self.state.mark_captured();
                Ok(())
            }
            Ok(None) => Err(StepError::NoPage),
            Err(E2eError::Browser(e)) => Err(StepError::Browser(e)),
            Err(e) => Err(StepError::Screenshot(e.to_string())),
        }
    }
}

/// Handler invoked with the arguments captured from the step text.
pub type StepFn = fn(&mut StepContext<'_>, &[String]) -> Result<(), StepError>;

pub struct StepBinding {
    expression: String,
    regex: Regex,
    /// Parameter type names in order of appearance, e.g. `["string", "int"]`
    parameters: Vec<String>,
    handler: StepFn,
}

impl StepBinding {
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn call(&self, ctx: &mut StepContext<'_>, args: &[String]) -> Result<(), StepError> {
        (self.handler)(ctx, args)
    }

    /// One argument per parameter. Groups nested inside a parameter's
    /// match (the quoted alternatives of `{string}`) are skipped, and
    /// `{string}` arguments are passed without their quotes.
    fn captures(&self, text: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(text)?;
        let mut args = Vec::with_capacity(self.parameters.len());
        let mut covered = 0;
        for m in caps.iter().skip(1).flatten() {
            if args.len() == self.parameters.len() {
                break;
            }
            if !args.is_empty() && m.start() < covered {
                continue;
            }
            covered = m.end();
            let value = match self.parameters[args.len()].as_str() {
                "string" => unquote(m.as_str()),
                _ => m.as_str().to_string(),
            };
            args.push(value);
        }
        Some(args)
    }
}

impl std::fmt::Debug for StepBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepBinding")
            .field("expression", &self.expression)
            .finish()
    }
}

/// A binding that matched a step, with its extracted arguments.
#[derive(Debug)]
pub struct StepMatch<'r> {
    pub binding: &'r StepBinding,
    pub args: Vec<String>,
}

/// Maps step phrases to handlers. Keywords are ignored when matching, so
/// `Given`, `When`, `Then`, `And` and `But` all share one namespace.
#[derive(Debug, Default)]
pub struct StepRegistry {
    bindings: Vec<StepBinding>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cucumber expression such as `I search for job title {string}`.
    pub fn define(&mut self, expression: &str, handler: StepFn) -> Result<&mut Self, StepError> {
        let regex = compile_expression(expression)?;
        self.bindings.push(StepBinding {
            expression: expression.to_string(),
            regex,
            parameters: parameter_names(expression),
            handler,
        });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Find the one binding matching `text`.
    pub fn find(&self, text: &str) -> Result<StepMatch<'_>, StepError> {
        let mut matches: Vec<StepMatch<'_>> = self
            .bindings
            .iter()
            .filter_map(|binding| binding.captures(text).map(|args| StepMatch { binding, args }))
            .collect();

        match matches.len() {
            0 => Err(StepError::Undefined {
                text: text.to_string(),
            }),
            1 => Ok(matches.remove(0)),
            _ => Err(StepError::Ambiguous {
                text: text.to_string(),
                expressions: matches
                    .iter()
                    .map(|m| m.binding.expression.clone())
                    .collect(),
            }),
        }
    }
}

/// Compile a cucumber expression into its anchored regex.
pub fn compile_expression(expression: &str) -> Result<Regex, StepError> {
    Expression::regex(expression).map_err(|e| StepError::Expression {
        expression: expression.to_string(),
        message: e.to_string(),
    })
}

/// Parameter names between unescaped braces.
fn parameter_names(expression: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut chars = expression.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => names.push(chars.by_ref().take_while(|&c| c != '}').collect()),
            _ => {}
        }
    }
    names
}

/// Strip the surrounding quotes of a `{string}` match and unescape the
/// quote character inside it.
fn unquote(raw: &str) -> String {
    let mut chars = raw.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && (open == '"' || open == '\'') => {
            let inner = chars.as_str();
            inner.replace(&format!("\\{}", open), &open.to_string())
        }
        _ => raw.to_string(),
    }
}
