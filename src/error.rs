use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the browser driver and its NDJSON channel.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Driver subprocess failed to spawn
    #[error("failed to spawn {script} (is Node.js installed?): {source}")]
    Spawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the driver channel failed
    #[error("driver channel I/O: {0}")]
    Io(String),

    /// Driver output was not valid JSON
    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A request could not be encoded
    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Driver answered `ok: false`
    #[error("{command} failed: {error}")]
    Protocol { command: String, error: String },

    /// A wait ran past its bound
    #[error("{command} timed out: {error}")]
    Timeout { command: String, error: String },

    /// Every locator strategy in a chain failed
    #[error("no locator strategy matched (tried {})", .attempted.join("; "))]
    NoLocatorMatched { attempted: Vec<String> },
}

/// Failure while reading a `.feature` file. `line` is known for
/// constructs rejected after parsing; grammar errors carry the position in
/// `message`.
#[derive(Debug, Error)]
#[error("{path}{}: {message}", .line.map(|l| format!(":{}", l)).unwrap_or_default())]
pub struct ParseError {
    pub path: String,
    pub line: Option<usize>,
    pub message: String,
}

/// Why a single step did not pass.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("assertion failed: {message}")]
    Assertion { message: String },

    #[error("undefined step: \"{text}\"")]
    Undefined { text: String },

    #[error("ambiguous step \"{text}\" matches {}", .expressions.join(", "))]
    Ambiguous {
        text: String,
        expressions: Vec<String>,
    },

    #[error("invalid step expression \"{expression}\": {message}")]
    Expression { expression: String, message: String },

    #[error("missing scenario state: {0}")]
    MissingState(String),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("screenshot failed: {0}")]
    Screenshot(String),

    #[error("no page is open in the execution context")]
    NoPage,
}

impl StepError {
    pub fn assertion(message: impl Into<String>) -> Self {
        StepError::Assertion {
            message: message.into(),
        }
    }

    /// Undefined steps are reported separately from ordinary failures.
    pub fn is_undefined(&self) -> bool {
        matches!(self, StepError::Undefined { .. })
    }
}

/// Failures while turning a results file into an HTML report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed results file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no screenshot directory for test case {test_case} at {path}")]
    MissingScreenshots { test_case: String, path: PathBuf },

    #[error("no label for step {index} of test case {test_case}")]
    MissingLabel { test_case: String, index: u32 },
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum E2eError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no page is open in the execution context")]
    NoPage,
}

impl E2eError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        E2eError::Io {
            path: path.into(),
            source,
        }
    }
}
